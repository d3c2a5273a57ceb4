use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LoanbookError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates as decimals, except where a field name says it is a percentage.
pub type Rate = Decimal;

/// How often installments fall due, expressed as payments per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PaymentFrequency {
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl PaymentFrequency {
    pub fn payments_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::Semiannual => 2,
            PaymentFrequency::Annual => 1,
        }
    }
}

impl TryFrom<u32> for PaymentFrequency {
    type Error = LoanbookError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            12 => Ok(PaymentFrequency::Monthly),
            4 => Ok(PaymentFrequency::Quarterly),
            2 => Ok(PaymentFrequency::Semiannual),
            1 => Ok(PaymentFrequency::Annual),
            other => Err(LoanbookError::InvalidLoanTerms {
                field: "frequency".into(),
                reason: format!("{other} payments per year is not supported; expected 12, 4, 2 or 1"),
            }),
        }
    }
}

impl From<PaymentFrequency> for u32 {
    fn from(value: PaymentFrequency) -> Self {
        value.payments_per_year()
    }
}

/// Caller-supplied snapshot of a loan's contractual terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual nominal interest rate as a percentage (12 = 12%).
    pub annual_rate_pct: Rate,
    pub term_months: u32,
    pub frequency: PaymentFrequency,
    pub disbursement_date: NaiveDate,
}

/// A recorded payment against a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    pub amount: Money,
}

/// A single period of an amortization schedule.
///
/// All monetary fields are rounded to 2 decimal places at emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// 1-based sequence index.
    pub period: u32,
    pub due_date: NaiveDate,
    pub installment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Remaining principal balance after this period.
    pub balance: Money,
}

/// Payment standing of a period at the evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodStatus {
    Current,
    Overdue,
}

/// A schedule period augmented with what has been paid against it.
///
/// Derived fresh on every allocation; a view, never a stored entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedPeriod {
    #[serde(flatten)]
    pub period: Period,
    pub amount_paid: Money,
    pub amount_pending: Money,
    pub status: PeriodStatus,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_round_trip() {
        for n in [12u32, 4, 2, 1] {
            let freq = PaymentFrequency::try_from(n).unwrap();
            assert_eq!(u32::from(freq), n);
        }
    }

    #[test]
    fn test_frequency_rejects_unsupported() {
        for n in [0u32, 3, 6, 24, 365] {
            assert!(matches!(
                PaymentFrequency::try_from(n),
                Err(LoanbookError::InvalidLoanTerms { .. })
            ));
        }
    }
}
