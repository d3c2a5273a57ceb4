//! Fixed-installment ("French") amortization schedule generation.
//!
//! The installment stays constant over the life of the loan while the
//! interest portion shrinks and the principal portion grows. All math uses
//! `rust_decimal::Decimal`; monetary fields are rounded to 2 decimal places
//! only when a period is emitted, never on the running balance.

use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanbookError;
use crate::types::{with_metadata, ComputationOutput, LoanTerms, Money, Period, Rate};
use crate::LoanbookResult;

const HUNDRED: Decimal = dec!(100);
/// Due dates are spaced on a fixed 365-day year, not calendar months.
const DAYS_PER_YEAR: i64 = 365;

/// Output of schedule generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    pub periods: Vec<Period>,
    pub total_periods: u32,
    /// Interest rate per period, as a decimal.
    pub periodic_rate: Rate,
    /// The fixed installment, rounded to 2 decimal places.
    pub installment: Money,
    /// Sum of the emitted installment amounts.
    pub total_installments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
}

/// Build the amortization schedule for a loan.
///
/// Pure and deterministic: identical terms always produce an identical
/// schedule. Fails with [`LoanbookError::InvalidLoanTerms`] before any
/// period is produced; no partial schedule is ever returned.
pub fn generate_schedule(terms: &LoanTerms) -> LoanbookResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();

    validate_terms(terms)?;

    let per_year = terms.frequency.payments_per_year();
    let total_periods = u32::try_from(u64::from(terms.term_months) * u64::from(per_year) / 12)
        .map_err(|_| LoanbookError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: "term produces more periods than supported".into(),
        })?;
    if total_periods < 1 {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: format!(
                "a term of {} months is shorter than one payment interval at {} payments per year",
                terms.term_months, per_year
            ),
        });
    }

    let periodic_rate = terms.annual_rate_pct / HUNDRED / Decimal::from(per_year);
    let installment = fixed_installment(terms.principal, periodic_rate, total_periods)?;

    let mut periods = Vec::with_capacity(total_periods as usize);
    let mut balance = terms.principal;
    let mut total_installments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;

    for i in 1..=total_periods {
        let interest = balance * periodic_rate;
        let principal = installment - interest;
        // The floor keeps rounding overshoot in the final period from
        // driving the balance negative.
        balance = (balance - principal).max(Decimal::ZERO);

        let period = Period {
            period: i,
            due_date: due_date_for(terms.disbursement_date, i, per_year)?,
            installment: installment.round_dp(2),
            interest: interest.round_dp(2),
            principal: principal.round_dp(2),
            balance: balance.round_dp(2),
        };
        total_installments += period.installment;
        total_interest += period.interest;
        total_principal += period.principal;
        periods.push(period);
    }

    let output = ScheduleOutput {
        periods,
        total_periods,
        periodic_rate,
        installment: installment.round_dp(2),
        total_installments,
        total_interest,
        total_principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French Amortization Schedule",
        &serde_json::json!({
            "principal": terms.principal.to_string(),
            "annual_rate_pct": terms.annual_rate_pct.to_string(),
            "term_months": terms.term_months,
            "payments_per_year": per_year,
            "disbursement_date": terms.disbursement_date.to_string(),
            "day_count": "fixed 365-day year",
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

fn validate_terms(terms: &LoanTerms) -> LoanbookResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "principal".into(),
            reason: "principal must be positive".into(),
        });
    }
    if terms.annual_rate_pct < Decimal::ZERO {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "annual_rate_pct".into(),
            reason: "interest rate must not be negative".into(),
        });
    }
    if terms.term_months == 0 {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: "term must be at least 1 month".into(),
        });
    }
    Ok(())
}

/// The annuity installment: `principal * r / (1 - (1+r)^-N)`, computed in
/// the growth form `principal * r * (1+r)^N / ((1+r)^N - 1)` to avoid a
/// negative exponent. Zero-rate loans amortize linearly.
fn fixed_installment(principal: Money, periodic_rate: Rate, n: u32) -> LoanbookResult<Money> {
    if periodic_rate.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let growth = (Decimal::ONE + periodic_rate)
        .checked_powd(Decimal::from(n))
        .ok_or_else(|| LoanbookError::InvalidLoanTerms {
            field: "term_months".into(),
            reason: "installment factor overflows the decimal range".into(),
        })?;
    if growth <= Decimal::ONE {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "annual_rate_pct".into(),
            reason: "rate is too small to distinguish from zero".into(),
        });
    }

    Ok(principal * periodic_rate * growth / (growth - Decimal::ONE))
}

/// Due date for period `i`: disbursement plus `round(i * 365 / frequency)`
/// days. A fixed approximation of the payment interval, kept for
/// compatibility with existing schedules.
fn due_date_for(disbursement: NaiveDate, period: u32, per_year: u32) -> LoanbookResult<NaiveDate> {
    let numerator = DAYS_PER_YEAR * i64::from(period);
    let denominator = i64::from(per_year);
    // Nearest day, ties rounded up.
    let days = (2 * numerator + denominator) / (2 * denominator);
    disbursement
        .checked_add_signed(Duration::days(days))
        .ok_or_else(|| LoanbookError::InvalidLoanTerms {
            field: "disbursement_date".into(),
            reason: format!("due date for period {period} falls outside the calendar range"),
        })
}
