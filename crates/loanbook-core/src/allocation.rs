//! Waterfall allocation of recorded payments against an amortization
//! schedule, and derivation of per-period delinquency status.
//!
//! Payments are pooled and applied to the oldest outstanding installment
//! first, regardless of the period each payment was dated for. Status is a
//! function of the evaluation date, recomputed on every call.

use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanbookError;
use crate::types::{
    with_metadata, AllocatedPeriod, ComputationOutput, Money, Payment, Period, PeriodStatus,
};
use crate::LoanbookResult;

/// The schedule augmented with payment standing, plus aggregate figures
/// for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanStatement {
    pub periods: Vec<AllocatedPeriod>,
    /// Evaluation date the statuses were derived against.
    pub as_of: NaiveDate,
    pub total_paid: Money,
    pub total_installments: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    /// `total_installments - total_paid`; negative when overpaid.
    pub amount_outstanding: Money,
    pub percent_complete: Decimal,
    pub overdue_periods: u32,
}

/// Allocate `payments` against `schedule` evaluated at today's wall-clock
/// date with no grace period.
pub fn allocate(
    schedule: &[Period],
    payments: &[Payment],
) -> LoanbookResult<ComputationOutput<LoanStatement>> {
    allocate_as_of(schedule, payments, Local::now().date_naive(), 0)
}

/// Allocate `payments` against `schedule` evaluated at `as_of`.
///
/// A period is `Overdue` when its due date lies more than `grace_days`
/// before `as_of` and an unpaid amount remains; otherwise it is `Current`.
/// Validation is all-or-nothing: a bad payment fails the whole call before
/// any allocation is applied.
pub fn allocate_as_of(
    schedule: &[Period],
    payments: &[Payment],
    as_of: NaiveDate,
    grace_days: u32,
) -> LoanbookResult<ComputationOutput<LoanStatement>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if schedule.is_empty() {
        return Err(LoanbookError::InvalidLoanTerms {
            field: "schedule".into(),
            reason: "schedule must contain at least one period".into(),
        });
    }
    for payment in payments {
        if payment.amount <= Decimal::ZERO {
            return Err(LoanbookError::InvalidPayment {
                reason: format!(
                    "payment dated {} has non-positive amount {}",
                    payment.date, payment.amount
                ),
            });
        }
    }

    // Chronological order is a precondition of the waterfall; enforce it
    // here instead of trusting the storage layer.
    let mut ordered: Vec<&Payment> = payments.iter().collect();
    ordered.sort_by_key(|p| p.date);
    let total_paid: Money = ordered.iter().map(|p| p.amount).sum();

    let cutoff = as_of - Duration::days(i64::from(grace_days));

    let mut pool = total_paid;
    let mut periods = Vec::with_capacity(schedule.len());
    let mut total_installments = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut total_principal = Decimal::ZERO;
    let mut overdue_periods = 0u32;

    for period in schedule {
        let amount_paid = period.installment.min(pool);
        pool -= amount_paid;
        let amount_pending = period.installment - amount_paid;

        let status = if period.due_date < cutoff && amount_pending > Decimal::ZERO {
            overdue_periods += 1;
            PeriodStatus::Overdue
        } else {
            PeriodStatus::Current
        };

        total_installments += period.installment;
        total_interest += period.interest;
        total_principal += period.principal;

        periods.push(AllocatedPeriod {
            period: period.clone(),
            amount_paid: amount_paid.round_dp(2),
            amount_pending: amount_pending.round_dp(2),
            status,
        });
    }

    if pool > Decimal::ZERO {
        warnings.push(format!(
            "payments exceed the scheduled installments by {}",
            pool.round_dp(2)
        ));
    }

    let amount_outstanding = total_installments - total_paid;
    let percent_complete = if total_installments.is_zero() {
        Decimal::ZERO
    } else {
        (total_paid / total_installments * dec!(100)).round_dp(2)
    };

    let statement = LoanStatement {
        periods,
        as_of,
        total_paid,
        total_installments,
        total_interest,
        total_principal,
        amount_outstanding,
        percent_complete,
        overdue_periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Waterfall Payment Allocation",
        &serde_json::json!({
            "as_of": as_of.to_string(),
            "grace_days": grace_days,
            "payment_count": payments.len(),
            "allocation_order": "oldest installment first",
        }),
        warnings,
        elapsed,
        statement,
    ))
}
