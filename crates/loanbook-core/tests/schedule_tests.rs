use chrono::NaiveDate;
use loanbook_core::schedule::generate_schedule;
use loanbook_core::{LoanTerms, LoanbookError, PaymentFrequency};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Schedule generation tests
// ===========================================================================

fn sample_monthly_loan() -> LoanTerms {
    // 1200 at 12% nominal over 12 months, paid monthly: 1% per period
    LoanTerms {
        principal: dec!(1200),
        annual_rate_pct: dec!(12),
        term_months: 12,
        frequency: PaymentFrequency::Monthly,
        disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    }
}

#[test]
fn test_schedule_length_and_rate() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let sched = &result.result;

    assert_eq!(sched.total_periods, 12);
    assert_eq!(sched.periods.len(), 12);
    assert_eq!(sched.periodic_rate, dec!(0.01));
}

#[test]
fn test_fixed_installment_annuity_formula() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let sched = &result.result;

    // 1200 * 0.01 / (1 - 1.01^-12) = 106.6186 => 106.62 at 2 dp
    assert_eq!(sched.installment, dec!(106.62));
    for p in &sched.periods {
        assert_eq!(p.installment, dec!(106.62));
    }
}

#[test]
fn test_first_period_split() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let first = &result.result.periods[0];

    assert_eq!(first.interest, dec!(12.00));
    assert_eq!(first.principal, dec!(94.62));
    assert_eq!(first.balance, dec!(1105.38));
}

#[test]
fn test_balance_is_monotonic_and_ends_at_zero() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let periods = &result.result.periods;

    let mut previous = dec!(1200);
    for p in periods {
        assert!(p.balance <= previous, "balance rose in period {}", p.period);
        assert!(p.balance >= Decimal::ZERO);
        previous = p.balance;
    }
    assert_eq!(periods.last().unwrap().balance, Decimal::ZERO);
}

#[test]
fn test_principal_portions_sum_to_principal() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let total: Decimal = result.result.periods.iter().map(|p| p.principal).sum();

    assert!(
        (total - dec!(1200)).abs() <= dec!(0.01),
        "principal portions sum to {total}"
    );
}

#[test]
fn test_interest_decreases_while_principal_grows() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let periods = &result.result.periods;

    for pair in periods.windows(2) {
        assert!(pair[1].interest <= pair[0].interest);
        assert!(pair[1].principal >= pair[0].principal);
    }
}

#[test]
fn test_due_dates_use_fixed_year_fraction() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let periods = &result.result.periods;
    let disbursed = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    // round(1 * 365 / 12) = 30, round(2 * 365 / 12) = 61, final = 365
    assert_eq!(periods[0].due_date, disbursed + chrono::Duration::days(30));
    assert_eq!(periods[1].due_date, disbursed + chrono::Duration::days(61));
    assert_eq!(periods[11].due_date, disbursed + chrono::Duration::days(365));
}

#[test]
fn test_quarterly_due_dates() {
    let terms = LoanTerms {
        term_months: 12,
        frequency: PaymentFrequency::Quarterly,
        ..sample_monthly_loan()
    };
    let result = generate_schedule(&terms).unwrap();
    let periods = &result.result.periods;
    let disbursed = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    assert_eq!(periods.len(), 4);
    // round(1 * 365 / 4) = 91
    assert_eq!(periods[0].due_date, disbursed + chrono::Duration::days(91));
    assert_eq!(periods[3].due_date, disbursed + chrono::Duration::days(365));
}

#[test]
fn test_zero_rate_loan() {
    let terms = LoanTerms {
        principal: dec!(1000),
        annual_rate_pct: Decimal::ZERO,
        term_months: 10,
        frequency: PaymentFrequency::Monthly,
        disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    };
    let result = generate_schedule(&terms).unwrap();
    let sched = &result.result;

    assert_eq!(sched.total_periods, 10);
    for p in &sched.periods {
        assert_eq!(p.installment, dec!(100.00));
        assert_eq!(p.interest, Decimal::ZERO);
        assert_eq!(p.principal, dec!(100.00));
    }
    assert_eq!(sched.total_interest, Decimal::ZERO);
    assert_eq!(sched.total_principal, dec!(1000.00));
}

#[test]
fn test_generation_is_deterministic() {
    let terms = sample_monthly_loan();
    let first = generate_schedule(&terms).unwrap();
    let second = generate_schedule(&terms).unwrap();

    assert_eq!(first.result.periods, second.result.periods);
}

#[test]
fn test_totals_reconcile() {
    let result = generate_schedule(&sample_monthly_loan()).unwrap();
    let sched = &result.result;

    assert_eq!(sched.total_installments, dec!(1279.44));
    assert!((sched.total_principal - dec!(1200)).abs() <= dec!(0.01));
    assert!((sched.total_interest - dec!(79.42)).abs() <= dec!(0.02));
}

#[test]
fn test_invalid_terms_are_rejected_up_front() {
    let zero_principal = LoanTerms {
        principal: Decimal::ZERO,
        ..sample_monthly_loan()
    };
    assert!(matches!(
        generate_schedule(&zero_principal),
        Err(LoanbookError::InvalidLoanTerms { .. })
    ));

    let negative_rate = LoanTerms {
        annual_rate_pct: dec!(-5),
        ..sample_monthly_loan()
    };
    assert!(generate_schedule(&negative_rate).is_err());

    let zero_term = LoanTerms {
        term_months: 0,
        ..sample_monthly_loan()
    };
    assert!(generate_schedule(&zero_term).is_err());

    // 5 months at 1 payment per year never reaches a payment date
    let sub_interval = LoanTerms {
        term_months: 5,
        frequency: PaymentFrequency::Annual,
        ..sample_monthly_loan()
    };
    assert!(matches!(
        generate_schedule(&sub_interval),
        Err(LoanbookError::InvalidLoanTerms { .. })
    ));
}
