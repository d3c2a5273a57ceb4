use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loanbook_core::schedule;
use loanbook_core::{LoanTerms, PaymentFrequency};

use crate::input;

/// Loan term flags shared by the schedule and status commands.
#[derive(Args)]
pub struct TermsArgs {
    /// Principal amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual nominal interest rate as a percentage (12 = 12%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term length in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Payments per year: 12, 4, 2 or 1
    #[arg(long)]
    pub frequency: Option<u32>,

    /// Disbursement date (YYYY-MM-DD)
    #[arg(long)]
    pub disbursed: Option<NaiveDate>,
}

impl TermsArgs {
    pub fn resolve(self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        let frequency_raw = self
            .frequency
            .ok_or("--frequency is required (or provide --input)")?;
        Ok(LoanTerms {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: self.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: self
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            frequency: PaymentFrequency::try_from(frequency_raw)?,
            disbursement_date: self
                .disbursed
                .ok_or("--disbursed is required (or provide --input)")?,
        })
    }
}

/// Arguments for schedule generation
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to a JSON or YAML file holding the loan terms (overrides flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: TermsArgs,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::read_file(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.terms.resolve()?
    };

    let result = schedule::generate_schedule(&terms)?;
    Ok(serde_json::to_value(result)?)
}
