use chrono::{Local, NaiveDate};
use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use loanbook_core::{allocation, schedule, LoanTerms, Payment};

use crate::commands::schedule::TermsArgs;
use crate::input;

/// Arguments for payment allocation and status reporting
#[derive(Args)]
pub struct StatusArgs {
    /// Path to a JSON or YAML file holding { "terms": ..., "payments": [...] }
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub terms: TermsArgs,

    /// Path to a JSON or YAML file holding the payment records
    #[arg(long)]
    pub payments: Option<String>,

    /// Evaluation date (defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Days past the due date before an unpaid period counts as overdue
    #[arg(long, default_value_t = 0)]
    pub grace_days: u32,
}

#[derive(Debug, Deserialize)]
struct StatusInput {
    terms: LoanTerms,
    #[serde(default)]
    payments: Vec<Payment>,
}

pub fn run_status(args: StatusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let status_input: StatusInput = if let Some(ref path) = args.input {
        input::read_file(path)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let terms = args.terms.resolve()?;
        let payments: Vec<Payment> = match args.payments {
            Some(ref path) => input::read_file(path)?,
            None => Vec::new(),
        };
        StatusInput { terms, payments }
    };

    let schedule = schedule::generate_schedule(&status_input.terms)?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let result = allocation::allocate_as_of(
        &schedule.result.periods,
        &status_input.payments,
        as_of,
        args.grace_days,
    )?;
    Ok(serde_json::to_value(result)?)
}
