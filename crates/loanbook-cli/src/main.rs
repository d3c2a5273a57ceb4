mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::schedule::ScheduleArgs;
use commands::status::StatusArgs;

/// Loan amortization schedules and payment tracking
#[derive(Parser)]
#[command(
    name = "loanbook",
    version,
    about = "Loan amortization schedules and payment tracking",
    long_about = "A CLI for generating fixed-installment (French) amortization \
                  schedules with decimal precision, allocating recorded payments \
                  against them oldest-installment-first, and reporting per-period \
                  delinquency status."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the amortization schedule for a loan
    Schedule(ScheduleArgs),
    /// Allocate recorded payments against the schedule and report status
    Status(StatusArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Status(args) => commands::status::run_status(args),
        Commands::Version => {
            println!("loanbook {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
