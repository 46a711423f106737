use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_core::{TransactionType, YearMonth};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod backup_cmd;
mod budget_cmd;
mod config;
mod insights_cmd;
mod ledger;
mod state;

use backup_cmd::Format;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(name = "tally", version, long_version = LONG_VERSION, about = "Personal expense and income tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default ~/.tally/config.toml
    Init,

    /// Record an expense or an income
    Add {
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        kind: String,

        #[arg(long)]
        amount: String,

        /// Required for expenses, ignored for income
        #[arg(long)]
        category: Option<String>,

        /// One of the configured payment methods
        #[arg(long, default_value = "Cash")]
        payment: String,

        /// YYYY-MM-DD (default: today in the configured timezone)
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// List transactions, newest first
    List {
        /// YYYY-MM
        #[arg(long)]
        month: Option<YearMonth>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long = "type")]
        kind: Option<TransactionType>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Delete a transaction by id
    Delete { id: String },

    /// Income, expense and balance for a month, plus budget status
    Summary {
        /// YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<YearMonth>,
    },

    /// Monthly budget commands
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Top spending categories and month-over-month changes
    Insights {
        #[arg(long, default_value_t = 3)]
        top: usize,
    },

    /// Write a backup of every transaction
    Export {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Output path (default: expense_backup_<timestamp>.<ext> in the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import a JSON backup or a CSV file
    Import { path: PathBuf },
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Set the monthly budget
    Set { amount: String },
    /// Remove the monthly budget
    Clear,
    /// Show this month's spending against the budget
    Status,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Init => config::init_config()?,

        Command::Add {
            kind,
            amount,
            category,
            payment,
            date,
            note,
        } => {
            let cfg = config::load_config()?;
            ledger::add(
                &cfg,
                ledger::AddArgs {
                    kind,
                    amount,
                    category,
                    payment,
                    date,
                    note,
                },
            )?;
        }

        Command::List {
            month,
            category,
            kind,
            limit,
        } => {
            let cfg = config::load_config()?;
            ledger::list(&cfg, month, category, kind, limit)?;
        }

        Command::Delete { id } => ledger::delete(&id)?,

        Command::Summary { month } => {
            let cfg = config::load_config()?;
            ledger::summary(&cfg, month)?;
        }

        Command::Budget { command } => match command {
            BudgetCommand::Set { amount } => budget_cmd::set(&amount)?,
            BudgetCommand::Clear => budget_cmd::clear()?,
            BudgetCommand::Status => {
                let cfg = config::load_config()?;
                budget_cmd::status(&cfg)?;
            }
        },

        Command::Insights { top } => {
            let cfg = config::load_config()?;
            insights_cmd::run(&cfg, top)?;
        }

        Command::Export { format, out } => backup_cmd::export(format, out)?,

        Command::Import { path } => backup_cmd::import(&path)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from(["tally", "list", "--month", "2024-03", "--type", "Income"]).unwrap();
        match cli.command {
            Command::List { month, kind, .. } => {
                assert_eq!(month, YearMonth::new(2024, 3));
                assert_eq!(kind, Some(TransactionType::Income));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_bad_month_rejected() {
        assert!(Cli::try_parse_from(["tally", "summary", "--month", "2024-13"]).is_err());
    }
}
