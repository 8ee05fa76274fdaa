//! Transaction CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_list};
use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;
use crate::models::{parse_date, BudgetPeriod, NewTransaction, TransactionId};
use crate::storage::Storage;

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a new transaction
    Add {
        /// "income" or "expense"
        kind: String,
        /// Category name
        category: String,
        /// Positive amount (e.g., "42" or "42.50")
        amount: String,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// List transactions, optionally within a date range
    List {
        /// Start date (YYYY-MM-DD), inclusive
        #[arg(long, conflicts_with = "month")]
        from: Option<String>,
        /// End date (YYYY-MM-DD), inclusive
        #[arg(long, conflicts_with = "month")]
        to: Option<String>,
        /// Only transactions in this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Remove a transaction
    #[command(alias = "rm")]
    Remove {
        /// Transaction ID as shown by `transaction list` (e.g., "txn-3" or "3")
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    ledger: &mut Ledger,
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> FinanceResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            kind,
            category,
            amount,
            date,
            description,
        } => {
            let date = match date {
                Some(date) => date,
                None => chrono::Local::now()
                    .date_naive()
                    .format(crate::models::DATE_FORMAT)
                    .to_string(),
            };

            let txn = NewTransaction::parse(
                &date,
                &kind,
                &category,
                &amount,
                description.as_deref().unwrap_or(""),
            )?;

            let has_budget = ledger.budget(txn.category()).is_some();
            let is_expense = txn.kind() == crate::models::TransactionKind::Expense;

            let id = ledger.add_transaction(txn);
            ledger.save_transactions(storage)?;

            if let Some(txn) = ledger.get(id) {
                println!("Added transaction:");
                print!("{}", format_transaction_details(txn, symbol));
                if is_expense && !has_budget {
                    println!(
                        "Note: no budget is set for '{}'. Use 'finance budget set' to add one.",
                        txn.category()
                    );
                }
            }
        }

        TransactionCommands::List { from, to, month } => {
            let (start, end) = match month {
                Some(month) => {
                    let period = BudgetPeriod::parse(&month).map_err(|e| {
                        FinanceError::Validation(format!(
                            "Invalid month format: {}. Use YYYY-MM (e.g., 2025-01)",
                            e
                        ))
                    })?;
                    (period.start_date(), period.end_date())
                }
                None => (
                    parse_optional_date(from.as_deref())?.unwrap_or(NaiveDate::MIN),
                    parse_optional_date(to.as_deref())?.unwrap_or(NaiveDate::MAX),
                ),
            };

            if start > end {
                return Err(FinanceError::Validation(format!(
                    "start date {} is after end date {}",
                    start, end
                )));
            }

            print!(
                "{}",
                format_transaction_list(ledger.transactions_between(start, end), symbol)
            );
        }

        TransactionCommands::Remove { id } => {
            let id: TransactionId = id.parse().map_err(|_| {
                FinanceError::Validation(format!(
                    "Invalid transaction ID: '{}'. Use the ID shown by 'transaction list'",
                    id
                ))
            })?;

            let removed = ledger.remove_transaction(id)?;
            ledger.save_transactions(storage)?;

            println!("Removed transaction {}: {}", id, removed);
        }
    }

    Ok(())
}

fn parse_optional_date(value: Option<&str>) -> FinanceResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}
