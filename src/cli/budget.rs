//! Budget CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_budget_list;
use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;
use crate::models::{BudgetPeriod, Money};
use crate::storage::Storage;

/// Budget subcommands
#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set (or replace) the allocation for a category
    Set {
        /// Category name
        category: String,
        /// Amount allocated (e.g., "300" or "300.00")
        allocated: String,
        /// Restrict the budget to one month (YYYY-MM); lifetime if omitted
        #[arg(short, long)]
        period: Option<String>,
    },
    /// List all budgets
    #[command(alias = "ls")]
    List,
    /// Remove the budget for a category
    #[command(alias = "rm")]
    Remove {
        /// Category name
        category: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    ledger: &mut Ledger,
    storage: &Storage,
    settings: &Settings,
    cmd: BudgetCommands,
) -> FinanceResult<()> {
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Set {
            category,
            allocated,
            period,
        } => {
            let allocated = Money::parse(&allocated).map_err(|e| {
                FinanceError::Validation(format!("Invalid amount '{}': {}", allocated, e))
            })?;

            let period = period
                .as_deref()
                .map(BudgetPeriod::parse)
                .transpose()
                .map_err(|e| {
                    FinanceError::Validation(format!(
                        "Invalid period format: {}. Use YYYY-MM (e.g., 2025-01)",
                        e
                    ))
                })?;

            let summary = ledger.set_budget(&category, allocated, period)?.to_string();
            ledger.save_budgets(storage)?;

            println!("Budget set: {}", summary);
        }

        BudgetCommands::List => {
            print!("{}", format_budget_list(ledger.budgets(), symbol));
        }

        BudgetCommands::Remove { category } => {
            let removed = ledger.remove_budget(&category)?;
            ledger.save_budgets(storage)?;

            println!("Removed budget for '{}'", removed.category());
        }
    }

    Ok(())
}
