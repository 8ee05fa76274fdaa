//! Reports over the ledger
//!
//! Every report is computed fresh from the ledger's current contents and
//! never mutates it. `ReportEngine` is the single entry point used by the CLI.

pub mod breakdown;
pub mod budget_status;
pub mod monthly;
pub mod totals;

pub use breakdown::{CategoryAmount, CategoryBreakdown};
pub use budget_status::{BudgetStatus, BudgetStatusReport};
pub use monthly::{
    export_history_csv, format_history, monthly_history, MonthTotals, MonthlySummary,
};
pub use totals::IncomeExpenseTotals;

use crate::ledger::Ledger;
use crate::models::{BudgetPeriod, TransactionKind};

/// Read-only view over a ledger that produces reports
#[derive(Debug, Clone, Copy)]
pub struct ReportEngine<'a> {
    ledger: &'a Ledger,
}

impl<'a> ReportEngine<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    pub fn total_income_expense(&self) -> IncomeExpenseTotals {
        IncomeExpenseTotals::generate(self.ledger)
    }

    pub fn category_breakdown(&self, kind: TransactionKind) -> CategoryBreakdown {
        CategoryBreakdown::generate(self.ledger, kind)
    }

    pub fn monthly_summary(&self, year: i32) -> MonthlySummary {
        MonthlySummary::generate(self.ledger, year)
    }

    /// Totals for each month with activity, oldest first
    pub fn monthly_history(&self) -> Vec<(BudgetPeriod, MonthTotals)> {
        monthly_history(self.ledger)
    }

    pub fn budget_status(&self) -> BudgetStatusReport {
        BudgetStatusReport::generate(self.ledger)
    }
}
