//! Income/expense totals report

use crate::ledger::Ledger;
use crate::models::Money;

/// Total income, total expenses and the net between them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IncomeExpenseTotals {
    pub income: Money,
    pub expense: Money,
    /// income - expense
    pub net: Money,
}

impl IncomeExpenseTotals {
    pub fn generate(ledger: &Ledger) -> Self {
        let totals = ledger.totals_by_kind();
        Self {
            income: totals.income,
            expense: totals.expense,
            net: totals.income - totals.expense,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        if self.income.is_zero() && self.expense.is_zero() {
            return "No transactions available for report.\n".to_string();
        }

        format!(
            "Total Income:   {:>14}\nTotal Expenses: {:>14}\nNet:            {:>14}\n",
            self.income.format_with_symbol(symbol),
            self.expense.format_with_symbol(symbol),
            self.net.format_with_symbol(symbol),
        )
    }
}
