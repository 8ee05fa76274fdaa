//! Category breakdown report
//!
//! Sums amounts per category for one transaction kind. The expense breakdown
//! is also the input to the spending chart.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;
use crate::models::{Money, TransactionKind};

/// One category's total in a breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAmount<'a> {
    pub category: &'a str,
    pub amount: Money,
}

/// Summed amounts per category for a single kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub kind: TransactionKind,
    /// Category -> total; categories with no transactions are absent
    pub totals: BTreeMap<String, Money>,
}

impl CategoryBreakdown {
    pub fn generate(ledger: &Ledger, kind: TransactionKind) -> Self {
        let mut totals: BTreeMap<String, Money> = BTreeMap::new();

        for txn in ledger.transactions().iter().filter(|t| t.kind() == kind) {
            *totals.entry(txn.category().to_string()).or_default() += txn.amount();
        }

        Self { kind, totals }
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.totals.get(category).copied()
    }

    /// Sum across all categories
    pub fn total(&self) -> Money {
        self.totals.values().sum()
    }

    /// Entries by amount, largest first; equal amounts by category name
    pub fn ordered(&self) -> Vec<CategoryAmount<'_>> {
        let mut entries: Vec<_> = self
            .totals
            .iter()
            .map(|(category, amount)| CategoryAmount {
                category: category.as_str(),
                amount: *amount,
            })
            .collect();

        entries.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(b.category)));
        entries
    }

    /// Percentage of the breakdown total taken by one category
    ///
    /// `None` if the category is absent or the total is zero.
    pub fn share_of(&self, category: &str) -> Option<f64> {
        let total = self.total();
        if total.is_zero() {
            return None;
        }
        self.get(category)
            .map(|amount| amount.cents() as f64 / total.cents() as f64 * 100.0)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let label = match self.kind {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Category Spending",
        };

        if self.is_empty() {
            return format!("No {} transactions available for report.\n", self.kind.as_str());
        }

        let mut output = String::new();
        output.push_str(&format!("{} Breakdown\n", label));
        output.push_str(&"=".repeat(52));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>12} {:>8}\n", "Category", "Amount", "%"));
        output.push_str(&"-".repeat(52));
        output.push('\n');

        for entry in self.ordered() {
            let share = self.share_of(entry.category).unwrap_or(0.0);
            output.push_str(&format!(
                "{:<30} {:>12} {:>7.1}%\n",
                entry.category,
                entry.amount.format_with_symbol(symbol),
                share
            ));
        }

        output.push_str(&"-".repeat(52));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12}\n",
            "TOTAL",
            self.total().format_with_symbol(symbol)
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        let export_error = |e: csv::Error| FinanceError::Export(e.to_string());

        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["kind", "category", "amount"])
            .map_err(export_error)?;

        for entry in self.ordered() {
            csv_writer.write_record([
                self.kind.as_str(),
                entry.category,
                entry.amount.to_decimal_string().as_str(),
            ])
            .map_err(export_error)?;
        }

        csv_writer.flush().map_err(|e| FinanceError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTransaction;
    use chrono::NaiveDate;

    fn add(ledger: &mut Ledger, kind: TransactionKind, category: &str, units: i64) {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        ledger.add_transaction(
            NewTransaction::new(d, kind, category, Money::from_units(units), None).unwrap(),
        );
    }

    #[test]
    fn test_groups_by_category_for_kind() {
        let mut ledger = Ledger::new();
        add(&mut ledger, TransactionKind::Income, "Salary", 1000);
        add(&mut ledger, TransactionKind::Expense, "Groceries", 200);
        add(&mut ledger, TransactionKind::Expense, "Groceries", 50);

        let breakdown = CategoryBreakdown::generate(&ledger, TransactionKind::Expense);
        assert_eq!(breakdown.totals.len(), 1);
        assert_eq!(breakdown.get("Groceries"), Some(Money::from_units(250)));
        assert_eq!(breakdown.get("Salary"), None);
    }

    #[test]
    fn test_ordered_breaks_ties_by_name() {
        let mut ledger = Ledger::new();
        add(&mut ledger, TransactionKind::Expense, "Rent", 300);
        add(&mut ledger, TransactionKind::Expense, "Fuel", 50);
        add(&mut ledger, TransactionKind::Expense, "Books", 50);

        let breakdown = CategoryBreakdown::generate(&ledger, TransactionKind::Expense);
        let order: Vec<_> = breakdown.ordered().iter().map(|e| e.category).collect();
        assert_eq!(order, vec!["Rent", "Books", "Fuel"]);
    }

    #[test]
    fn test_share_of() {
        let mut ledger = Ledger::new();
        add(&mut ledger, TransactionKind::Expense, "Food", 50);
        add(&mut ledger, TransactionKind::Expense, "Rent", 150);

        let breakdown = CategoryBreakdown::generate(&ledger, TransactionKind::Expense);
        assert_eq!(breakdown.share_of("Food"), Some(25.0));
        assert_eq!(breakdown.share_of("Other"), None);

        let empty = CategoryBreakdown::generate(&Ledger::new(), TransactionKind::Expense);
        assert_eq!(empty.share_of("Food"), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_format_terminal() {
        let mut ledger = Ledger::new();
        add(&mut ledger, TransactionKind::Expense, "Food", 50);
        add(&mut ledger, TransactionKind::Expense, "Rent", 300);

        let output = CategoryBreakdown::generate(&ledger, TransactionKind::Expense).format_terminal("$");
        assert!(output.contains("Food"));
        assert!(output.contains("$300.00"));
        assert!(output.find("Rent").unwrap() < output.find("Food").unwrap());
    }

    #[test]
    fn test_export_csv() {
        let mut ledger = Ledger::new();
        add(&mut ledger, TransactionKind::Expense, "Dining, out", 20);

        let mut out = Vec::new();
        CategoryBreakdown::generate(&ledger, TransactionKind::Expense)
            .export_csv(&mut out)
            .unwrap();

        let csv = String::from_utf8(out).unwrap();
        assert_eq!(csv, "kind,category,amount\nexpense,\"Dining, out\",20.00\n");
    }
}
