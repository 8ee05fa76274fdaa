//! Monthly income/expense summaries

use std::collections::BTreeMap;
use std::io::Write;

use chrono::Datelike;

use crate::error::{FinanceError, FinanceResult};
use crate::ledger::Ledger;
use crate::models::{BudgetPeriod, Money, TransactionKind};

/// Income and expense for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthTotals {
    pub income: Money,
    pub expense: Money,
}

impl MonthTotals {
    fn add(&mut self, kind: TransactionKind, amount: Money) {
        match kind {
            TransactionKind::Income => self.income += amount,
            TransactionKind::Expense => self.expense += amount,
        }
    }

    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Twelve months of totals for a single year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    /// Index 0 is January
    months: [MonthTotals; 12],
}

impl MonthlySummary {
    /// Summarize the transactions dated in `year`; inactive months stay (0, 0)
    pub fn generate(ledger: &Ledger, year: i32) -> Self {
        let mut months = [MonthTotals::default(); 12];

        for txn in ledger.transactions().iter().filter(|t| t.date().year() == year) {
            months[txn.date().month0() as usize].add(txn.kind(), txn.amount());
        }

        Self { year, months }
    }

    /// Totals for a month numbered 1-12
    pub fn month(&self, month: u32) -> Option<MonthTotals> {
        month
            .checked_sub(1)
            .and_then(|i| self.months.get(i as usize))
            .copied()
    }

    /// (month number, totals) for all twelve months
    pub fn iter(&self) -> impl Iterator<Item = (u32, MonthTotals)> + '_ {
        self.months
            .iter()
            .enumerate()
            .map(|(i, totals)| (i as u32 + 1, *totals))
    }

    pub fn year_totals(&self) -> MonthTotals {
        self.months.iter().fold(MonthTotals::default(), |acc, m| MonthTotals {
            income: acc.income + m.income,
            expense: acc.expense + m.expense,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Monthly Summary: {}\n", self.year));
        output.push_str(&"=".repeat(52));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            "Month", "Income", "Expenses", "Net"
        ));
        output.push_str(&"-".repeat(52));
        output.push('\n');

        for (month, totals) in self.iter() {
            output.push_str(&format!(
                "{:<8} {:>14} {:>14} {:>14}\n",
                format!("{:04}-{:02}", self.year, month),
                totals.income.format_with_symbol(symbol),
                totals.expense.format_with_symbol(symbol),
                totals.net().format_with_symbol(symbol),
            ));
        }

        let year = self.year_totals();
        output.push_str(&"-".repeat(52));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:>14} {:>14} {:>14}\n",
            "TOTAL",
            year.income.format_with_symbol(symbol),
            year.expense.format_with_symbol(symbol),
            year.net().format_with_symbol(symbol),
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> FinanceResult<()> {
        write_month_rows(
            writer,
            self.iter().map(|(month, totals)| {
                (format!("{:04}-{:02}", self.year, month), totals)
            }),
        )
    }
}

/// Totals for every month that has at least one transaction, oldest first
pub fn monthly_history(ledger: &Ledger) -> Vec<(BudgetPeriod, MonthTotals)> {
    let mut history: BTreeMap<BudgetPeriod, MonthTotals> = BTreeMap::new();

    for txn in ledger.transactions() {
        history
            .entry(BudgetPeriod::containing(txn.date()))
            .or_default()
            .add(txn.kind(), txn.amount());
    }

    history.into_iter().collect()
}

/// Format the month-by-month history for terminal display
pub fn format_history(history: &[(BudgetPeriod, MonthTotals)], symbol: &str) -> String {
    if history.is_empty() {
        return "No transactions available for report.\n".to_string();
    }

    let mut output = String::from("Monthly Summary:\n");
    for (period, totals) in history {
        output.push_str(&format!(
            "{}: Income: {}, Expenses: {}\n",
            period,
            totals.income.format_with_symbol(symbol),
            totals.expense.format_with_symbol(symbol),
        ));
    }
    output
}

/// Export the month-by-month history to CSV format
pub fn export_history_csv<W: Write>(
    history: &[(BudgetPeriod, MonthTotals)],
    writer: W,
) -> FinanceResult<()> {
    write_month_rows(
        writer,
        history.iter().map(|(period, totals)| (period.to_string(), *totals)),
    )
}

fn write_month_rows<W, I>(writer: W, rows: I) -> FinanceResult<()>
where
    W: Write,
    I: IntoIterator<Item = (String, MonthTotals)>,
{
    let export_error = |e: csv::Error| FinanceError::Export(e.to_string());

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["month", "income", "expense", "net"])
        .map_err(export_error)?;

    for (month, totals) in rows {
        csv_writer
            .write_record([
                month,
                totals.income.to_decimal_string(),
                totals.expense.to_decimal_string(),
                totals.net().to_decimal_string(),
            ])
            .map_err(export_error)?;
    }

    csv_writer
        .flush()
        .map_err(|e| FinanceError::Export(e.to_string()))
}
