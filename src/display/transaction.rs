//! Transaction display formatting

use crate::display::report::{separator, truncate};
use crate::models::Transaction;

/// Format a single transaction as one row of the list view
pub fn format_transaction_row(txn: &Transaction, symbol: &str) -> String {
    format!(
        "{:<8} {} {:<8} {:<20} {:>12}  {}",
        txn.id().to_string(),
        txn.date().format("%Y-%m-%d"),
        txn.kind(),
        truncate(txn.category(), 20),
        txn.amount().format_with_symbol(symbol),
        txn.description().unwrap_or("")
    )
    .trim_end()
    .to_string()
}

/// Format a list of transactions as a table
pub fn format_transaction_list<'a, I>(transactions: I, symbol: &str) -> String
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut rows = transactions.into_iter().peekable();
    if rows.peek().is_none() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:10} {:<8} {:<20} {:>12}  {}\n",
        "ID", "Date", "Kind", "Category", "Amount", "Description"
    ));
    output.push_str(&separator(76));
    output.push('\n');

    for txn in rows {
        output.push_str(&format_transaction_row(txn, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id()));
    output.push_str(&format!("Date:        {}\n", txn.date().format("%Y-%m-%d")));
    output.push_str(&format!("Kind:        {}\n", txn.kind()));
    output.push_str(&format!("Category:    {}\n", txn.category()));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount().format_with_symbol(symbol)
    ));

    if let Some(description) = txn.description() {
        output.push_str(&format!("Description: {}\n", description));
    }

    output
}
