//! Budget display formatting

use std::collections::BTreeMap;

use crate::display::report::separator;
use crate::models::Budget;

/// Format all budgets as a table, sorted by category
pub fn format_budget_list(budgets: &BTreeMap<String, Budget>, symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<24} {:>12} {:>8}\n",
        "Category", "Allocated", "Period"
    ));
    output.push_str(&separator(46));
    output.push('\n');

    for budget in budgets.values() {
        let period = budget
            .period()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "all".to_string());
        output.push_str(&format!(
            "{:<24} {:>12} {:>8}\n",
            budget.category(),
            budget.allocated().format_with_symbol(symbol),
            period
        ));
    }

    output
}
