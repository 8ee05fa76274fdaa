//! Budget status report
//!
//! Compares each budget's allocation with what has been spent in its window.

use std::collections::BTreeMap;

use crate::ledger::Ledger;
use crate::models::{BudgetPeriod, Money};

/// Status of a single budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatus {
    pub allocated: Money,
    pub spent: Money,
    /// allocated - spent; negative once over budget
    pub remaining: Money,
    pub over_budget: bool,
    /// Share of the allocation spent; `None` when nothing was allocated
    pub percent_used: Option<f64>,
    pub period: Option<BudgetPeriod>,
}

impl BudgetStatus {
    fn new(allocated: Money, spent: Money, period: Option<BudgetPeriod>) -> Self {
        let percent_used = if allocated.is_zero() {
            None
        } else {
            Some(spent.cents() as f64 / allocated.cents() as f64 * 100.0)
        };

        Self {
            allocated,
            spent,
            remaining: allocated - spent,
            over_budget: spent > allocated,
            percent_used,
            period,
        }
    }
}

/// Status of every budget, keyed by category
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BudgetStatusReport {
    pub categories: BTreeMap<String, BudgetStatus>,
}

impl BudgetStatusReport {
    pub fn generate(ledger: &Ledger) -> Self {
        let categories = ledger
            .budgets()
            .iter()
            .map(|(category, budget)| {
                let status = BudgetStatus::new(
                    budget.allocated(),
                    ledger.spent_for(budget),
                    budget.period(),
                );
                (category.clone(), status)
            })
            .collect();

        Self { categories }
    }

    pub fn get(&self, category: &str) -> Option<&BudgetStatus> {
        self.categories.get(category)
    }

    /// Categories whose spending exceeds the allocation
    pub fn overspent(&self) -> impl Iterator<Item = (&str, &BudgetStatus)> {
        self.categories
            .iter()
            .filter(|(_, status)| status.over_budget)
            .map(|(category, status)| (category.as_str(), status))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        if self.categories.is_empty() {
            return "No budgets found.\n".to_string();
        }

        let mut output = String::new();
        output.push_str("Budget Status\n");
        output.push_str(&"=".repeat(84));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>8} {:>12} {:>12} {:>12} {:>7}\n",
            "Category", "Period", "Allocated", "Spent", "Remaining", "Used"
        ));
        output.push_str(&"-".repeat(84));
        output.push('\n');

        for (category, status) in &self.categories {
            let period = status
                .period
                .map(|p| p.to_string())
                .unwrap_or_else(|| "all".to_string());
            let used = status
                .percent_used
                .map(|p| format!("{:.0}%", p))
                .unwrap_or_else(|| "-".to_string());
            let marker = if status.over_budget { " OVER" } else { "" };

            output.push_str(&format!(
                "{:<24} {:>8} {:>12} {:>12} {:>12} {:>7}{}\n",
                category,
                period,
                status.allocated.format_with_symbol(symbol),
                status.spent.format_with_symbol(symbol),
                status.remaining.format_with_symbol(symbol),
                used,
                marker
            ));
        }

        output
    }
}
