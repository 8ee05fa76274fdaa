//! Budget persistence in JSON
//!
//! The file is an object keyed by category:
//!
//! ```json
//! {
//!   "Groceries": { "allocated": "300.00", "period": "2024-01" },
//!   "Rent": { "allocated": "1200.00" }
//! }
//! ```
//!
//! An array of `{category, allocated_amount, spent_amount, period}` records
//! is also read; it is rewritten as an object on the next save.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{Budget, BudgetPeriod, Money};

use super::file_io::{read_json, write_json_atomic};

/// Entry of the older array layout:
/// `[{"category": "Food", "allocated_amount": 500.0, "spent_amount": 12.0, "period": ""}]`
///
/// `spent_amount` is derived from transactions and ignored.
#[derive(Debug, Deserialize)]
struct LegacyBudget {
    category: String,
    allocated_amount: Money,
    #[serde(default)]
    period: Option<String>,
}

/// Load budgets from a JSON file
///
/// A missing file loads as empty. Any structural problem or invalid entry
/// fails the whole load, naming the file and category. Files in the older
/// array layout are read as well.
pub fn load_budgets(path: &Path) -> FinanceResult<BTreeMap<String, Budget>> {
    let value: Value = match read_json(path)? {
        Some(value) => value,
        None => {
            tracing::debug!(path = %path.display(), "no budget file, starting empty");
            return Ok(BTreeMap::new());
        }
    };

    let entries: Vec<(String, Money, Option<BudgetPeriod>)> = match value {
        Value::Object(_) => serde_json::from_value::<BTreeMap<String, Budget>>(value)
            .map_err(|e| FinanceError::format(path, e.to_string()))?
            .into_iter()
            .map(|(category, budget)| (category, budget.allocated(), budget.period()))
            .collect(),
        Value::Array(_) => serde_json::from_value::<Vec<LegacyBudget>>(value)
            .map_err(|e| FinanceError::format(path, e.to_string()))?
            .into_iter()
            .map(|legacy| legacy_entry(path, legacy))
            .collect(),
        _ => {
            return Err(FinanceError::format(
                path,
                "expected an object keyed by category",
            ))
        }
    };

    let mut budgets = BTreeMap::new();
    for (category, allocated, period) in entries {
        let budget = Budget::new(category.as_str(), allocated, period).map_err(|e| {
            FinanceError::format(path, format!("budget '{}': {}", category, e))
        })?;

        if budgets.contains_key(budget.category()) {
            return Err(FinanceError::format(
                path,
                format!("duplicate budget for category '{}'", budget.category()),
            ));
        }
        budgets.insert(budget.category().to_string(), budget);
    }

    tracing::debug!(path = %path.display(), count = budgets.len(), "loaded budgets");
    Ok(budgets)
}

/// Convert an array-layout entry; periods that are not `YYYY-MM` are dropped
fn legacy_entry(path: &Path, legacy: LegacyBudget) -> (String, Money, Option<BudgetPeriod>) {
    let period = legacy
        .period
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .and_then(|p| match BudgetPeriod::parse(p) {
            Ok(period) => Some(period),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    category = %legacy.category,
                    period = p,
                    error = %e,
                    "ignoring unrecognized budget period"
                );
                None
            }
        });

    (legacy.category, legacy.allocated_amount, period)
}

/// Save budgets to a JSON file, replacing it atomically
pub fn save_budgets(path: &Path, budgets: &BTreeMap<String, Budget>) -> FinanceResult<()> {
    write_json_atomic(path, budgets)?;
    tracing::debug!(path = %path.display(), count = budgets.len(), "saved budgets");
    Ok(())
}
