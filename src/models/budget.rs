//! Budget model
//!
//! A budget is a planned spending limit for one category. The amount spent is
//! always derived from the ledger's transactions and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::period::BudgetPeriod;
use crate::error::{FinanceError, FinanceResult};

/// A spending allocation for a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(skip)]
    category: String,

    /// The planned spend limit
    allocated: Money,

    /// Month the budget applies to; `None` means it covers the whole ledger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    period: Option<BudgetPeriod>,
}

impl Budget {
    /// Create a validated budget
    pub fn new(
        category: impl Into<String>,
        allocated: Money,
        period: Option<BudgetPeriod>,
    ) -> FinanceResult<Self> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(FinanceError::Validation(
                "budget category must not be empty".into(),
            ));
        }

        if allocated.is_negative() {
            return Err(FinanceError::Validation(format!(
                "allocated amount must not be negative, got {}",
                allocated.to_decimal_string()
            )));
        }

        Ok(Self {
            category,
            allocated,
            period,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn allocated(&self) -> Money {
        self.allocated
    }

    pub fn period(&self) -> Option<BudgetPeriod> {
        self.period
    }

    /// Whether an expense on this date counts against the budget
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.period {
            Some(period) => period.contains(date),
            None => true,
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} allocated", self.category, self.allocated)?;
        if let Some(period) = self.period {
            write!(f, ", Period: {}", period)?;
        }
        Ok(())
    }
}
