//! Transaction model
//!
//! A transaction is a dated income or expense entry. Amounts are always
//! positive; the direction comes from [`TransactionKind`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TransactionId;
use super::money::Money;
use crate::error::{FinanceError, FinanceResult};

/// Date format used for user input and data files
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Lowercase name as written in data files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => f.pad("Income"),
            Self::Expense => f.pad("Expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(FinanceError::Validation(format!(
                "kind must be 'income' or 'expense', got '{}'",
                s
            ))),
        }
    }
}

/// A validated transaction that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    date: NaiveDate,
    kind: TransactionKind,
    category: String,
    amount: Money,
    description: Option<String>,
}

impl NewTransaction {
    /// Validate typed transaction fields
    ///
    /// The category is trimmed; an empty description is stored as `None`.
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
        description: Option<String>,
    ) -> FinanceResult<Self> {
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(FinanceError::Validation(
                "category must not be empty".into(),
            ));
        }

        if !amount.is_positive() {
            return Err(FinanceError::Validation(format!(
                "amount must be greater than zero, got {}",
                amount.to_decimal_string()
            )));
        }

        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Self {
            date,
            kind,
            category,
            amount,
            description,
        })
    }

    /// Validate raw string fields as typed by a user or read from a file
    pub fn parse(
        date: &str,
        kind: &str,
        category: &str,
        amount: &str,
        description: &str,
    ) -> FinanceResult<Self> {
        let date = parse_date(date)?;
        let kind: TransactionKind = kind.parse()?;
        let amount = Money::parse(amount)
            .map_err(|e| FinanceError::Validation(format!("amount: {}", e)))?;

        Self::new(date, kind, category, amount, Some(description.to_string()))
    }

    /// Attach an id, producing a ledger transaction
    pub(crate) fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            date: self.date,
            kind: self.kind,
            category: self.category,
            amount: self.amount,
            description: self.description,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A financial transaction held by the ledger
///
/// Transactions are immutable once created; an edit is a remove followed by
/// an add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    id: TransactionId,
    date: NaiveDate,
    kind: TransactionKind,
    category: String,
    amount: Money,
    description: Option<String>,
}

impl Transaction {
    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Check whether the transaction falls within an inclusive date range
    pub fn is_between(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.date >= start && self.date <= end
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.date.format(DATE_FORMAT),
            self.kind.as_str(),
            self.category,
            self.amount,
            self.description.as_deref().unwrap_or("")
        )
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> FinanceResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
        FinanceError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", s))
    })
}
