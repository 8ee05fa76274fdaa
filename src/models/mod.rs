//! Core data models for the finance manager
//!
//! This module contains the data structures that represent the finance
//! domain: transactions, budgets, money amounts and budget periods.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::Budget;
pub use ids::TransactionId;
pub use money::{Money, MoneyParseError};
pub use period::{BudgetPeriod, PeriodParseError};
pub use transaction::{parse_date, NewTransaction, Transaction, TransactionKind, DATE_FORMAT};
