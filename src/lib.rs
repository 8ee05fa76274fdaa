//! Finance Manager - personal income, expense and budget tracking
//!
//! The crate is organized into the following modules:
//!
//! - `models`: Money, transactions, budgets and budget periods
//! - `ledger`: In-memory collection of transactions and budgets
//! - `storage`: CSV/JSON persistence with atomic writes
//! - `reports`: Totals, category, monthly and budget status reports
//! - `chart`: Text bar chart of spending by category
//! - `config`: Path resolution and user settings
//! - `cli`, `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_manager::config::FinancePaths;
//! use finance_manager::ledger::Ledger;
//! use finance_manager::reports::ReportEngine;
//! use finance_manager::storage::Storage;
//!
//! let storage = Storage::new(&FinancePaths::new()?)?;
//! let (ledger, _) = Ledger::open(&storage)?;
//! let totals = ReportEngine::new(&ledger).total_income_expense();
//! ```

pub mod chart;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod storage;

pub use error::{FinanceError, FinanceResult};
