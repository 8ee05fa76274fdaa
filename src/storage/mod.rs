//! Storage layer for the finance manager
//!
//! Transactions are kept in a CSV file and budgets in a JSON file. All writes
//! are atomic (temp file, then rename). Storage only knows where the files
//! live; the ledger owns the data.

pub mod budgets;
pub mod file_io;
pub mod transactions;

pub use budgets::{load_budgets, save_budgets};
pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use transactions::{load_transactions, save_transactions, SkippedRow, TransactionLoad};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::paths::FinancePaths;
use crate::error::FinanceError;
use crate::models::{Budget, Transaction};

/// File locations for the ledger's data, rooted in the configured data directory
#[derive(Debug, Clone)]
pub struct Storage {
    transactions_path: PathBuf,
    budgets_path: PathBuf,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: &FinancePaths) -> Result<Self, FinanceError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions_path: paths.transactions_file(),
            budgets_path: paths.budgets_file(),
        })
    }

    pub fn transactions_path(&self) -> &Path {
        &self.transactions_path
    }

    pub fn budgets_path(&self) -> &Path {
        &self.budgets_path
    }

    pub fn load_transactions(&self) -> Result<TransactionLoad, FinanceError> {
        load_transactions(&self.transactions_path)
    }

    pub fn save_transactions<'a, I>(
        &self,
        transactions: I,
        unparsed: &[SkippedRow],
    ) -> Result<(), FinanceError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        save_transactions(&self.transactions_path, transactions, unparsed)
    }

    pub fn load_budgets(&self) -> Result<BTreeMap<String, Budget>, FinanceError> {
        load_budgets(&self.budgets_path)
    }

    pub fn save_budgets(&self, budgets: &BTreeMap<String, Budget>) -> Result<(), FinanceError> {
        save_budgets(&self.budgets_path, budgets)
    }
}
