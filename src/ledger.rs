//! The ledger: in-memory owner of all transactions and budgets
//!
//! A single `Ledger` is constructed by the caller and passed by reference to
//! the report engine and storage. Transactions keep insertion order so that
//! reports and saved files are deterministic.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{FinanceError, FinanceResult};
use crate::models::{
    Budget, BudgetPeriod, Money, NewTransaction, Transaction, TransactionId, TransactionKind,
};
use crate::storage::{SkippedRow, Storage};

/// Income and expense sums
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KindTotals {
    pub income: Money,
    pub expense: Money,
}

impl KindTotals {
    /// Total for one kind
    pub fn get(&self, kind: TransactionKind) -> Money {
        match kind {
            TransactionKind::Income => self.income,
            TransactionKind::Expense => self.expense,
        }
    }
}

/// Outcome of loading the ledger from storage
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub transactions_loaded: usize,
    pub budgets_loaded: usize,
    pub skipped_rows: Vec<SkippedRow>,
}

impl LoadSummary {
    pub fn skipped_count(&self) -> usize {
        self.skipped_rows.len()
    }
}

/// In-memory collections of transactions and budgets
#[derive(Debug, Clone)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    budgets: BTreeMap<String, Budget>,
    next_id: TransactionId,
    /// Rows skipped at load, written back unchanged on save
    unparsed_rows: Vec<SkippedRow>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            budgets: BTreeMap::new(),
            next_id: TransactionId::new(1),
            unparsed_rows: Vec::new(),
        }
    }

    /// Append a transaction, returning its assigned id
    pub fn add_transaction(&mut self, txn: NewTransaction) -> TransactionId {
        let id = self.next_id;
        self.next_id = id.next();

        if txn.kind() == TransactionKind::Expense && !self.budgets.contains_key(txn.category()) {
            tracing::info!(category = txn.category(), "no budget found for category");
        }

        tracing::debug!(%id, kind = txn.kind().as_str(), category = txn.category(), "added transaction");
        self.transactions.push(txn.with_id(id));
        id
    }

    /// Remove a transaction by id
    pub fn remove_transaction(&mut self, id: TransactionId) -> FinanceResult<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| FinanceError::transaction_not_found(id.to_string()))?;

        tracing::debug!(%id, "removed transaction");
        Ok(self.transactions.remove(index))
    }

    /// Look up a transaction by id
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// All transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Transactions dated within `start..=end`, in insertion order
    pub fn transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |t| t.is_between(start, end))
    }

    /// Sum of amounts for each kind, computed fresh from the transactions
    pub fn totals_by_kind(&self) -> KindTotals {
        self.transactions
            .iter()
            .fold(KindTotals::default(), |mut totals, t| {
                match t.kind() {
                    TransactionKind::Income => totals.income += t.amount(),
                    TransactionKind::Expense => totals.expense += t.amount(),
                }
                totals
            })
    }

    /// Create or replace the budget for a category
    ///
    /// The ledger is unchanged if validation fails.
    pub fn set_budget(
        &mut self,
        category: &str,
        allocated: Money,
        period: Option<BudgetPeriod>,
    ) -> FinanceResult<&Budget> {
        let budget = Budget::new(category, allocated, period)?;

        let stored = match self.budgets.entry(budget.category().to_string()) {
            Entry::Occupied(mut entry) => {
                tracing::debug!(category = %entry.key(), "updated budget");
                entry.insert(budget);
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                tracing::debug!(category = %entry.key(), "created budget");
                entry.insert(budget)
            }
        };
        Ok(&*stored)
    }

    /// Remove the budget for a category
    pub fn remove_budget(&mut self, category: &str) -> FinanceResult<Budget> {
        self.budgets
            .remove(category.trim())
            .ok_or_else(|| FinanceError::budget_not_found(category))
    }

    pub fn budget(&self, category: &str) -> Option<&Budget> {
        self.budgets.get(category.trim())
    }

    /// All budgets, ordered by category
    pub fn budgets(&self) -> &BTreeMap<String, Budget> {
        &self.budgets
    }

    /// Expenses counted against a budget
    pub fn spent_for(&self, budget: &Budget) -> Money {
        self.transactions
            .iter()
            .filter(|t| t.is_expense() && t.category() == budget.category() && budget.covers(t.date()))
            .map(|t| t.amount())
            .sum()
    }

    /// Replace the ledger's contents with the data in storage
    ///
    /// Transaction ids are renumbered from 1 in file order. Nothing is replaced
    /// if either file fails to load.
    pub fn load(&mut self, storage: &Storage) -> FinanceResult<LoadSummary> {
        let load = storage.load_transactions()?;
        let budgets = storage.load_budgets()?;

        self.transactions.clear();
        self.next_id = TransactionId::new(1);
        self.budgets = budgets;
        self.unparsed_rows = load.skipped.clone();

        let transactions_loaded = load.transactions.len();
        for txn in load.transactions {
            let id = self.next_id;
            self.next_id = id.next();
            self.transactions.push(txn.with_id(id));
        }

        if !load.skipped.is_empty() {
            tracing::warn!(
                path = %storage.transactions_path().display(),
                skipped = load.skipped.len(),
                "some transaction rows could not be loaded"
            );
        }

        Ok(LoadSummary {
            transactions_loaded,
            budgets_loaded: self.budgets.len(),
            skipped_rows: load.skipped,
        })
    }

    /// Build a ledger from storage
    pub fn open(storage: &Storage) -> FinanceResult<(Self, LoadSummary)> {
        let mut ledger = Self::new();
        let summary = ledger.load(storage)?;
        Ok((ledger, summary))
    }

    /// Rows from the transaction file that failed validation at load
    pub fn unparsed_rows(&self) -> &[SkippedRow] {
        &self.unparsed_rows
    }

    /// Write the transaction file, keeping any rows that failed to load
    pub fn save_transactions(&self, storage: &Storage) -> FinanceResult<()> {
        storage.save_transactions(&self.transactions, &self.unparsed_rows)
    }

    pub fn save_budgets(&self, storage: &Storage) -> FinanceResult<()> {
        storage.save_budgets(&self.budgets)
    }

    /// Write transactions and budgets to storage
    pub fn save(&self, storage: &Storage) -> FinanceResult<()> {
        self.save_transactions(storage)?;
        self.save_budgets(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FinancePaths;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_txn(d: NaiveDate, kind: TransactionKind, category: &str, units: i64) -> NewTransaction {
        NewTransaction::new(d, kind, category, Money::from_units(units), None).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add_transaction(new_txn(date(2024, 1, 5), TransactionKind::Income, "Salary", 1000));
        ledger.add_transaction(new_txn(date(2024, 1, 10), TransactionKind::Expense, "Groceries", 200));
        ledger.add_transaction(new_txn(date(2024, 1, 20), TransactionKind::Expense, "Groceries", 50));
        ledger
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut ledger = Ledger::new();
        let a = ledger.add_transaction(new_txn(date(2024, 1, 1), TransactionKind::Income, "A", 1));
        let b = ledger.add_transaction(new_txn(date(2024, 1, 1), TransactionKind::Income, "B", 1));
        assert_eq!(a, TransactionId::new(1));
        assert_eq!(b, TransactionId::new(2));
    }

    #[test]
    fn test_added_transaction_is_found_by_date_range() {
        let mut ledger = sample_ledger();
        let d = date(2024, 3, 15);
        let id = ledger.add_transaction(new_txn(d, TransactionKind::Expense, "Books", 30));

        let found: Vec<_> = ledger.transactions_between(d, d).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), id);
        assert_eq!(found[0].category(), "Books");
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let ledger = sample_ledger();
        let found: Vec<_> = ledger
            .transactions_between(date(2024, 1, 5), date(2024, 1, 10))
            .map(|t| t.id().value())
            .collect();
        assert_eq!(found, vec![1, 2]);

        assert_eq!(
            ledger
                .transactions_between(date(2024, 2, 1), date(2024, 1, 1))
                .count(),
            0
        );
    }

    #[test]
    fn test_totals_by_kind() {
        let ledger = sample_ledger();
        let totals = ledger.totals_by_kind();
        assert_eq!(totals.income, Money::from_units(1000));
        assert_eq!(totals.expense, Money::from_units(250));
        assert_eq!(totals.get(TransactionKind::Expense), Money::from_units(250));

        assert_eq!(Ledger::new().totals_by_kind(), KindTotals::default());
    }

    #[test]
    fn test_remove_transaction() {
        let mut ledger = sample_ledger();
        let removed = ledger.remove_transaction(TransactionId::new(2)).unwrap();
        assert_eq!(removed.amount(), Money::from_units(200));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.get(TransactionId::new(2)).is_none());

        let err = ledger.remove_transaction(TransactionId::new(2)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut ledger = sample_ledger();
        ledger.remove_transaction(TransactionId::new(3)).unwrap();
        let id = ledger.add_transaction(new_txn(date(2024, 1, 1), TransactionKind::Income, "A", 1));
        assert_eq!(id, TransactionId::new(4));
    }

    #[test]
    fn test_set_budget_upserts() {
        let mut ledger = Ledger::new();
        ledger.set_budget("Groceries", Money::from_units(300), None).unwrap();
        ledger.set_budget("Groceries", Money::from_units(400), None).unwrap();

        assert_eq!(ledger.budgets().len(), 1);
        assert_eq!(
            ledger.budget("Groceries").unwrap().allocated(),
            Money::from_units(400)
        );
    }

    #[test]
    fn test_negative_budget_leaves_state_unchanged() {
        let mut ledger = Ledger::new();
        ledger.set_budget("Groceries", Money::from_units(300), None).unwrap();

        let err = ledger
            .set_budget("Groceries", Money::from_units(-10), None)
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(
            ledger.budget("Groceries").unwrap().allocated(),
            Money::from_units(300)
        );

        assert!(ledger.set_budget("Fuel", Money::from_units(-10), None).is_err());
        assert!(ledger.budget("Fuel").is_none());
    }

    #[test]
    fn test_remove_budget() {
        let mut ledger = Ledger::new();
        ledger.set_budget("Fuel", Money::from_units(80), None).unwrap();
        assert!(ledger.remove_budget("Fuel").is_ok());
        assert!(ledger.remove_budget("Fuel").unwrap_err().is_not_found());
    }

    #[test]
    fn test_spent_for_respects_period() {
        let mut ledger = sample_ledger();
        ledger.add_transaction(new_txn(date(2024, 2, 3), TransactionKind::Expense, "Groceries", 70));

        let lifetime = Budget::new("Groceries", Money::from_units(300), None).unwrap();
        let january = Budget::new(
            "Groceries",
            Money::from_units(300),
            Some(BudgetPeriod::monthly(2024, 1).unwrap()),
        )
        .unwrap();

        assert_eq!(ledger.spent_for(&lifetime), Money::from_units(320));
        assert_eq!(ledger.spent_for(&january), Money::from_units(250));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();

        let mut ledger = sample_ledger();
        ledger.set_budget("Groceries", Money::from_units(300), None).unwrap();
        ledger.save(&storage).unwrap();

        let (loaded, summary) = Ledger::open(&storage).unwrap();
        assert_eq!(summary.transactions_loaded, 3);
        assert_eq!(summary.budgets_loaded, 1);
        assert_eq!(summary.skipped_count(), 0);
        assert_eq!(loaded.transactions(), ledger.transactions());
        assert_eq!(loaded.budgets(), ledger.budgets());
    }

    #[test]
    fn test_save_keeps_rows_that_failed_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();
        std::fs::write(
            storage.transactions_path(),
            "date,kind,category,amount,description\n\
             2024-01-05,income,Salary,1000.00,\n\
             2024-01-06,expense,Rent,12OO.00,typo\n",
        )
        .unwrap();

        let (mut ledger, summary) = Ledger::open(&storage).unwrap();
        assert_eq!(summary.skipped_count(), 1);
        assert_eq!(ledger.unparsed_rows().len(), 1);

        ledger.add_transaction(new_txn(date(2024, 1, 8), TransactionKind::Expense, "Fuel", 40));
        ledger.save(&storage).unwrap();

        let contents = std::fs::read_to_string(storage.transactions_path()).unwrap();
        assert!(contents.contains("2024-01-06,expense,Rent,12OO.00,typo"));

        let (reloaded, summary) = Ledger::open(&storage).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(summary.skipped_count(), 1);
    }

    #[test]
    fn test_save_budgets_leaves_transaction_file_alone() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();
        let raw = "date,kind,category,amount,description\nbroken row\n";
        std::fs::write(storage.transactions_path(), raw).unwrap();

        let (mut ledger, _) = Ledger::open(&storage).unwrap();
        ledger.set_budget("Food", Money::from_units(10), None).unwrap();
        ledger.save_budgets(&storage).unwrap();

        assert_eq!(std::fs::read_to_string(storage.transactions_path()).unwrap(), raw);
        assert!(storage.load_budgets().unwrap().contains_key("Food"));
    }

    #[test]
    fn test_failed_load_keeps_existing_state() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(&paths).unwrap();
        std::fs::write(storage.budgets_path(), "{ broken").unwrap();

        let mut ledger = sample_ledger();
        assert!(ledger.load(&storage).unwrap_err().is_format());
        assert_eq!(ledger.len(), 3);
    }
}
