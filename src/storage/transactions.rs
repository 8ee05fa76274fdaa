//! Transaction persistence in CSV
//!
//! The file has a header row `date,kind,category,amount,description` and one
//! transaction per row. Malformed rows are skipped and reported rather than
//! failing the whole load, and their raw fields are kept so a later save can
//! write them back untouched.

use std::fs::File;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder, StringRecord, WriterBuilder};

use crate::error::{FinanceError, FinanceResult};
use crate::models::{NewTransaction, Transaction, DATE_FORMAT};

use super::file_io::write_atomic;

/// Column names, in file order
pub const TRANSACTION_COLUMNS: [&str; 5] = ["date", "kind", "category", "amount", "description"];

/// Older files name the kind column `transaction_type`
const KIND_COLUMN_ALIAS: &str = "transaction_type";

/// A row that could not be loaded
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the file
    pub line: u64,
    /// Why the row was rejected
    pub reason: String,
    /// The row's fields exactly as read
    pub record: ByteRecord,
}

/// Result of loading a transaction file
#[derive(Debug, Clone, Default)]
pub struct TransactionLoad {
    /// Valid rows, in file order
    pub transactions: Vec<NewTransaction>,
    /// Rows that were skipped
    pub skipped: Vec<SkippedRow>,
}

impl TransactionLoad {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Load transactions from a CSV file
///
/// A missing or zero-length file loads as empty. An unreadable file or a header that does not
/// match the expected columns is an error; bad data rows are skipped.
pub fn load_transactions(path: &Path) -> FinanceResult<TransactionLoad> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no transaction file, starting empty");
        return Ok(TransactionLoad::default());
    }

    let file = File::open(path)
        .map_err(|e| FinanceError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .byte_headers()
        .map_err(|e| FinanceError::format(path, format!("unreadable header: {}", e)))?
        .clone();
    if headers.is_empty() {
        tracing::debug!(path = %path.display(), "transaction file is empty");
        return Ok(TransactionLoad::default());
    }
    let headers = StringRecord::from_byte_record(headers)
        .map_err(|_| FinanceError::format_at(path, 1, "header is not valid UTF-8"))?;
    check_headers(path, &headers)?;

    let mut load = TransactionLoad::default();

    for result in reader.byte_records() {
        let record = result.map_err(|e| match e.kind() {
            csv::ErrorKind::Io(_) => {
                FinanceError::Io(format!("Failed to read {}: {}", path.display(), e))
            }
            _ => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                FinanceError::format_at(path, line, e.to_string())
            }
        })?;

        if record
            .iter()
            .all(|field| field.iter().all(u8::is_ascii_whitespace))
        {
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let parsed = StringRecord::from_byte_record(record.clone())
            .map_err(|_| "row is not valid UTF-8".to_string())
            .and_then(|fields| parse_record(&fields));

        match parsed {
            Ok(txn) => load.transactions.push(txn),
            Err(reason) => {
                tracing::warn!(
                    path = %path.display(),
                    line,
                    %reason,
                    "skipping malformed transaction row"
                );
                load.skipped.push(SkippedRow {
                    line,
                    reason,
                    record,
                });
            }
        }
    }

    tracing::debug!(
        path = %path.display(),
        loaded = load.transactions.len(),
        skipped = load.skipped.len(),
        "loaded transactions"
    );

    Ok(load)
}

fn check_headers(path: &Path, headers: &StringRecord) -> FinanceResult<()> {
    let names: Vec<String> = headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();

    let matches = names.len() == TRANSACTION_COLUMNS.len()
        && names.iter().zip(TRANSACTION_COLUMNS).all(|(name, expected)| {
            name == expected || (expected == "kind" && name == KIND_COLUMN_ALIAS)
        });

    if matches {
        Ok(())
    } else {
        Err(FinanceError::format_at(
            path,
            1,
            format!(
                "expected header '{}', found '{}'",
                TRANSACTION_COLUMNS.join(","),
                names.join(",")
            ),
        ))
    }
}

/// Validate one data row against the schema
fn parse_record(record: &StringRecord) -> Result<NewTransaction, String> {
    if record.len() != TRANSACTION_COLUMNS.len() {
        return Err(format!(
            "expected {} fields, found {}",
            TRANSACTION_COLUMNS.len(),
            record.len()
        ));
    }

    let field = |i: usize| record.get(i).unwrap_or("");

    NewTransaction::parse(field(0), field(1), field(2), field(3), field(4))
        .map_err(|e| match e {
            FinanceError::Validation(msg) => msg,
            other => other.to_string(),
        })
}

/// Save transactions to a CSV file, replacing it atomically
///
/// `unparsed` rows from an earlier load are written back after the valid
/// rows, field for field, so the user can still correct them.
pub fn save_transactions<'a, I>(
    path: &Path,
    transactions: I,
    unparsed: &[SkippedRow],
) -> FinanceResult<()>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let csv_error = |e: csv::Error| {
        FinanceError::Io(format!("Failed to write {}: {}", path.display(), e))
    };

    let mut count = 0usize;
    write_atomic(path, |out| {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(out);
        writer.write_record(TRANSACTION_COLUMNS).map_err(csv_error)?;

        for txn in transactions {
            let date = txn.date().format(DATE_FORMAT).to_string();
            let amount = txn.amount().to_decimal_string();
            writer
                .write_record([
                    date.as_str(),
                    txn.kind().as_str(),
                    txn.category(),
                    amount.as_str(),
                    txn.description().unwrap_or(""),
                ])
                .map_err(csv_error)?;
            count += 1;
        }

        for row in unparsed {
            writer.write_byte_record(&row.record).map_err(csv_error)?;
        }

        writer.flush()?;
        Ok(())
    })?;

    tracing::debug!(
        path = %path.display(),
        count,
        unparsed = unparsed.len(),
        "saved transactions"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, TransactionId, TransactionKind};
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn txn(id: u64, date: &str, kind: &str, category: &str, amount: &str, desc: &str) -> Transaction {
        NewTransaction::parse(date, kind, category, amount, desc)
            .unwrap()
            .with_id(TransactionId::new(id))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let load = load_transactions(&temp_dir.path().join("none.csv")).unwrap();
        assert!(load.transactions.is_empty());
        assert_eq!(load.skipped_count(), 0);
    }

    #[test]
    fn test_save_and_reload_preserves_order_and_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        let original = vec![
            txn(1, "2024-01-20", "expense", "Groceries", "50", "Market, \"organic\""),
            txn(2, "2024-01-05", "income", "Salary", "1000", "Paycheck"),
            txn(3, "2024-01-10", "expense", "Groceries", "200.15", ""),
        ];

        save_transactions(&path, &original, &[]).unwrap();
        let load = load_transactions(&path).unwrap();

        assert_eq!(load.skipped_count(), 0);
        assert_eq!(load.transactions.len(), 3);
        for (loaded, saved) in load.transactions.iter().zip(&original) {
            assert_eq!(loaded.date(), saved.date());
            assert_eq!(loaded.kind(), saved.kind());
            assert_eq!(loaded.category(), saved.category());
            assert_eq!(loaded.amount(), saved.amount());
            assert_eq!(loaded.description(), saved.description());
        }
    }

    #[test]
    fn test_saved_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");

        save_transactions(&path, &[txn(1, "2024-01-05", "income", "Salary", "1000", "")], &[])
            .unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "date,kind,category,amount,description\n2024-01-05,income,Salary,1000.00,\n"
        );
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,kind,category,amount,description\n\
             2024-01-05,income,Salary,1000,Paycheck\n\
             2024-01-06,expense,Food,not-a-number,Lunch\n\
             2024-01-10,expense,Groceries,200,\n\
             2024-01-20,expense,Groceries,50,\"Corner shop, late\"\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();

        assert_eq!(load.transactions.len(), 3);
        assert_eq!(load.skipped_count(), 1);
        assert_eq!(load.skipped[0].line, 3);
        assert!(load.skipped[0].reason.contains("not-a-number"));
        assert_eq!(load.transactions[2].description(), Some("Corner shop, late"));
    }

    #[test]
    fn test_skipped_rows_are_written_back_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,kind,category,amount,description\n\
             2024-01-05,income,Salary,1000.00,\n\
             2024-01-06,expense,Rent,12OO.00,typo\n\
             2024-01-07,expense,Fuel\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();
        assert_eq!(load.skipped_count(), 2);

        let kept = vec![load.transactions[0].clone().with_id(TransactionId::new(1))];
        save_transactions(&path, &kept, &load.skipped).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("2024-01-06,expense,Rent,12OO.00,typo\n"));
        assert!(contents.contains("2024-01-07,expense,Fuel\n"));

        let reloaded = load_transactions(&path).unwrap();
        assert_eq!(reloaded.transactions.len(), 1);
        assert_eq!(reloaded.skipped_count(), 2);
    }

    #[test]
    fn test_rows_with_wrong_field_count_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,kind,category,amount,description\n\
             2024-01-05,income,Salary\n\
             2024-01-05,income,Salary,10,a,b\n\
             2024-01-05,income,Salary,10,ok\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();
        assert_eq!(load.transactions.len(), 1);
        assert_eq!(load.skipped_count(), 2);
        assert!(load.skipped[0].reason.contains("expected 5 fields, found 3"));
    }

    #[test]
    fn test_invalid_values_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,kind,category,amount,description\n\
             2024-13-01,income,Salary,10,\n\
             2024-01-01,gift,Salary,10,\n\
             2024-01-01,income,,10,\n\
             2024-01-01,income,Salary,0,\n\
             2024-01-01,income,Salary,-5,\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();
        assert!(load.transactions.is_empty());
        assert_eq!(load.skipped_count(), 5);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,kind,category,amount,description\n\n2024-01-05,income,Salary,10,\n\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();
        assert_eq!(load.transactions.len(), 1);
        assert_eq!(load.skipped_count(), 0);
    }

    #[test]
    fn test_wrong_header_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(&path, "when,what,amount\n2024-01-05,Salary,10\n").unwrap();

        let err = load_transactions(&path).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_transaction_type_header_accepted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(
            &path,
            "date,transaction_type,category,amount,description\n\
             2025-06-25,expense,Food,50.0,Groceries\n",
        )
        .unwrap();

        let load = load_transactions(&path).unwrap();
        assert_eq!(load.transactions.len(), 1);
        let loaded = &load.transactions[0];
        assert_eq!(loaded.kind(), TransactionKind::Expense);
        assert_eq!(loaded.amount(), Money::from_units(50));
        assert_eq!(loaded.date(), NaiveDate::from_ymd_opt(2025, 6, 25).unwrap());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.csv");
        fs::write(&path, "").unwrap();

        let load = load_transactions(&path).unwrap();
        assert!(load.transactions.is_empty());
    }
}
