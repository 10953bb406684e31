//! The canonical budgeting-import CSV: what we write and what consolidation
//! reads back.

use chrono::NaiveDate;
use ledgerline_core::{CanonicalTransaction, Money, TransactionDraft};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::StorageError;

pub const HEADER: [&str; 6] = ["Date", "Payee", "Category", "Memo", "Outflow", "Inflow"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CanonicalRow {
    date: String,
    payee: String,
    category: String,
    memo: String,
    outflow: String,
    inflow: String,
}

impl From<&CanonicalTransaction> for CanonicalRow {
    fn from(tx: &CanonicalTransaction) -> Self {
        CanonicalRow {
            date: tx.date.format(DATE_FORMAT).to_string(),
            payee: tx.payee.clone().unwrap_or_default(),
            category: tx.category.clone(),
            memo: tx.memo.clone(),
            outflow: tx.outflow.to_string(),
            inflow: tx.inflow.to_string(),
        }
    }
}

impl CanonicalRow {
    fn into_transaction(self) -> Result<CanonicalTransaction, String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|_| format!("invalid date '{}'", self.date))?;
        let outflow: Money = self.outflow.parse().map_err(|e| format!("{e}"))?;
        let inflow: Money = self.inflow.parse().map_err(|e| format!("{e}"))?;
        CanonicalTransaction::validate(TransactionDraft {
            date,
            payee: Some(self.payee),
            category: self.category,
            memo: self.memo,
            outflow,
            inflow,
        })
        .map_err(|e| e.to_string())
    }
}

pub fn read_from<R: Read>(path: &Path, data: R) -> Result<Vec<CanonicalTransaction>, StorageError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers = reader.headers().map_err(StorageError::csv(path))?.clone();

    let mut transactions = Vec::new();
    for result in reader.records() {
        let record = result.map_err(StorageError::csv(path))?;
        let line = record.position().map_or(0, |p| p.line());
        let invalid = |reason: String| StorageError::InvalidRecord {
            path: path.to_path_buf(),
            line,
            reason,
        };
        let row: CanonicalRow = record
            .deserialize(Some(&headers))
            .map_err(|e| invalid(e.to_string()))?;
        transactions.push(row.into_transaction().map_err(invalid)?);
    }
    Ok(transactions)
}

pub fn read_transactions(path: &Path) -> Result<Vec<CanonicalTransaction>, StorageError> {
    let file = std::fs::File::open(path).map_err(StorageError::io(path))?;
    read_from(path, io::BufReader::new(file))
}

pub fn write_to<W: Write>(
    path: &Path,
    out: W,
    transactions: &[CanonicalTransaction],
) -> Result<(), StorageError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer.write_record(HEADER).map_err(StorageError::csv(path))?;
    for tx in transactions {
        writer
            .serialize(CanonicalRow::from(tx))
            .map_err(StorageError::csv(path))?;
    }
    writer.flush().map_err(StorageError::io(path))
}

/// Writes a new canonical file. Refuses to touch a file that already exists.
pub fn write_transactions(
    path: &Path,
    transactions: &[CanonicalTransaction],
) -> Result<(), StorageError> {
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => StorageError::OutputCollision {
                path: path.to_path_buf(),
            },
            _ => StorageError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;
    write_to(path, io::BufWriter::new(file), transactions)
}
