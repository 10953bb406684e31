use std::path::PathBuf;
use thiserror::Error;

/// Every failure is fatal for the file being imported; nothing is skipped.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Malformed row on line {line} in {} ({reason}): {raw}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        raw: String,
        reason: String,
    },
    #[error("Could not normalize line {line} in {} ({reason}): {raw}", .path.display())]
    Extraction {
        path: PathBuf,
        line: u64,
        raw: String,
        reason: String,
    },
    #[error("Unknown transaction type '{kind}' on line {line} in {}", .path.display())]
    UnknownTransactionType {
        path: PathBuf,
        line: u64,
        kind: String,
    },
    #[error("No transactions in {}", .path.display())]
    EmptyInput { path: PathBuf },
}

