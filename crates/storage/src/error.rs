use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
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
    #[error("Found file that does not match the archive name pattern: {}", .path.display())]
    CorruptArchiveName { path: PathBuf },
    #[error("The file {} already exists", .path.display())]
    OutputCollision { path: PathBuf },
    #[error("Invalid record on line {line} in {} ({reason})", .path.display())]
    InvalidRecord {
        path: PathBuf,
        line: u64,
        reason: String,
    },
    #[error("Cannot name a file for an empty batch")]
    EmptyBatch,
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &std::path::Path) -> impl FnOnce(csv::Error) -> StorageError + '_ {
        move |source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}
