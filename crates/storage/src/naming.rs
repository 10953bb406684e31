use ledgerline_core::{CanonicalTransaction, DateRange};
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// A directory plus file-name prefix. Every file this tool writes under it is
/// named `<prefix>-<newest:YYYYMMDD>-<oldest:YYYYMMDD>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basename {
    pub dir: PathBuf,
    pub prefix: String,
}

impl Basename {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Basename {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    pub fn file_name(&self, range: DateRange) -> String {
        format!("{}-{}.csv", self.prefix, range.file_suffix())
    }

    pub fn path_for(&self, range: DateRange) -> PathBuf {
        self.dir.join(self.file_name(range))
    }

    /// Path for a batch about to be written, named after its own extremes.
    pub fn name_for(&self, records: &[CanonicalTransaction]) -> Result<PathBuf, StorageError> {
        let range =
            DateRange::spanning(records.iter().map(|r| r.date)).ok_or(StorageError::EmptyBatch)?;
        let path = self.path_for(range);
        ensure_vacant(&path)?;
        Ok(path)
    }
}

pub fn ensure_vacant(path: &Path) -> Result<(), StorageError> {
    if path.exists() {
        return Err(StorageError::OutputCollision {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerline_core::{Money, TransactionDraft};

    fn tx(m: u32, d: u32) -> CanonicalTransaction {
        let date = NaiveDate::from_ymd_opt(2023, m, d).unwrap();
        CanonicalTransaction::validate(TransactionDraft::from_signed(date, Money::from_cents(-100)))
            .unwrap()
    }

    #[test]
    fn name_uses_newest_then_oldest() {
        let dir = tempfile::tempdir().unwrap();
        let base = Basename::new(dir.path(), "obos");
        let path = base.name_for(&[tx(1, 15), tx(1, 31), tx(1, 1)]).unwrap();
        assert_eq!(path, dir.path().join("obos-20230131-20230101.csv"));
    }

    #[test]
    fn single_day_batch() {
        let dir = tempfile::tempdir().unwrap();
        let base = Basename::new(dir.path(), "visa");
        let path = base.name_for(&[tx(2, 3)]).unwrap();
        assert_eq!(path.file_name().unwrap(), "visa-20230203-20230203.csv");
    }

    #[test]
    fn existing_target_is_collision() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("obos-20230131-20230101.csv"), "").unwrap();
        let base = Basename::new(dir.path(), "obos");
        assert!(matches!(
            base.name_for(&[tx(1, 1), tx(1, 31)]),
            Err(StorageError::OutputCollision { .. })
        ));
    }

    #[test]
    fn empty_batch_has_no_name() {
        let base = Basename::new("/tmp", "obos");
        assert!(matches!(base.name_for(&[]), Err(StorageError::EmptyBatch)));
    }
}
