use ledgerline_core::{CanonicalTransaction, DateRange};

use crate::archive::{self, ArchivedFile};
use crate::error::StorageError;
use crate::naming::Basename;
use crate::ynab;

#[derive(Debug, Clone)]
pub struct Consolidation {
    pub import_range: DateRange,
    pub overlapping: Vec<ArchivedFile>,
    /// Previously written records dated inside `import_range`.
    pub consolidation_set: Vec<CanonicalTransaction>,
    /// Batch records not found in the consolidation set, in batch order.
    pub unique: Vec<CanonicalTransaction>,
}

/// Compares a fresh import against canonical files already written under
/// `basename`. Never writes.
pub struct Consolidator {
    basename: Basename,
}

impl Consolidator {
    pub fn new(basename: Basename) -> Self {
        Self { basename }
    }

    pub fn consolidate(&self, batch: &[CanonicalTransaction]) -> Result<Consolidation, StorageError> {
        let import_range =
            DateRange::spanning(batch.iter().map(|r| r.date)).ok_or(StorageError::EmptyBatch)?;

        let overlapping: Vec<ArchivedFile> = archive::discover(&self.basename)?
            .into_iter()
            .filter(|f| f.overlaps(import_range))
            .collect();

        let mut consolidation_set = Vec::new();
        for file in &overlapping {
            let records = ynab::read_transactions(&file.path)?;
            consolidation_set.extend(records.into_iter().filter(|r| import_range.contains(r.date)));
        }

        let unique = remove_known(batch, &consolidation_set);

        tracing::info!(
            range = %import_range,
            archives = overlapping.len(),
            known = consolidation_set.len(),
            read = batch.len(),
            unique = unique.len(),
            "consolidated import"
        );

        Ok(Consolidation {
            import_range,
            overlapping,
            consolidation_set,
            unique,
        })
    }

    pub fn dedupe(&self, batch: &[CanonicalTransaction]) -> Result<Vec<CanonicalTransaction>, StorageError> {
        self.consolidate(batch).map(|c| c.unique)
    }
}

/// Drops every batch record equal to some known record. Membership only: two
/// identical batch records are both dropped by a single known match.
pub fn remove_known(
    batch: &[CanonicalTransaction],
    known: &[CanonicalTransaction],
) -> Vec<CanonicalTransaction> {
    batch
        .iter()
        .filter(|r| !known.contains(r))
        .cloned()
        .collect()
}
