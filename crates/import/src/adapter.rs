use ledgerline_core::{CanonicalTransaction, NumberFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ImportError;
use crate::normalize::{self, TransactionKind};
use crate::obos;
use crate::reader::{self, Column, Dialect, RawRow};

/// Everything needed to turn one bank's export into canonical records.
#[derive(Debug, Clone, Copy)]
pub struct FormatAdapter {
    pub name: &'static str,
    pub dialect: Dialect,
    pub columns: &'static [Column],
    /// Type tag → kind. A tag missing here is a fatal error.
    pub kinds: &'static [(&'static str, TransactionKind)],
    pub date_format: &'static str,
    pub number_format: NumberFormat,
    pub home_currency: &'static str,
    pub mobile_payee: &'static str,
}

impl FormatAdapter {
    pub fn parse(&self, path: &Path) -> Result<Vec<RawRow>, ImportError> {
        reader::read_rows(path, &self.dialect, self.columns)
    }

    pub fn kind_of(&self, tag: &str) -> Option<TransactionKind> {
        self.kinds
            .iter()
            .find(|(label, _)| *label == tag)
            .map(|(_, kind)| *kind)
    }

    /// Parses and normalizes a whole export. An export without any
    /// transactions has no date range and is rejected.
    pub fn import(&self, path: &Path) -> Result<Vec<CanonicalTransaction>, ImportError> {
        let rows = self.parse(path)?;
        if rows.is_empty() {
            return Err(ImportError::EmptyInput {
                path: path.to_path_buf(),
            });
        }
        let batch = rows
            .iter()
            .map(|row| normalize::normalize(self, path, row))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(adapter = self.name, rows = batch.len(), "normalized export");
        Ok(batch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    #[serde(rename = "obos.recent")]
    ObosRecent,
    #[serde(rename = "obos.archive")]
    ObosArchive,
}

impl Format {
    pub fn adapter(self) -> &'static FormatAdapter {
        match self {
            Format::ObosRecent => &obos::RECENT,
            Format::ObosArchive => &obos::ARCHIVE,
        }
    }
}
