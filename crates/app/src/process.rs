use anyhow::{Context, Result};
use ledgerline_core::scale;
use ledgerline_storage::{ensure_vacant, write_transactions, Consolidator};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::formula::Formula;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written {
        path: PathBuf,
        written: usize,
        read: usize,
    },
    NoUniqueLines,
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub source: PathBuf,
    pub outcome: Outcome,
    pub archived_to: PathBuf,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Written {
                path,
                written,
                read,
            } => write!(
                f,
                "Wrote {written} out of {read} transactions to {}",
                path.display()
            ),
            Outcome::NoUniqueLines => {
                write!(f, "No unique lines found in {}", self.source.display())
            }
        }
    }
}

/// parse → normalize → consolidate → scale → write → archive, for one file.
/// Both target paths are checked before anything is written.
pub fn process_file(formula: &Formula, input: &Path) -> Result<FileReport> {
    let adapter = formula.format.adapter();
    let batch = adapter.import(input)?;

    let output = formula.output();
    std::fs::create_dir_all(&output.dir)
        .with_context(|| format!("creating output directory {}", output.dir.display()))?;
    let archive = formula.archive();
    std::fs::create_dir_all(&archive.dir)
        .with_context(|| format!("creating archive directory {}", archive.dir.display()))?;

    let consolidation = Consolidator::new(output.clone()).consolidate(&batch)?;
    let archived_to = archive.path_for(consolidation.import_range);
    ensure_vacant(&archived_to)?;

    let unique = scale(consolidation.unique, formula.factor);

    let outcome = if unique.is_empty() {
        tracing::warn!(source = %input.display(), "no unique transactions");
        Outcome::NoUniqueLines
    } else {
        let path = output.name_for(&unique)?;
        write_transactions(&path, &unique)?;
        tracing::info!(path = %path.display(), written = unique.len(), "wrote output");
        Outcome::Written {
            path,
            written: unique.len(),
            read: batch.len(),
        }
    };

    move_file(input, &archived_to)
        .with_context(|| format!("archiving {} to {}", input.display(), archived_to.display()))?;
    tracing::info!(from = %input.display(), to = %archived_to.display(), "archived input");

    Ok(FileReport {
        source: input.to_path_buf(),
        outcome,
        archived_to,
    })
}

/// Rename, falling back to copy + remove when the archive is on another
/// filesystem.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if std::fs::copy(from, to).is_err() {
                return Err(rename_err);
            }
            std::fs::remove_file(from)
        }
    }
}
