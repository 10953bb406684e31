use chrono::NaiveDate;
use ledgerline_core::{DateRange, FILE_DATE_FORMAT};
use regex::Regex;
use std::io;
use std::path::PathBuf;

use crate::error::StorageError;
use crate::naming::Basename;

/// A canonical file written by an earlier run. Read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedFile {
    pub path: PathBuf,
    pub range: DateRange,
}

impl ArchivedFile {
    /// Either bound on its own qualifies a file, so files lying entirely
    /// before or after the import window are included too. Their records are
    /// still filtered to the window when loaded.
    pub fn overlaps(&self, import: DateRange) -> bool {
        self.range.start <= import.end || self.range.end >= import.start
    }
}

/// Lists every file under the basename's directory that starts with its
/// prefix. A file with the prefix but not the full
/// `<prefix>-<to>-<from>.csv` shape is an error.
pub fn discover(basename: &Basename) -> Result<Vec<ArchivedFile>, StorageError> {
    let pattern = Regex::new(&format!(
        r"^{}-(?P<to>\d{{8}})-(?P<from>\d{{8}})\.csv$",
        regex::escape(&basename.prefix)
    ))
    .expect("invalid archive name pattern");

    let entries = match std::fs::read_dir(&basename.dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StorageError::Io {
                path: basename.dir.clone(),
                source,
            })
        }
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(StorageError::io(&basename.dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(&basename.prefix) {
            continue;
        }
        let path = entry.path();
        let corrupt = || StorageError::CorruptArchiveName { path: path.clone() };

        let caps = pattern.captures(&name).ok_or_else(corrupt)?;
        let parse = |s: &str| NaiveDate::parse_from_str(s, FILE_DATE_FORMAT).ok();
        let from = parse(&caps["from"]).ok_or_else(corrupt)?;
        let to = parse(&caps["to"]).ok_or_else(corrupt)?;

        tracing::debug!(path = %path.display(), %from, %to, "found archived file");
        found.push(ArchivedFile {
            path,
            range: DateRange::new(from, to),
        });
    }
    found.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(found)
}
