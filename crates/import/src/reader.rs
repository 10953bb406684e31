use regex::Regex;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1, one byte per character.
    Latin1,
    /// UTF-8, with or without a leading byte-order mark.
    Utf8Bom,
}

impl TextEncoding {
    pub fn decode(self, bytes: Vec<u8>) -> io::Result<String> {
        match self {
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Utf8Bom => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                Ok(match text.strip_prefix('\u{feff}') {
                    Some(rest) => rest.to_string(),
                    None => text,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub encoding: TextEncoding,
    pub delimiter: u8,
    pub quote: u8,
    pub has_header: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Latin1,
            delimiter: b'\t',
            quote: b'"',
            has_header: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    InterestDate,
    Type,
    Text,
    Amount,
    Reference,
    Account,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::InterestDate => "interest_date",
            Field::Type => "type",
            Field::Text => "text",
            Field::Amount => "amount",
            Field::Reference => "reference",
            Field::Account => "account",
        }
    }
}

/// One column of a bank layout. Columns without a pattern are not validated.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub field: Field,
    pub pattern: Option<&'static str>,
}

impl Column {
    pub const fn checked(field: Field, pattern: &'static str) -> Self {
        Column {
            field,
            pattern: Some(pattern),
        }
    }

    pub const fn unchecked(field: Field) -> Self {
        Column {
            field,
            pattern: None,
        }
    }
}

/// A validated source row. Never modified after it has been read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub date: String,
    pub interest_date: Option<String>,
    pub kind: String,
    pub text: String,
    pub amount: String,
    pub reference: Option<String>,
    pub account: Option<String>,
    /// The row's fields joined by tabs, for error reports.
    pub raw: String,
}

struct CompiledColumn {
    column: Column,
    regex: Option<Regex>,
}

/// Lazily reads and validates rows. Stops at the first bad row.
pub struct Rows<R: Read> {
    path: PathBuf,
    reader: csv::Reader<R>,
    columns: Vec<CompiledColumn>,
    failed: bool,
}

impl<R: Read> Rows<R> {
    pub fn new(path: &Path, data: R, dialect: &Dialect, columns: &[Column]) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(dialect.has_header)
            .delimiter(dialect.delimiter)
            .quote(dialect.quote)
            .flexible(true)
            .from_reader(data);
        let columns = columns
            .iter()
            .map(|&column| CompiledColumn {
                column,
                regex: column
                    .pattern
                    .map(|p| Regex::new(p).expect("invalid column pattern")),
            })
            .collect();
        Self {
            path: path.to_path_buf(),
            reader,
            columns,
            failed: false,
        }
    }

    fn validate(&self, record: &csv::StringRecord) -> Result<RawRow, ImportError> {
        let line = record.position().map_or(0, |p| p.line());
        let raw = record.iter().collect::<Vec<_>>().join("\t");
        let malformed = |reason: String| ImportError::MalformedRow {
            path: self.path.clone(),
            line,
            raw: raw.clone(),
            reason,
        };

        if record.len() != self.columns.len() {
            return Err(malformed(format!(
                "expected {} columns, found {}",
                self.columns.len(),
                record.len()
            )));
        }

        let mut row = RawRow {
            line,
            ..RawRow::default()
        };
        for (compiled, value) in self.columns.iter().zip(record.iter()) {
            if let Some(re) = &compiled.regex {
                if !re.is_match(value) {
                    return Err(malformed(format!(
                        "column '{}' does not match {}",
                        compiled.column.field.name(),
                        re.as_str()
                    )));
                }
            }
            let value = value.to_string();
            match compiled.column.field {
                Field::Date => row.date = value,
                Field::InterestDate => row.interest_date = Some(value),
                Field::Type => row.kind = value,
                Field::Text => row.text = value,
                Field::Amount => row.amount = value,
                Field::Reference => row.reference = Some(value),
                Field::Account => row.account = Some(value),
            }
        }
        row.raw = raw;
        Ok(row)
    }
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<RawRow, ImportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let mut record = csv::StringRecord::new();
        let result = match self.reader.read_record(&mut record) {
            Ok(false) => return None,
            Ok(true) => self.validate(&record),
            Err(source) => Err(ImportError::Csv {
                path: self.path.clone(),
                source,
            }),
        };
        self.failed = result.is_err();
        Some(result)
    }
}

/// Reads a whole export into memory. Downstream stages walk the rows more than
/// once, so callers get a `Vec` rather than the lazy iterator.
pub fn read_rows(
    path: &Path,
    dialect: &Dialect,
    columns: &[Column],
) -> Result<Vec<RawRow>, ImportError> {
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let bytes = std::fs::read(path).map_err(io_err)?;
    let text = dialect.encoding.decode(bytes).map_err(io_err)?;
    Rows::new(path, text.as_bytes(), dialect, columns).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &[Column] = &[
        Column::checked(Field::Date, r"^\d{2}\.\d{2}\.\d{4}"),
        Column::checked(Field::Type, r"^.+$"),
        Column::checked(Field::Text, r"^.+$"),
        Column::checked(Field::Amount, r"^-?\d{1,}(\.\d{3})*(.\d{1,2})?$"),
    ];

    fn rows(data: &str) -> Result<Vec<RawRow>, ImportError> {
        Rows::new(Path::new("test.csv"), data.as_bytes(), &Dialect::default(), LAYOUT).collect()
    }

    // ── Encoding ──────────────────────────────────────────────────────────────

    #[test]
    fn latin1_maps_high_bytes() {
        let text = TextEncoding::Latin1.decode(b"Varekj\xf8p".to_vec()).unwrap();
        assert_eq!(text, "Varekjøp");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let text = TextEncoding::Utf8Bom
            .decode(b"\xef\xbb\xbf\"Dato\"".to_vec())
            .unwrap();
        assert_eq!(text, "\"Dato\"");
    }

    #[test]
    fn utf8_without_bom_passes_through() {
        let text = TextEncoding::Utf8Bom.decode("Lønn".as_bytes().to_vec()).unwrap();
        assert_eq!(text, "Lønn");
    }

    #[test]
    fn utf8_invalid_bytes_error() {
        assert!(TextEncoding::Utf8Bom.decode(vec![0xff, 0xfe, 0x41]).is_err());
    }

    // ── Rows ─────────────────────────────────────────────────────────────────

    #[test]
    fn reads_quoted_tab_rows_and_skips_header() {
        let data = "\"Dato\"\t\"Type\"\t\"Tekst\"\t\"Beløp\"\n\
                    \"02.01.2023\"\t\"Varekjøp\"\t\"*1234 31.12 REMA 1000\"\t\"-89,90\"\n\
                    \"03.01.2023\"\t\"Innbetaling\"\t\"Fra: Ola\"\t\"500,00\"\n";
        let rows = rows(data).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].kind, "Varekjøp");
        assert_eq!(rows[0].text, "*1234 31.12 REMA 1000");
        assert_eq!(rows[0].amount, "-89,90");
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[1].account, None);
    }

    #[test]
    fn bad_amount_is_malformed_with_location() {
        let data = "\"Dato\"\t\"Type\"\t\"Tekst\"\t\"Beløp\"\n\
                    \"02.01.2023\"\t\"Betaling\"\t\"Til: Hafslund\"\t\"-89,90\"\n\
                    \"03.01.2023\"\t\"Betaling\"\t\"Til: Telenor\"\t\"12 kroner\"\n";
        let err = rows(data).unwrap_err();
        match err {
            ImportError::MalformedRow { line, raw, reason, .. } => {
                assert_eq!(line, 3);
                assert!(raw.contains("12 kroner"));
                assert!(reason.contains("amount"), "reason was {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn wrong_column_count_is_malformed() {
        let data = "h1\th2\th3\th4\n\"02.01.2023\"\t\"Betaling\"\t\"-1,00\"\n";
        assert!(matches!(rows(data), Err(ImportError::MalformedRow { line: 2, .. })));
    }

    #[test]
    fn empty_text_is_malformed() {
        let data = "h1\th2\th3\th4\n\"02.01.2023\"\t\"Betaling\"\t\"\"\t\"-1,00\"\n";
        assert!(matches!(rows(data), Err(ImportError::MalformedRow { .. })));
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let data = "h1\th2\th3\th4\nbad\n\"02.01.2023\"\t\"Betaling\"\t\"x\"\t\"-1,00\"\n";
        let mut it = Rows::new(Path::new("t"), data.as_bytes(), &Dialect::default(), LAYOUT);
        assert!(it.next().unwrap().is_err());
        assert!(it.next().is_none());
    }

    #[test]
    fn read_rows_decodes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.csv");
        std::fs::write(
            &path,
            b"\"Dato\"\t\"Type\"\t\"Tekst\"\t\"Bel\xf8p\"\n\"02.01.2023\"\t\"Varekj\xf8p\"\t\"02.01 KIWI\"\t\"-10,00\"\n",
        )
        .unwrap();
        let rows = read_rows(&path, &Dialect::default(), LAYOUT).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, "Varekjøp");
    }

    #[test]
    fn read_rows_missing_file_is_io_error() {
        let err = read_rows(Path::new("/nonexistent/x.csv"), &Dialect::default(), LAYOUT);
        assert!(matches!(err, Err(ImportError::Io { .. })));
    }
}
