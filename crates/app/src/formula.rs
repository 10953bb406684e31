use ledgerline_import::Format;
use ledgerline_storage::Basename;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("IO error reading formula {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse formula: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Factor must be positive, got {0}")]
    InvalidFactor(Decimal),
    #[error("outprefix must not be empty")]
    EmptyPrefix,
}

/// Per-account settings: which bank format to read and where files go.
#[derive(Debug, Clone, Deserialize)]
pub struct Formula {
    pub format: Format,
    pub outpath: PathBuf,
    pub outprefix: String,
    pub archivepath: PathBuf,
    #[serde(default = "default_factor")]
    pub factor: Decimal,
}

fn default_factor() -> Decimal {
    Decimal::ONE
}

impl Formula {
    pub fn from_toml(toml_content: &str) -> Result<Self, FormulaError> {
        let formula: Formula = toml::from_str(toml_content)?;
        if formula.outprefix.is_empty() {
            return Err(FormulaError::EmptyPrefix);
        }
        if formula.factor <= Decimal::ZERO {
            return Err(FormulaError::InvalidFactor(formula.factor));
        }
        Ok(formula)
    }

    pub fn load(path: &Path) -> Result<Self, FormulaError> {
        let content = std::fs::read_to_string(path).map_err(|source| FormulaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Where canonical files are written and looked up for consolidation.
    pub fn output(&self) -> Basename {
        Basename::new(&self.outpath, &self.outprefix)
    }

    /// Where processed input files are moved.
    pub fn archive(&self) -> Basename {
        Basename::new(&self.archivepath, &self.outprefix)
    }
}
