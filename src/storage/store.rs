use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::domain::Expense;

/// JSON file holding the whole expense collection.
///
/// The file is always read and written in one piece: there is no append
/// path, no locking and no backup copy.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored expense. A missing file is an empty collection.
    ///
    /// Amounts with more than two decimals are rounded to the nearest cent
    /// (with a warning) and saved rounded on the next write.
    pub fn load(&self) -> Result<Vec<Expense>> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no data file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read data file {}", self.path.display())
                });
            }
        };

        let expenses: Vec<Expense> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse data file {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = expenses.len(), "loaded expenses");
        Ok(expenses)
    }

    /// Overwrite the file with the given collection, pretty-printed.
    pub fn save(&self, expenses: &[Expense]) -> Result<()> {
        let json = serde_json::to_string_pretty(expenses).context("Failed to serialize expenses")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write data file {}", self.path.display()))?;

        debug!(path = %self.path.display(), count = expenses.len(), "saved expenses");
        Ok(())
    }
}
