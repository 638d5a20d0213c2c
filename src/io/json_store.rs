//! JSON snapshot file
//!
//! The whole registry is stored as one pretty-printed JSON array. Saves go
//! through a temporary file in the target's directory that is fsynced and then
//! renamed over the target, so readers only ever see a complete snapshot.

use crate::core::SnapshotStore;
use crate::types::{AccountSnapshot, BankError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Default snapshot file name
pub const DEFAULT_DATA_FILE: &str = "bank_data.json";

/// Snapshot store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Vec<AccountSnapshot>, BankError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        let accounts = serde_json::from_str(&contents)?;

        Ok(accounts)
    }

    fn save(&self, accounts: &[AccountSnapshot]) -> Result<(), BankError> {
        let json = serde_json::to_vec_pretty(accounts)?;

        let mut file = NamedTempFile::new_in(self.directory())?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}
