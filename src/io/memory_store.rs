//! In-process snapshot store
//!
//! Clones share the same underlying snapshot, so a test can keep a handle to
//! the store it gave the bank and inspect what was saved.

use crate::core::SnapshotStore;
use crate::types::{AccountSnapshot, BankError};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct MemoryState {
    accounts: Vec<AccountSnapshot>,
    saves: usize,
}

/// Snapshot store that keeps the last saved snapshot in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last saved snapshot
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.state.lock().accounts.clone()
    }

    /// Overwrite the stored snapshot without counting it as a save
    pub fn replace(&self, accounts: Vec<AccountSnapshot>) {
        self.state.lock().accounts = accounts;
    }

    /// Number of saves performed so far
    pub fn save_count(&self) -> usize {
        self.state.lock().saves
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Vec<AccountSnapshot>, BankError> {
        Ok(self.snapshot())
    }

    fn save(&self, accounts: &[AccountSnapshot]) -> Result<(), BankError> {
        let mut state = self.state.lock();
        state.accounts = accounts.to_vec();
        state.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.save(&[]).unwrap();
        store.save(&[]).unwrap();

        assert_eq!(handle.save_count(), 2);
        assert!(handle.load().unwrap().is_empty());
    }
}
