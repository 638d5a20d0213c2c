//! Core traits for persistence
//!
//! This module defines the trait abstraction that lets the bank work with any
//! durable backend (JSON file, in-memory, ...) through one load/save contract.

use crate::types::{AccountSnapshot, BankError};

/// Durable storage for the complete set of accounts
///
/// There is no incremental persistence: every save is a full overwrite and
/// every load returns the full set.
pub trait SnapshotStore: Send + Sync {
    /// Load the last saved snapshot
    ///
    /// Returns an empty vector when nothing has been saved yet. Unreadable or
    /// malformed data is reported as an error; the bank decides how to degrade.
    fn load(&self) -> Result<Vec<AccountSnapshot>, BankError>;

    /// Replace the stored snapshot with `accounts`
    ///
    /// Implementations must not leave a partially written snapshot behind.
    fn save(&self, accounts: &[AccountSnapshot]) -> Result<(), BankError>;
}
