//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `entry`: Ledger entries
//! - `account`: The account entity and its ledger operations
//! - `snapshot`: Durable account representation
//! - `operation`: Batch operation records
//! - `error`: Error types for the bank ledger

pub mod account;
pub mod entry;
pub mod error;
pub mod operation;
pub mod snapshot;

pub use account::{Account, AccountId, MIN_CREDENTIAL_LEN};
pub use entry::{EntryKind, LedgerEntry};
pub use error::{BankError, TransferError};
pub use operation::{OperationRecord, OperationType};
pub use snapshot::AccountSnapshot;
