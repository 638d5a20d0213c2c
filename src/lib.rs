//! Bank Ledger Library
//! # Overview
//!
//! This library keeps a registry of bank accounts, each with a credential, a
//! balance and an append-only ledger of credits and debits. Every successful
//! mutation is written through to a snapshot store.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, LedgerEntry, errors, snapshots)
//! - [`core`] - Business logic components:
//!   - [`core::bank`] - Account registry, authentication, transfers, persistence
//!   - [`core::credential`] - Credential hashing strategy
//!   - [`core::engine`] - Replays batch operation records against a bank
//!   - [`core::batch_processor`] - Concurrent execution over disjoint accounts
//! - [`io`] - Snapshot stores and CSV handling
//! - [`strategy`] - Sync and async processing of operation files
//! - [`cli`] - CLI argument parsing and command dispatch
//!
//! # Invariants
//!
//! For every account, replaying its ledger from zero yields its balance, and
//! the balance never goes negative. A transfer either appends both of its
//! entries or neither; total money across accounts only changes through
//! deposits and withdrawals.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{AccountSummary, Bank, CredentialHasher, Sha256Hasher, SnapshotStore};
pub use io::{write_accounts_csv, JsonFileStore, MemoryStore};
pub use types::{
    Account, AccountId, AccountSnapshot, BankError, EntryKind, LedgerEntry, OperationRecord,
    OperationType, TransferError,
};
