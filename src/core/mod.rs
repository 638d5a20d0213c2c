//! Core business logic module
//!
//! This module contains the registry and the components around it:
//! - `credential` - Credential hashing strategy
//! - `traits` - Snapshot store abstraction
//! - `bank` - Account registry, transfer orchestration and persistence
//! - `engine` - Routes batch operation records to the registry
//! - `batch_processor` - Concurrent batch execution over disjoint accounts

pub mod bank;
pub mod batch_processor;
pub mod credential;
pub mod engine;
pub mod traits;

pub use bank::{AccountSummary, Bank};
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use credential::{CredentialHasher, Sha256Hasher};
pub use engine::OperationEngine;
pub use traits::SnapshotStore;
