//! Processing strategy module for batch operation files
//!
//! This module defines the Strategy pattern for applying a CSV file of
//! operations to a bank, covering both CSV parsing and execution. Different
//! implementations (synchronous, asynchronous batch) are selected at runtime
//! and must leave the bank in the same final state.

use crate::cli::StrategyType;
use crate::core::Bank;
use crate::types::BankError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Strategy trait for a complete batch run
///
/// Implementations read operations from `input_path`, apply them to `bank`,
/// then write the final account listing to `output`. Individual operation
/// failures are logged and skipped; only failures to read the input or write
/// the output are returned.
pub trait ProcessingStrategy: Send + Sync {
    fn process(
        &self,
        bank: Arc<Bank>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), BankError>;
}

/// Build the strategy selected on the command line
///
/// `config` is only used by the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config.unwrap_or_default())),
    }
}
