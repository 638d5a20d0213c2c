//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. It reads operations in batches and runs each
//! batch with account-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (account partitioning + tokio tasks)
//!         └── OperationEngine → Arc<Bank>
//! ```
//!
//! # Ordering
//!
//! - Batches run one after another, so an account's operations that span
//!   several batches keep file order
//! - Within a batch, groups of operations over disjoint accounts run on tokio
//!   worker threads in parallel
//! - The final state is the same as the synchronous strategy's

use crate::core::{Bank, BatchProcessor, OperationEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::ProcessingStrategy;
use crate::types::BankError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of operations read per batch
    pub batch_size: usize,

    /// Number of tokio worker threads
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a configuration; zero values fall back to the defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(default = default.batch_size, "invalid batch_size 0, using default");
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(default = default.max_concurrent, "invalid max_concurrent 0, using default");
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        bank: Arc<Bank>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), BankError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()?;

        runtime.block_on(async {
            let processor = BatchProcessor::new(OperationEngine::new(Arc::clone(&bank)));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| BankError::Io {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                })?;

            // csv-async reads through the futures io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut rejected = 0usize;

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Finish this batch before reading the next one
                for outcome in processor.process_batch(batch).await {
                    match outcome.result {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            warn!(
                                op = ?outcome.record.op,
                                account = %outcome.record.account,
                                error = %e,
                                "operation rejected"
                            );
                        }
                    }
                }
            }

            info!(applied, rejected, "batch file processed");

            Ok::<(), BankError>(())
        })?;

        write_accounts_csv(&bank.list_accounts(), output)
    }
}
