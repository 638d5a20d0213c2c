//! Synchronous processing strategy
//!
//! Applies operations one at a time in file order on the calling thread.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Operation routing to `OperationEngine`
//! - CSV output to `csv_format::write_accounts_csv`

use crate::core::{Bank, OperationEngine};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::BankError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        bank: Arc<Bank>,
        input_path: &Path,
        output: &mut dyn Write,
    ) -> Result<(), BankError> {
        let engine = OperationEngine::new(Arc::clone(&bank));
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        let mut rejected = 0usize;

        for result in reader {
            match result {
                Ok(record) => {
                    let op = record.op;
                    let account = record.account.clone();
                    match engine.process(record) {
                        Ok(()) => applied += 1,
                        Err(e) => {
                            rejected += 1;
                            warn!(?op, %account, error = %e, "operation rejected");
                        }
                    }
                }
                Err(e) => {
                    rejected += 1;
                    warn!(error = %e, "skipping invalid record");
                }
            }
        }

        info!(applied, rejected, "batch file processed");

        write_accounts_csv(&bank.list_accounts(), output)
    }
}
