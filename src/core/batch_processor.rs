//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! operations concurrently while keeping the outcome identical to applying
//! the batch in file order.
//!
//! # Design
//!
//! Two operations may only be reordered if they touch disjoint accounts. A
//! transfer touches two accounts, so "same client" is not enough: the batch is
//! split into connected components of the graph whose nodes are account
//! identifiers and whose edges are the operations. Components share no
//! account, so they commute; inside a component operations keep file order.
//!
//! ```text
//! open A1, open A2, transfer A1->A2, deposit B1, transfer B1->B2
//!   => [open A1, open A2, transfer A1->A2]  [deposit B1, transfer B1->B2]
//! ```

use std::collections::HashMap;

use crate::core::engine::OperationEngine;
use crate::types::{BankError, OperationRecord};
use tracing::{debug, error};

/// Result of processing a single operation
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The operation that was processed
    pub record: OperationRecord,

    /// The result of processing (success or rejection reason)
    pub result: Result<(), BankError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: OperationEngine,
}

impl BatchProcessor {
    pub fn new(engine: OperationEngine) -> Self {
        Self { engine }
    }

    /// Split a batch into groups of operations that share accounts
    ///
    /// # Guarantees
    ///
    /// - Each operation appears in exactly one group
    /// - Operations inside a group keep their batch order
    /// - No account is touched by operations from two different groups
    /// - Groups are ordered by their first operation in the batch
    pub fn partition_by_accounts(&self, batch: Vec<OperationRecord>) -> Vec<Vec<OperationRecord>> {
        let mut sets = AccountSets::default();
        let mut slots = Vec::with_capacity(batch.len());

        for record in &batch {
            let slot = sets.slot(&record.account);
            for account in record.accounts() {
                let other = sets.slot(account);
                sets.union(slot, other);
            }
            slots.push(slot);
        }

        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<OperationRecord>> = Vec::new();

        for (record, slot) in batch.into_iter().zip(slots) {
            let root = sets.find(slot);
            let index = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[index].push(record);
        }

        groups
    }

    /// Apply one group of operations sequentially
    ///
    /// Every operation is attempted; a rejection does not stop the group.
    pub async fn process_group(&self, operations: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(operations.len());

        for record in operations {
            let result = self.engine.process(record.clone());
            if let Err(e) = &result {
                debug!(op = ?record.op, account = %record.account, error = %e, "operation rejected");
            }
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch with one tokio task per group
    ///
    /// Returns once every group has finished. Results are grouped, not in
    /// batch order.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let groups = self.partition_by_accounts(batch);
        debug!(groups = groups.len(), "processing batch");

        let mut tasks = Vec::with_capacity(groups.len());
        for operations in groups {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_group(operations).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!(error = %e, "batch task failed"),
            }
        }

        results
    }
}

/// Union-find over account identifiers
#[derive(Debug, Default)]
struct AccountSets {
    slots: HashMap<String, usize>,
    parent: Vec<usize>,
}

impl AccountSets {
    fn slot(&mut self, account: &str) -> usize {
        if let Some(&slot) = self.slots.get(account) {
            return slot;
        }

        let slot = self.parent.len();
        self.parent.push(slot);
        self.slots.insert(account.to_string(), slot);
        slot
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: usize, b: usize) {
        let a = self.find(a);
        let b = self.find(b);
        if a != b {
            self.parent[b] = a;
        }
    }
}
