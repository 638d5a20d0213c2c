//! Batch operation types for the bank ledger
//!
//! This module defines the operations that can be replayed against a bank
//! from a CSV file: opening accounts, deposits, withdrawals and transfers.

use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operation types supported by batch processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    /// Create a new account
    ///
    /// Uses `holder` and `credential`; `amount` is the opening balance (zero if absent).
    Open,

    /// Credit funds to an authenticated account
    Deposit,

    /// Debit funds from an authenticated account
    ///
    /// Requires a sufficient balance to succeed.
    Withdraw,

    /// Move funds from `account` to `counterparty`
    ///
    /// Authenticated against the source account.
    Transfer,
}

/// A single operation as read from the input CSV
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    /// What to do
    pub op: OperationType,

    /// The account the operation targets (the source for transfers)
    pub account: AccountId,

    /// Destination account, only used by transfers
    pub counterparty: Option<AccountId>,

    /// Amount moved; opening balance for `open`
    pub amount: Option<Decimal>,

    /// Credential of `account`
    pub credential: String,

    /// Holder name, only used by `open`
    pub holder: Option<String>,

    /// Ledger description for deposits and withdrawals
    pub description: Option<String>,
}

impl OperationRecord {
    /// Every account this operation reads or writes
    ///
    /// Operations with disjoint account sets commute, which is what lets the
    /// batch processor run them concurrently.
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.account.as_str()).chain(self.counterparty.as_deref())
    }
}
