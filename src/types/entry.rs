//! Ledger entry types
//!
//! A ledger entry is the immutable record of one balance-affecting event on an
//! account. Entries are appended in chronological order and never rewritten.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Funds added to the account
    Credit,

    /// Funds removed from the account
    Debit,
}

impl EntryKind {
    /// Apply this entry's direction to a running balance
    ///
    /// Returns `None` if the result does not fit in a `Decimal`.
    pub fn apply(self, balance: Decimal, amount: Decimal) -> Option<Decimal> {
        match self {
            EntryKind::Credit => balance.checked_add(amount),
            EntryKind::Debit => balance.checked_sub(amount),
        }
    }
}

/// One balance-affecting event in an account's history
///
/// Field names follow the snapshot file layout (`date`, `type`, ...) so the
/// entry serializes directly into the persisted account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// When the entry was appended (UTC, monotonic within one account)
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,

    /// Free text, e.g. "Initial Deposit" or "Transfer to A2"
    pub description: String,

    /// Strictly positive amount moved by this entry
    pub amount: Decimal,

    /// Credit or debit
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Account balance immediately after this entry
    pub balance_after: Decimal,
}
