//! Account-related types for the bank ledger
//!
//! This module defines the Account entity: its balance, its append-only
//! ledger, and the credential check that gates access to it.
//!
//! # Invariants
//!
//! - `balance == Σ credits − Σ debits` over the ledger
//! - `balance >= 0` at all times
//! - each entry's `balance_after` equals the previous entry's `balance_after`
//!   (zero for the first entry) plus or minus its amount
//! - entries are only ever appended, never mutated or removed

use super::entry::{EntryKind, LedgerEntry};
use super::error::BankError;
use crate::core::credential::CredentialHasher;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Account identifier, unique within a registry
pub type AccountId = String;

/// Minimum number of characters accepted for a credential
pub const MIN_CREDENTIAL_LEN: usize = 4;

/// Description of the entry appended for a positive opening balance
pub const INITIAL_DEPOSIT: &str = "Initial Deposit";

/// A bank account with its balance and ledger
///
/// Fields are private so the balance can only change through operations that
/// also append a matching ledger entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    id: AccountId,
    holder_name: String,
    /// One-way hash of the credential; the plaintext is never stored
    credential_hash: String,
    balance: Decimal,
    ledger: Vec<LedgerEntry>,
    created_at: DateTime<Utc>,
}

/// A validated, not yet applied ledger entry
///
/// Produced by [`Account::prepare_credit`] / [`Account::prepare_debit`] and
/// consumed by [`Account::apply`]. Splitting validation from mutation lets a
/// transfer check both legs before touching either account.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingEntry {
    kind: EntryKind,
    amount: Decimal,
    description: String,
    balance_after: Decimal,
    /// Ledger length at prepare time; the entry is only valid against that state
    ledger_len: usize,
}

impl Account {
    /// Create a new account
    ///
    /// Hashes the credential with `hasher` and, for a positive opening balance,
    /// appends an "Initial Deposit" credit entry.
    ///
    /// # Errors
    ///
    /// - [`BankError::WeakCredential`] if the credential has fewer than
    ///   [`MIN_CREDENTIAL_LEN`] characters
    /// - [`BankError::NegativeOpeningBalance`] if `opening_balance < 0`
    pub fn create(
        id: impl Into<AccountId>,
        holder_name: impl Into<String>,
        credential: &str,
        opening_balance: Decimal,
        hasher: &dyn CredentialHasher,
    ) -> Result<Self, BankError> {
        if credential.chars().count() < MIN_CREDENTIAL_LEN {
            return Err(BankError::WeakCredential {
                min_len: MIN_CREDENTIAL_LEN,
            });
        }

        if opening_balance < Decimal::ZERO {
            return Err(BankError::NegativeOpeningBalance {
                amount: opening_balance,
            });
        }

        let mut account = Account {
            id: id.into(),
            holder_name: holder_name.into(),
            credential_hash: hasher.hash(credential),
            balance: Decimal::ZERO,
            ledger: Vec::new(),
            created_at: Utc::now(),
        };

        if opening_balance > Decimal::ZERO {
            let pending = account.prepare_credit(opening_balance, INITIAL_DEPOSIT)?;
            account.apply(pending);
        }

        Ok(account)
    }

    /// Rebuild an account from already-validated persisted parts
    pub(crate) fn from_parts(
        id: AccountId,
        holder_name: String,
        credential_hash: String,
        balance: Decimal,
        ledger: Vec<LedgerEntry>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Account {
            id,
            holder_name,
            credential_hash,
            balance,
            ledger,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn holder_name(&self) -> &str {
        &self.holder_name
    }

    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Read-only view of the full ledger in chronological order
    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    /// Check a candidate credential against the stored hash
    pub fn verify_credential(&self, candidate: &str, hasher: &dyn CredentialHasher) -> bool {
        hasher.verify(candidate, &self.credential_hash)
    }

    /// Deposit funds into the account
    ///
    /// Appends a credit entry and returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidAmount`] if `amount <= 0`
    /// - [`BankError::ArithmeticOverflow`] if the balance would leave the decimal range
    pub fn deposit(&mut self, amount: Decimal, description: &str) -> Result<Decimal, BankError> {
        let pending = self.prepare_credit(amount, description)?;
        Ok(self.apply(pending))
    }

    /// Withdraw funds from the account
    ///
    /// Appends a debit entry and returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`BankError::InvalidAmount`] if `amount <= 0`
    /// - [`BankError::InsufficientFunds`] if `amount` exceeds the balance
    pub fn withdraw(&mut self, amount: Decimal, description: &str) -> Result<Decimal, BankError> {
        let pending = self.prepare_debit(amount, description)?;
        Ok(self.apply(pending))
    }

    /// The most recent `limit` entries in chronological order
    ///
    /// `None` or `Some(0)` returns the whole history. The result is a copy.
    pub fn history(&self, limit: Option<usize>) -> Vec<LedgerEntry> {
        match limit {
            Some(limit) if limit > 0 => {
                let from = self.ledger.len().saturating_sub(limit);
                self.ledger[from..].to_vec()
            }
            _ => self.ledger.clone(),
        }
    }

    /// Whether the ledger chain reproduces the current balance
    pub fn ledger_is_consistent(&self) -> bool {
        check_ledger(&self.ledger, self.balance).is_ok()
    }

    /// Validate a credit without applying it
    pub(crate) fn prepare_credit(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<PendingEntry, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, "deposit"));
        }

        let balance_after = EntryKind::Credit
            .apply(self.balance, amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit", &self.id))?;

        Ok(self.pending(EntryKind::Credit, amount, description, balance_after))
    }

    /// Validate a debit without applying it
    pub(crate) fn prepare_debit(
        &self,
        amount: Decimal,
        description: &str,
    ) -> Result<PendingEntry, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount, "withdrawal"));
        }

        if amount > self.balance {
            return Err(BankError::insufficient_funds(&self.id, self.balance, amount));
        }

        let balance_after = EntryKind::Debit
            .apply(self.balance, amount)
            .ok_or_else(|| BankError::arithmetic_overflow("withdrawal", &self.id))?;

        Ok(self.pending(EntryKind::Debit, amount, description, balance_after))
    }

    /// Append a prepared entry and move the balance; returns the new balance
    ///
    /// The entry must have been prepared against the current state of this account.
    pub(crate) fn apply(&mut self, pending: PendingEntry) -> Decimal {
        debug_assert_eq!(pending.ledger_len, self.ledger.len());

        // Never older than the previous entry, even if the wall clock stepped back
        let now = Utc::now();
        let timestamp = match self.ledger.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };

        self.balance = pending.balance_after;
        self.ledger.push(LedgerEntry {
            timestamp,
            description: pending.description,
            amount: pending.amount,
            kind: pending.kind,
            balance_after: pending.balance_after,
        });

        self.balance
    }

    fn pending(
        &self,
        kind: EntryKind,
        amount: Decimal,
        description: &str,
        balance_after: Decimal,
    ) -> PendingEntry {
        PendingEntry {
            kind,
            amount,
            description: description.to_string(),
            balance_after,
            ledger_len: self.ledger.len(),
        }
    }
}

/// Replay a ledger from zero and compare it with the recorded balance
///
/// Returns a description of the first inconsistency found.
pub(crate) fn check_ledger(ledger: &[LedgerEntry], balance: Decimal) -> Result<(), String> {
    if balance < Decimal::ZERO {
        return Err(format!("negative balance {}", balance));
    }

    let mut running = Decimal::ZERO;
    let mut previous: Option<DateTime<Utc>> = None;

    for (index, entry) in ledger.iter().enumerate() {
        if entry.amount <= Decimal::ZERO {
            return Err(format!("entry {} has non-positive amount {}", index, entry.amount));
        }

        running = entry
            .kind
            .apply(running, entry.amount)
            .ok_or_else(|| format!("entry {} overflows", index))?;

        if running < Decimal::ZERO {
            return Err(format!("entry {} drives the balance negative", index));
        }

        if entry.balance_after != running {
            return Err(format!(
                "entry {} records balance {} but replay gives {}",
                index, entry.balance_after, running
            ));
        }

        if previous.is_some_and(|prev| entry.timestamp < prev) {
            return Err(format!("entry {} is older than its predecessor", index));
        }
        previous = Some(entry.timestamp);
    }

    if running != balance {
        return Err(format!(
            "balance {} does not match ledger total {}",
            balance, running
        ));
    }

    Ok(())
}
