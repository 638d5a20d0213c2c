//! Account registry
//!
//! This module provides the `Bank` struct which owns every account, resolves
//! credentials, coordinates transfers and drives snapshot persistence.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by identifier. Each account sits behind
//! its own `Mutex`, so operations on different accounts never wait on each
//! other while deposits and withdrawals on one account are serialized.
//!
//! A transfer locks both accounts in identifier order, which keeps two
//! opposite transfers from deadlocking, and holds both locks from the balance
//! check until both ledger entries are appended.
//!
//! Mutations run under the shared side of a commit gate (`RwLock<()>`);
//! capturing a snapshot takes the exclusive side, so a snapshot never sees a
//! half-applied transfer or a half-inserted account.
//!
//! # Durability
//!
//! Every successful mutation is followed by a full snapshot save before the
//! call returns. A failed save is logged and does not undo the in-memory
//! change; [`Bank::save`] lets callers check durability explicitly.

use crate::core::credential::{CredentialHasher, Sha256Hasher};
use crate::core::traits::SnapshotStore;
use crate::types::{Account, AccountId, AccountSnapshot, BankError, TransferError};
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard, RwLock};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type AccountCell = Arc<Mutex<Account>>;

/// Read-only projection of an account for listings
///
/// Never carries the credential hash or the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub holder_name: String,
    pub balance: Decimal,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        AccountSummary {
            id: account.id().to_string(),
            holder_name: account.holder_name().to_string(),
            balance: account.balance(),
        }
    }
}

/// The account registry
pub struct Bank {
    /// Map of account identifiers to individually locked accounts
    accounts: DashMap<AccountId, AccountCell>,

    /// Shared by mutations, exclusive for snapshot capture
    commit_gate: RwLock<()>,

    /// Serializes capture + write so saves land in order
    save_lock: Mutex<()>,

    store: Box<dyn SnapshotStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl Bank {
    /// Open a bank backed by `store`, hashing credentials with SHA-256
    ///
    /// Loads the last saved snapshot. If it cannot be read or fails
    /// validation, the bank starts empty instead of failing.
    pub fn open(store: impl SnapshotStore + 'static) -> Self {
        Self::with_hasher(store, Arc::new(Sha256Hasher))
    }

    /// Open a bank with a custom credential hasher
    pub fn with_hasher(
        store: impl SnapshotStore + 'static,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let accounts = match store.load().and_then(restore_accounts) {
            Ok(accounts) => accounts,
            Err(e) => {
                warn!(error = %e, "snapshot unreadable or corrupt, starting with an empty registry");
                DashMap::new()
            }
        };

        info!(accounts = accounts.len(), "bank opened");

        Bank {
            accounts,
            commit_gate: RwLock::new(()),
            save_lock: Mutex::new(()),
            store: Box::new(store),
            hasher,
        }
    }

    /// Number of accounts in the registry
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Create a new account and persist the registry
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`BankError::EmptyIdentifier`] for an empty or whitespace-only identifier
    /// - [`BankError::EmptyHolderName`] for an empty or whitespace-only holder name
    /// - [`BankError::DuplicateAccount`] if the identifier is taken
    /// - [`BankError::NegativeOpeningBalance`] if `opening_balance < 0`
    /// - [`BankError::WeakCredential`] if the credential is too short
    pub fn create_account(
        &self,
        id: &str,
        holder_name: &str,
        credential: &str,
        opening_balance: Decimal,
    ) -> Result<(), BankError> {
        let result = self.insert_account(id, holder_name, credential, opening_balance);

        match &result {
            Ok(()) => {
                info!(account = id, %opening_balance, "account created");
                self.persist();
            }
            Err(e) => debug!(account = id, error = %e, "account creation rejected"),
        }

        result
    }

    /// The account if it exists and `credential` matches
    ///
    /// Returns `None` for an unknown account and for a wrong credential alike.
    /// The returned account is a copy taken at the time of the call.
    pub fn authenticate(&self, id: &str, credential: &str) -> Option<Account> {
        let cell = self.cell(id)?;
        let account = cell.lock();

        account
            .verify_credential(credential, self.hasher.as_ref())
            .then(|| account.clone())
    }

    /// The account without a credential check, for read-only lookups
    pub fn get_account(&self, id: &str) -> Option<Account> {
        self.cell(id).map(|cell| cell.lock().clone())
    }

    /// Deposit into an authenticated account and persist; returns the new balance
    ///
    /// An empty description defaults to "Deposit".
    pub fn deposit(
        &self,
        id: &str,
        credential: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<Decimal, BankError> {
        let description = or_default(description, "Deposit");
        let result =
            self.update_authenticated(id, credential, |account| account.deposit(amount, description));

        self.finish_update("deposit", id, amount, result)
    }

    /// Withdraw from an authenticated account and persist; returns the new balance
    ///
    /// An empty description defaults to "Withdrawal".
    pub fn withdraw(
        &self,
        id: &str,
        credential: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<Decimal, BankError> {
        let description = or_default(description, "Withdrawal");
        let result = self
            .update_authenticated(id, credential, |account| account.withdraw(amount, description));

        self.finish_update("withdrawal", id, amount, result)
    }

    /// Move `amount` from `from` to `to`, authenticated against `from`
    ///
    /// Validation stops at the first failing check, in this order: same
    /// account, authentication, destination exists, positive amount,
    /// sufficient balance. On success both ledger entries are appended and the
    /// registry is persisted.
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        credential: &str,
    ) -> Result<(), TransferError> {
        let result = self.execute_transfer(from, to, amount, credential);

        match result {
            Ok(()) => {
                info!(from, to, %amount, "transfer completed");
                self.persist();
            }
            Err(e) => debug!(from, to, %amount, reason = %e, "transfer rejected"),
        }

        result
    }

    /// Identifier, holder name and balance of every account, sorted by identifier
    pub fn list_accounts(&self) -> Vec<AccountSummary> {
        self.capture(|account| AccountSummary::from(account))
    }

    /// Consistent copy of every account, sorted by identifier
    pub fn snapshot(&self) -> Vec<AccountSnapshot> {
        self.capture(|account| AccountSnapshot::from(account))
    }

    /// Write the current state to the snapshot store
    ///
    /// Mutating operations call this themselves; it is public so callers can
    /// find out whether the latest state is actually durable.
    pub fn save(&self) -> Result<(), BankError> {
        let _ordered = self.save_lock.lock();
        let snapshot = self.snapshot();

        self.store.save(&snapshot)?;
        debug!(accounts = snapshot.len(), "snapshot saved");

        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            error!(error = %e, "failed to save snapshot, in-memory state is ahead of the store");
        }
    }

    fn cell(&self, id: &str) -> Option<AccountCell> {
        self.accounts.get(id).map(|entry| Arc::clone(entry.value()))
    }

    fn insert_account(
        &self,
        id: &str,
        holder_name: &str,
        credential: &str,
        opening_balance: Decimal,
    ) -> Result<(), BankError> {
        if id.trim().is_empty() {
            return Err(BankError::EmptyIdentifier);
        }

        if holder_name.trim().is_empty() {
            return Err(BankError::EmptyHolderName);
        }

        if self.accounts.contains_key(id) {
            return Err(BankError::duplicate_account(id));
        }

        if opening_balance < Decimal::ZERO {
            return Err(BankError::NegativeOpeningBalance {
                amount: opening_balance,
            });
        }

        let account = Account::create(
            id,
            holder_name,
            credential,
            opening_balance,
            self.hasher.as_ref(),
        )?;

        let _gate = self.commit_gate.read();

        // Re-checked under the entry lock: another caller may have won the race
        let mut inserted = false;
        self.accounts.entry(id.to_string()).or_insert_with(|| {
            inserted = true;
            Arc::new(Mutex::new(account))
        });

        if inserted {
            Ok(())
        } else {
            Err(BankError::duplicate_account(id))
        }
    }

    /// Run `f` on an account after checking its credential
    ///
    /// The account is locked for the duration of the closure.
    fn update_authenticated<F>(&self, id: &str, credential: &str, f: F) -> Result<Decimal, BankError>
    where
        F: FnOnce(&mut Account) -> Result<Decimal, BankError>,
    {
        let _gate = self.commit_gate.read();
        let cell = self.cell(id).ok_or(BankError::AuthenticationFailed)?;
        let mut account = cell.lock();

        if !account.verify_credential(credential, self.hasher.as_ref()) {
            return Err(BankError::AuthenticationFailed);
        }

        f(&mut account)
    }

    fn finish_update(
        &self,
        operation: &str,
        id: &str,
        amount: Decimal,
        result: Result<Decimal, BankError>,
    ) -> Result<Decimal, BankError> {
        match &result {
            Ok(balance) => {
                info!(account = id, %amount, %balance, "{} applied", operation);
                self.persist();
            }
            Err(e) => debug!(account = id, %amount, error = %e, "{} rejected", operation),
        }

        result
    }

    fn execute_transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        credential: &str,
    ) -> Result<(), TransferError> {
        if from == to {
            return Err(TransferError::SameAccount);
        }

        let source = self
            .cell(from)
            .filter(|cell| cell.lock().verify_credential(credential, self.hasher.as_ref()))
            .ok_or(TransferError::AuthenticationFailed)?;

        let destination = self.cell(to).ok_or(TransferError::DestinationNotFound)?;

        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }

        let _gate = self.commit_gate.read();
        let (mut source, mut destination) = lock_pair(from, &source, to, &destination);

        if source.balance() < amount {
            return Err(TransferError::InsufficientBalance);
        }

        // Both legs are validated before either is applied
        let debit = source
            .prepare_debit(amount, &format!("Transfer to {}", to))
            .map_err(|_| TransferError::InsufficientBalance)?;
        let credit = destination
            .prepare_credit(amount, &format!("Transfer from {}", from))
            .map_err(|_| TransferError::BalanceOverflow)?;

        source.apply(debit);
        destination.apply(credit);

        Ok(())
    }

    /// Project every account under the exclusive side of the commit gate
    fn capture<T>(&self, project: impl Fn(&Account) -> T) -> Vec<T> {
        let _gate = self.commit_gate.write();

        let mut cells: Vec<(AccountId, AccountCell)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        cells.sort_by(|a, b| a.0.cmp(&b.0));

        cells
            .iter()
            .map(|(_, cell)| project(&*cell.lock()))
            .collect()
    }
}

impl fmt::Debug for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bank")
            .field("accounts", &self.accounts.len())
            .field("hasher", &self.hasher)
            .finish_non_exhaustive()
    }
}

/// Lock two distinct accounts in identifier order
///
/// Returns the guards in argument order regardless of acquisition order.
fn lock_pair<'a>(
    first_id: &str,
    first: &'a AccountCell,
    second_id: &str,
    second: &'a AccountCell,
) -> (MutexGuard<'a, Account>, MutexGuard<'a, Account>) {
    if first_id < second_id {
        let first = first.lock();
        let second = second.lock();
        (first, second)
    } else {
        let second = second.lock();
        let first = first.lock();
        (first, second)
    }
}

fn restore_accounts(snapshots: Vec<AccountSnapshot>) -> Result<DashMap<AccountId, AccountCell>, BankError> {
    let accounts = DashMap::with_capacity(snapshots.len());

    for snapshot in snapshots {
        let account = Account::try_from(snapshot)?;
        let id = account.id().to_string();

        if accounts
            .insert(id.clone(), Arc::new(Mutex::new(account)))
            .is_some()
        {
            return Err(BankError::corrupt_snapshot(&id, "duplicate account identifier"));
        }
    }

    Ok(accounts)
}

fn or_default<'a>(description: &'a str, default: &'a str) -> &'a str {
    if description.trim().is_empty() {
        default
    } else {
        description
    }
}
