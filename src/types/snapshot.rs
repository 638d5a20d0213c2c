//! Durable representation of an account
//!
//! `AccountSnapshot` is what a snapshot store reads and writes. Converting a
//! snapshot back into an [`Account`] replays its ledger and rejects anything
//! that violates the account invariants.

use super::account::{check_ledger, Account, AccountId};
use super::entry::LedgerEntry;
use super::error::BankError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Persisted form of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    #[serde(rename = "account_number")]
    pub id: AccountId,

    #[serde(rename = "account_holder")]
    pub holder_name: String,

    #[serde(rename = "password_hash")]
    pub credential_hash: String,

    pub balance: Decimal,

    #[serde(rename = "transactions")]
    pub ledger: Vec<LedgerEntry>,

    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSnapshot {
    fn from(account: &Account) -> Self {
        AccountSnapshot {
            id: account.id().to_string(),
            holder_name: account.holder_name().to_string(),
            credential_hash: account.credential_hash().to_string(),
            balance: account.balance(),
            ledger: account.ledger().to_vec(),
            created_at: account.created_at(),
        }
    }
}

impl TryFrom<AccountSnapshot> for Account {
    type Error = BankError;

    fn try_from(snapshot: AccountSnapshot) -> Result<Self, Self::Error> {
        if snapshot.id.trim().is_empty() {
            return Err(BankError::corrupt_snapshot(&snapshot.id, "empty account identifier"));
        }

        if snapshot.credential_hash.is_empty() {
            return Err(BankError::corrupt_snapshot(&snapshot.id, "missing credential hash"));
        }

        check_ledger(&snapshot.ledger, snapshot.balance)
            .map_err(|reason| BankError::corrupt_snapshot(&snapshot.id, reason))?;

        Ok(Account::from_parts(
            snapshot.id,
            snapshot.holder_name,
            snapshot.credential_hash,
            snapshot.balance,
            snapshot.ledger,
            snapshot.created_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credential::Sha256Hasher;
    use crate::types::EntryKind;

    fn sample_account() -> Account {
        let mut account = Account::create(
            "A1",
            "Alice",
            "pass1234",
            "1000.00".parse().unwrap(),
            &Sha256Hasher,
        )
        .unwrap();
        account.deposit("250.00".parse().unwrap(), "Deposit").unwrap();
        account.withdraw("100.00".parse().unwrap(), "Withdrawal").unwrap();
        account
    }

    #[test]
    fn test_snapshot_round_trip_preserves_account() {
        let account = sample_account();

        let snapshot = AccountSnapshot::from(&account);
        let restored = Account::try_from(snapshot).unwrap();

        assert_eq!(restored, account);
    }

    #[test]
    fn test_snapshot_json_round_trip() {
        let snapshot = AccountSnapshot::from(&sample_account());

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: AccountSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let snapshot = AccountSnapshot::from(&sample_account());

        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["account_number"], "A1");
        assert_eq!(json["account_holder"], "Alice");
        assert_eq!(json["balance"], "1150.00");
        assert_eq!(json["transactions"].as_array().unwrap().len(), 3);
        assert!(json.get("password_hash").is_some());
        assert!(json.get("created_at").is_some());
    }

    #[test]
    fn test_snapshot_with_mismatched_balance_is_rejected() {
        let mut snapshot = AccountSnapshot::from(&sample_account());
        snapshot.balance = "5000".parse().unwrap();

        let error = Account::try_from(snapshot).unwrap_err();

        assert!(matches!(error, BankError::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_snapshot_with_negative_balance_is_rejected() {
        let mut snapshot = AccountSnapshot::from(&sample_account());
        snapshot.ledger.clear();
        snapshot.balance = "-1".parse().unwrap();

        assert!(Account::try_from(snapshot).is_err());
    }

    #[test]
    fn test_snapshot_with_broken_chain_is_rejected() {
        let mut snapshot = AccountSnapshot::from(&sample_account());
        snapshot.ledger[1].kind = EntryKind::Debit;

        assert!(Account::try_from(snapshot).is_err());
    }

    #[test]
    fn test_snapshot_with_empty_identifier_is_rejected() {
        let mut snapshot = AccountSnapshot::from(&sample_account());
        snapshot.id = "  ".to_string();

        assert!(Account::try_from(snapshot).is_err());
    }
}
