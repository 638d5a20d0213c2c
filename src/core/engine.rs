//! Operation processing engine
//!
//! This module provides the OperationEngine that replays batch operations
//! against a shared `Bank`. The bank does all validation and locking; the
//! engine only routes each record to the matching registry call and checks
//! that the record carries the fields that call needs.

use crate::core::bank::Bank;
use crate::types::{BankError, OperationRecord, OperationType};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Operation processing engine
///
/// Cheap to clone; clones share the same bank.
#[derive(Debug, Clone)]
pub struct OperationEngine {
    bank: Arc<Bank>,
}

impl OperationEngine {
    pub fn new(bank: Arc<Bank>) -> Self {
        OperationEngine { bank }
    }

    pub fn bank(&self) -> &Arc<Bank> {
        &self.bank
    }

    /// Process a single operation record
    ///
    /// # Errors
    ///
    /// Returns the registry's rejection reason, or [`BankError::Parse`] if the
    /// record lacks a field its operation requires.
    pub fn process(&self, record: OperationRecord) -> Result<(), BankError> {
        match record.op {
            OperationType::Open => self.process_open(record),
            OperationType::Deposit => self.process_deposit(record),
            OperationType::Withdraw => self.process_withdraw(record),
            OperationType::Transfer => self.process_transfer(record),
        }
    }

    fn process_open(&self, record: OperationRecord) -> Result<(), BankError> {
        let holder = record
            .holder
            .as_deref()
            .ok_or_else(|| missing_field(&record, "holder"))?;

        self.bank.create_account(
            &record.account,
            holder,
            &record.credential,
            record.amount.unwrap_or(Decimal::ZERO),
        )
    }

    fn process_deposit(&self, record: OperationRecord) -> Result<(), BankError> {
        let amount = required_amount(&record)?;

        self.bank
            .deposit(
                &record.account,
                &record.credential,
                amount,
                record.description.as_deref().unwrap_or_default(),
            )
            .map(|_| ())
    }

    fn process_withdraw(&self, record: OperationRecord) -> Result<(), BankError> {
        let amount = required_amount(&record)?;

        self.bank
            .withdraw(
                &record.account,
                &record.credential,
                amount,
                record.description.as_deref().unwrap_or_default(),
            )
            .map(|_| ())
    }

    fn process_transfer(&self, record: OperationRecord) -> Result<(), BankError> {
        let amount = required_amount(&record)?;
        let counterparty = record
            .counterparty
            .as_deref()
            .ok_or_else(|| missing_field(&record, "counterparty"))?;

        self.bank
            .transfer(&record.account, counterparty, amount, &record.credential)?;

        Ok(())
    }
}

fn required_amount(record: &OperationRecord) -> Result<Decimal, BankError> {
    record.amount.ok_or_else(|| missing_field(record, "amount"))
}

fn missing_field(record: &OperationRecord, field: &str) -> BankError {
    BankError::Parse {
        line: None,
        message: format!(
            "{:?} operation for account {} requires {}",
            record.op, record.account, field
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStore;
    use crate::types::TransferError;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn operation(op: OperationType, account: &str) -> OperationRecord {
        OperationRecord {
            op,
            account: account.to_string(),
            counterparty: None,
            amount: None,
            credential: "pass1234".to_string(),
            holder: None,
            description: None,
        }
    }

    fn open(account: &str, balance: &str) -> OperationRecord {
        OperationRecord {
            holder: Some("Holder".to_string()),
            amount: Some(dec(balance)),
            ..operation(OperationType::Open, account)
        }
    }

    fn engine() -> OperationEngine {
        OperationEngine::new(Arc::new(Bank::open(MemoryStore::new())))
    }

    fn balance(engine: &OperationEngine, id: &str) -> Decimal {
        engine.bank().get_account(id).unwrap().balance()
    }

    #[test]
    fn test_open_without_amount_starts_at_zero() {
        let engine = engine();
        let record = OperationRecord {
            amount: None,
            ..open("A1", "0")
        };

        engine.process(record).unwrap();

        assert_eq!(balance(&engine, "A1"), Decimal::ZERO);
        assert!(engine.bank().get_account("A1").unwrap().ledger().is_empty());
    }

    #[test]
    fn test_deposit_withdraw_transfer() {
        let engine = engine();
        engine.process(open("A1", "100")).unwrap();
        engine.process(open("A2", "0")).unwrap();

        engine
            .process(OperationRecord {
                amount: Some(dec("50")),
                description: Some("Salary".to_string()),
                ..operation(OperationType::Deposit, "A1")
            })
            .unwrap();
        engine
            .process(OperationRecord {
                amount: Some(dec("20")),
                ..operation(OperationType::Withdraw, "A1")
            })
            .unwrap();
        engine
            .process(OperationRecord {
                amount: Some(dec("30")),
                counterparty: Some("A2".to_string()),
                ..operation(OperationType::Transfer, "A1")
            })
            .unwrap();

        assert_eq!(balance(&engine, "A1"), dec("100"));
        assert_eq!(balance(&engine, "A2"), dec("30"));

        let history = engine.bank().get_account("A1").unwrap().history(None);
        assert_eq!(history[1].description, "Salary");
        assert_eq!(history[2].description, "Withdrawal");
    }

    #[test]
    fn test_transfer_rejection_is_wrapped() {
        let engine = engine();
        engine.process(open("A1", "10")).unwrap();

        let result = engine.process(OperationRecord {
            amount: Some(dec("5")),
            counterparty: Some("A9".to_string()),
            ..operation(OperationType::Transfer, "A1")
        });

        assert_eq!(
            result.unwrap_err(),
            BankError::Transfer(TransferError::DestinationNotFound)
        );
    }

    #[rstest]
    #[case::open_without_holder(operation(OperationType::Open, "A1"), "holder")]
    #[case::deposit_without_amount(operation(OperationType::Deposit, "A1"), "amount")]
    #[case::withdraw_without_amount(operation(OperationType::Withdraw, "A1"), "amount")]
    #[case::transfer_without_counterparty(
        OperationRecord { amount: Some(Decimal::ONE), ..operation(OperationType::Transfer, "A1") },
        "counterparty"
    )]
    fn test_incomplete_records_are_rejected(#[case] record: OperationRecord, #[case] field: &str) {
        let engine = engine();

        match engine.process(record) {
            Err(BankError::Parse { message, .. }) => assert!(message.ends_with(field)),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert!(engine.bank().is_empty());
    }
}
