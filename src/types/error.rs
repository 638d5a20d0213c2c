//! Error types for the bank ledger
//!
//! This module defines all error types that can occur while operating on the
//! account registry. Errors are values: a rejected operation returns one of
//! these and leaves all state untouched.
//!
//! # Error Categories
//!
//! - **Validation Errors**: empty identifiers, non-positive amounts, weak credentials, duplicates
//! - **Authentication Errors**: a single variant for "no such account" and "wrong credential"
//! - **Balance Errors**: insufficient funds, arithmetic overflow
//! - **Persistence Errors**: I/O, CSV parsing, snapshot (de)serialization, corrupt snapshots

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a transfer can be rejected
///
/// The display text of each variant is the reason message reported to the caller.
/// Checks run in declaration order and stop at the first failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("Cannot transfer to the same account")]
    SameAccount,

    /// Unknown source account or wrong credential; the two are never distinguished
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Destination account not found")]
    DestinationNotFound,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Insufficient balance")]
    InsufficientBalance,

    /// The credit would push the destination past the representable decimal range
    #[error("Balance overflow")]
    BalanceOverflow,
}

/// Main error type for the bank ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Credential shorter than the minimum length
    ///
    /// Fatal to account construction: the account is never created.
    #[error("Credential must be at least {min_len} characters long")]
    WeakCredential {
        /// Minimum accepted credential length
        min_len: usize,
    },

    #[error("Account identifier cannot be empty")]
    EmptyIdentifier,

    #[error("Account holder name cannot be empty")]
    EmptyHolderName,

    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// The identifier that is already taken
        account: String,
    },

    #[error("Opening balance cannot be negative: {amount}")]
    NegativeOpeningBalance {
        /// The rejected opening balance
        amount: Decimal,
    },

    /// Zero or negative amount for a deposit or withdrawal
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Operation that was attempted
        operation: String,
    },

    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Account identifier
        account: String,
        /// Current balance
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },

    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account identifier
        account: String,
    },

    /// Unknown account or wrong credential
    ///
    /// Deliberately carries no account detail so callers cannot tell the two apart.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Transfer rejected: {0}")]
    Transfer(#[from] TransferError),

    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    #[error("Snapshot serialization error: {message}")]
    Serialization {
        /// Description of the serde failure
        message: String,
    },

    /// A loaded snapshot violates a ledger invariant
    #[error("Corrupt snapshot for account {account}: {reason}")]
    CorruptSnapshot {
        /// Account whose snapshot is inconsistent
        account: String,
        /// What is wrong with it
        reason: String,
    },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        BankError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for BankError {
    fn from(error: serde_json::Error) -> Self {
        BankError::Serialization {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        BankError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &str, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: &str) -> Self {
        BankError::DuplicateAccount {
            account: account.to_string(),
        }
    }

    /// Create a CorruptSnapshot error
    pub fn corrupt_snapshot(account: &str, reason: impl Into<String>) -> Self {
        BankError::CorruptSnapshot {
            account: account.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::same_account(TransferError::SameAccount, "Cannot transfer to the same account")]
    #[case::authentication(TransferError::AuthenticationFailed, "Authentication failed")]
    #[case::destination(TransferError::DestinationNotFound, "Destination account not found")]
    #[case::invalid_amount(TransferError::InvalidAmount, "Invalid amount")]
    #[case::insufficient(TransferError::InsufficientBalance, "Insufficient balance")]
    fn test_transfer_error_messages(#[case] error: TransferError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::weak_credential(
        BankError::WeakCredential { min_len: 4 },
        "Credential must be at least 4 characters long"
    )]
    #[case::duplicate(
        BankError::duplicate_account("A1"),
        "Account A1 already exists"
    )]
    #[case::insufficient_funds(
        BankError::insufficient_funds("A1", Decimal::new(125000, 2), Decimal::new(200000, 2)),
        "Insufficient funds in account A1: balance 1250.00, requested 2000.00"
    )]
    #[case::invalid_amount(
        BankError::invalid_amount(Decimal::ZERO, "deposit"),
        "Invalid amount 0 for deposit"
    )]
    #[case::parse_error_with_line(
        BankError::Parse { line: Some(7), message: "bad row".to_string() },
        "CSV parse error at line 7: bad row"
    )]
    #[case::parse_error_without_line(
        BankError::Parse { line: None, message: "bad row".to_string() },
        "CSV parse error: bad row"
    )]
    #[case::transfer(
        BankError::from(TransferError::InsufficientBalance),
        "Transfer rejected: Insufficient balance"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_authentication_error_carries_no_account_detail() {
        assert_eq!(BankError::AuthenticationFailed.to_string(), "Authentication failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::Io { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_error = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let error: BankError = json_error.into();
        assert!(matches!(error, BankError::Serialization { .. }));
    }
}
