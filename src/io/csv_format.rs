//! CSV format handling for batch operations and account listings
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to operation records
//! - Account listing serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::core::AccountSummary;
use crate::types::{BankError, OperationRecord, OperationType};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Header row of the account listing
pub const ACCOUNTS_HEADER: [&str; 3] = ["account", "holder", "balance"];

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns:
/// op, account, counterparty, amount, credential, holder, description
///
/// Everything after `account` is optional at this level; which columns an
/// operation needs is checked in [`convert_csv_record`].
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub op: String,
    pub account: String,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub credential: Option<String>,
    pub holder: Option<String>,
    pub description: Option<String>,
}

/// Convert a CsvRecord to an OperationRecord
///
/// This function:
/// - Parses the operation name (case-insensitive)
/// - Parses the amount into a Decimal (if present)
/// - Checks that each operation carries the columns it needs
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<OperationRecord, String> {
    let op = match csv_record.op.to_lowercase().as_str() {
        "open" => OperationType::Open,
        "deposit" => OperationType::Deposit,
        "withdraw" => OperationType::Withdraw,
        "transfer" => OperationType::Transfer,
        _ => {
            return Err(format!(
                "Invalid operation: '{}' for account {}",
                csv_record.op, csv_record.account
            ))
        }
    };

    if csv_record.account.trim().is_empty() {
        return Err(format!("{:?} operation requires an account", op));
    }

    let amount = match non_empty(csv_record.amount) {
        Some(amount_str) => match Decimal::from_str(&amount_str) {
            Ok(decimal) => Some(decimal),
            Err(_) => {
                return Err(format!(
                    "Invalid amount '{}' for account {}",
                    amount_str, csv_record.account
                ))
            }
        },
        None => None,
    };

    let counterparty = non_empty(csv_record.counterparty);
    let holder = non_empty(csv_record.holder);

    match op {
        OperationType::Open => {
            if holder.is_none() {
                return Err(format!(
                    "Open operation for account {} requires a holder",
                    csv_record.account
                ));
            }
        }
        OperationType::Deposit | OperationType::Withdraw => {
            if amount.is_none() {
                return Err(format!(
                    "{:?} operation for account {} requires an amount",
                    op, csv_record.account
                ));
            }
        }
        OperationType::Transfer => {
            if counterparty.is_none() || amount.is_none() {
                return Err(format!(
                    "Transfer operation for account {} requires a counterparty and an amount",
                    csv_record.account
                ));
            }
        }
    }

    Ok(OperationRecord {
        op,
        account: csv_record.account,
        counterparty,
        amount,
        credential: csv_record.credential.unwrap_or_default(),
        holder,
        description: non_empty(csv_record.description),
    })
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Write the account listing in CSV format
///
/// Columns: account, holder, balance. Accounts are sorted by identifier for
/// deterministic output and balances are rendered with two decimals.
pub fn write_accounts_csv(
    accounts: &[AccountSummary],
    output: &mut dyn Write,
) -> Result<(), BankError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(ACCOUNTS_HEADER)?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted_accounts {
        writer.write_record(&[
            account.id,
            account.holder_name,
            format!("{:.2}", account.balance),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
