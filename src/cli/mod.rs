// CLI module
// Command-line interface, argument parsing and command dispatch

mod args;

pub use args::{ApplyArgs, CliArgs, Command, StrategyType};

use crate::core::Bank;
use crate::io::{write_accounts_csv, JsonFileStore};
use crate::strategy;
use crate::types::{Account, BankError, EntryKind};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;

pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run one command against the bank stored in `args.data_file`
///
/// Command output goes to `output`. Mutating commands check that the new
/// state reached the snapshot file before reporting success.
pub fn execute(args: CliArgs, output: &mut dyn Write) -> Result<(), BankError> {
    let bank = Arc::new(Bank::open(JsonFileStore::new(&args.data_file)));

    match args.command {
        Command::Open {
            id,
            holder,
            credential,
            balance,
        } => {
            bank.create_account(&id, &holder, &credential, balance)?;
            bank.save()?;
            writeln!(output, "Account {} created for {}", id, holder)?;
        }
        Command::Deposit {
            id,
            amount,
            credential,
            description,
        } => {
            let balance = bank.deposit(&id, &credential, amount, &description)?;
            bank.save()?;
            writeln!(output, "Deposited {:.2}. New balance: {:.2}", amount, balance)?;
        }
        Command::Withdraw {
            id,
            amount,
            credential,
            description,
        } => {
            let balance = bank.withdraw(&id, &credential, amount, &description)?;
            bank.save()?;
            writeln!(output, "Withdrew {:.2}. New balance: {:.2}", amount, balance)?;
        }
        Command::Transfer {
            from,
            to,
            amount,
            credential,
        } => {
            bank.transfer(&from, &to, amount, &credential)?;
            bank.save()?;
            writeln!(output, "Transfer successful")?;
        }
        Command::Balance { id, credential } => {
            let account = login(&bank, &id, &credential)?;
            writeln!(output, "{:.2}", account.balance())?;
        }
        Command::History {
            id,
            credential,
            limit,
        } => {
            let account = login(&bank, &id, &credential)?;
            write_history(&account, limit, output)?;
        }
        Command::List => write_accounts_csv(&bank.list_accounts(), output)?,
        Command::Apply(apply) => {
            let config = matches!(apply.strategy, StrategyType::Async).then(|| apply.to_batch_config());
            let strategy = strategy::create_strategy(apply.strategy, config);

            strategy.process(Arc::clone(&bank), &apply.input_file, output)?;
            bank.save()?;
        }
    }

    Ok(())
}

fn login(bank: &Bank, id: &str, credential: &str) -> Result<Account, BankError> {
    bank.authenticate(id, credential)
        .ok_or(BankError::AuthenticationFailed)
}

fn write_history(
    account: &Account,
    limit: Option<usize>,
    output: &mut dyn Write,
) -> Result<(), BankError> {
    let entries = account.history(limit);

    if entries.is_empty() {
        writeln!(output, "No transactions found.")?;
        return Ok(());
    }

    writeln!(
        output,
        "{:<20} {:<25} {:<7} {:>14} {:>14}",
        "Date", "Description", "Type", "Amount", "Balance"
    )?;

    for entry in entries {
        let kind = match entry.kind {
            EntryKind::Credit => "CREDIT",
            EntryKind::Debit => "DEBIT",
        };
        let description: String = entry.description.chars().take(24).collect();

        writeln!(
            output,
            "{:<20} {:<25} {:<7} {:>14.2} {:>14.2}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            description,
            kind,
            entry.amount,
            entry.balance_after
        )?;
    }

    Ok(())
}
