use crate::io::DEFAULT_DATA_FILE;
use crate::strategy::BatchConfig;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Command-line arguments for the bank ledger
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "Manage bank accounts with a durable JSON ledger", long_about = None)]
pub struct CliArgs {
    /// Snapshot file holding every account
    #[arg(
        long = "data-file",
        value_name = "PATH",
        env = "BANK_DATA_FILE",
        default_value = DEFAULT_DATA_FILE,
        global = true
    )]
    pub data_file: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new account
    Open {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, value_name = "NAME")]
        holder: String,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,

        /// Opening balance, recorded as an initial deposit when positive
        #[arg(long, value_name = "AMOUNT", default_value = "0", allow_negative_numbers = true)]
        balance: Decimal,
    },

    /// Deposit into an account
    Deposit {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,

        #[arg(long, value_name = "TEXT", default_value = "")]
        description: String,
    },

    /// Withdraw from an account
    Withdraw {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,

        #[arg(long, value_name = "TEXT", default_value = "")]
        description: String,
    },

    /// Move funds between accounts, authenticated against the source
    Transfer {
        #[arg(value_name = "FROM")]
        from: String,

        #[arg(value_name = "TO")]
        to: String,

        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: Decimal,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,
    },

    /// Show the balance of an account
    Balance {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,
    },

    /// Show the ledger of an account, oldest first
    History {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, value_name = "CREDENTIAL")]
        credential: String,

        /// Only the most recent N entries (0 shows everything)
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// List every account as CSV
    List,

    /// Apply a CSV file of operations and print the resulting accounts
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[arg(value_name = "INPUT", help = "Path to the operations CSV file")]
    pub input_file: PathBuf,

    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for file order or 'async' for concurrent batches"
    )]
    pub strategy: StrategyType,

    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of operations per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads for the async strategy (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl ApplyArgs {
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent.unwrap_or(default.max_concurrent),
            )
        } else {
            BatchConfig::default()
        }
    }
}
