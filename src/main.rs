//! Bank Ledger CLI
//!
//! Command-line interface for managing accounts stored in a JSON snapshot file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- open A1 --holder Alice --credential pass1234 --balance 1000
//! cargo run -- deposit A1 250 --credential pass1234 --description Salary
//! cargo run -- transfer A1 A2 300 --credential pass1234
//! cargo run -- history A1 --credential pass1234 --limit 10
//! cargo run -- --data-file ledger.json apply operations.csv --strategy async > accounts.csv
//! ```
//!
//! Logs go to stderr and are filtered with `RUST_LOG` (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Rejected operation or error (bad credential, insufficient funds, file not readable, etc.)

use bank_ledger::{cli, logging};
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    if let Err(e) = cli::execute(args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
