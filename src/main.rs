//! Wallet Ledger CLI
//!
//! Command-line interface over a wallet ledger persisted as a dump directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- register +79001112233
//! cargo run -- deposit 1 500
//! cargo run -- pay 1 100 phone
//! cargo run -- --workers 4 sum
//! cargo run -- --data-dir /tmp/ledger history 1 --out-dir history --batch-size 3
//! ```
//!
//! Every invocation loads the ledger from `--data-dir` (default `data`), runs
//! one command and prints its result to stdout. Commands that change the
//! ledger save it back to the same directory.
//!
//! Logs go to stderr; set `RUST_LOG=debug` to see every ledger operation.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown account, insufficient balance, unreadable dump, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use wallet_ledger::cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::execute(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
