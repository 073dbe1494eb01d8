use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage wallet accounts, payments and favorites
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Manage wallet accounts, payments and favorites", long_about = None)]
pub struct CliArgs {
    /// Directory holding the ledger dump between invocations
    #[arg(
        long = "data-dir",
        value_name = "DIR",
        default_value = "data",
        global = true,
        help = "Directory the ledger is loaded from and saved to"
    )]
    pub data_dir: PathBuf,

    /// Number of aggregation workers
    #[arg(
        long = "workers",
        value_name = "COUNT",
        global = true,
        help = "Number of workers for sum/filter (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

/// One ledger operation per invocation
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Register a new account
    Register { phone: String },

    /// Add funds to an account
    Deposit {
        account_id: i64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Pay from an account
    Pay {
        account_id: i64,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
        category: String,
    },

    /// Reject a payment and refund it
    Reject { payment_id: String },

    /// Pay again like an earlier payment
    Repeat { payment_id: String },

    /// Save a payment as a named favorite
    Favorite { payment_id: String, name: String },

    /// Pay using a favorite
    PayFavorite { favorite_id: String },

    /// Show one account
    FindAccount { account_id: i64 },

    /// Show one payment
    FindPayment { payment_id: String },

    /// Show one favorite
    FindFavorite { favorite_id: String },

    /// List the payments of an account, optionally writing them to batch files
    History {
        account_id: i64,
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: Option<PathBuf>,
        #[arg(long = "batch-size", value_name = "SIZE", default_value_t = 10)]
        batch_size: usize,
    },

    /// Total amount of all payments
    Sum,

    /// List the payments of an account using concurrent workers
    Filter { account_id: i64 },

    /// Write all accounts to a single file
    ExportFile { path: PathBuf },

    /// Append accounts from a single file
    ImportFile { path: PathBuf },

    /// Write the whole ledger to a dump directory
    ExportDir { dir: PathBuf },

    /// Merge a dump directory into the ledger
    ImportDir { dir: PathBuf },
}

impl Command {
    /// Whether the command changes the ledger and must be saved afterwards
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Register { .. }
                | Command::Deposit { .. }
                | Command::Pay { .. }
                | Command::Reject { .. }
                | Command::Repeat { .. }
                | Command::Favorite { .. }
                | Command::PayFavorite { .. }
                | Command::ImportFile { .. }
                | Command::ImportDir { .. }
        )
    }
}

impl CliArgs {
    /// Aggregation worker count, defaulting to the number of CPU cores
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }
}
