// CLI module
// Command-line interface, argument parsing and command execution

mod args;

pub use args::{CliArgs, Command};

use crate::core::Ledger;
use crate::io::{export_dir, export_to_file, history_to_files, import_dir, import_from_file};
use crate::types::{LedgerError, Payment};
use clap::Parser;
use std::io::Write;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing subcommand, or `--help`),
/// clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Run one command against the ledger stored in `args.data_dir`
///
/// The ledger is loaded from the data directory, the command runs and its
/// result is written to `out`. Mutating commands save the ledger back to the
/// data directory; a failed command saves nothing.
pub fn execute(args: &CliArgs, out: &mut dyn Write) -> Result<(), LedgerError> {
    let mut ledger = Ledger::new();
    import_dir(&mut ledger, &args.data_dir)?;

    run_command(&mut ledger, &args.command, args.worker_count(), out)?;

    if args.command.is_mutating() {
        export_dir(&ledger, &args.data_dir)?;
    }

    Ok(())
}

fn run_command(
    ledger: &mut Ledger,
    command: &Command,
    workers: usize,
    out: &mut dyn Write,
) -> Result<(), LedgerError> {
    match command {
        Command::Register { phone } => writeln!(out, "{}", ledger.register_account(phone)?)?,
        Command::Deposit { account_id, amount } => {
            ledger.deposit(*account_id, *amount)?;
            writeln!(out, "{}", ledger.find_account_by_id(*account_id)?)?;
        }
        Command::Pay {
            account_id,
            amount,
            category,
        } => writeln!(out, "{}", ledger.pay(*account_id, *amount, category)?)?,
        Command::Reject { payment_id } => {
            ledger.reject(payment_id)?;
            writeln!(out, "{}", ledger.find_payment_by_id(payment_id)?)?;
        }
        Command::Repeat { payment_id } => writeln!(out, "{}", ledger.repeat(payment_id)?)?,
        Command::Favorite { payment_id, name } => {
            writeln!(out, "{}", ledger.favorite_payment(payment_id, name)?)?
        }
        Command::PayFavorite { favorite_id } => {
            writeln!(out, "{}", ledger.pay_from_favorite(favorite_id)?)?
        }
        Command::FindAccount { account_id } => {
            writeln!(out, "{}", ledger.find_account_by_id(*account_id)?)?
        }
        Command::FindPayment { payment_id } => {
            writeln!(out, "{}", ledger.find_payment_by_id(payment_id)?)?
        }
        Command::FindFavorite { favorite_id } => {
            writeln!(out, "{}", ledger.find_favorite_by_id(favorite_id)?)?
        }
        Command::History {
            account_id,
            out_dir,
            batch_size,
        } => {
            let payments = ledger.export_account_history(*account_id)?;
            match out_dir {
                Some(dir) => {
                    history_to_files(&payments, dir, *batch_size)?;
                    writeln!(out, "wrote {} payments to {}", payments.len(), dir.display())?;
                }
                None => write_payments(out, &payments)?,
            }
        }
        Command::Sum => writeln!(out, "{}", ledger.sum_payments(workers)?)?,
        Command::Filter { account_id } => {
            write_payments(out, &ledger.filter_payments(*account_id, workers)?)?
        }
        Command::ExportFile { path } => {
            export_to_file(ledger, path)?;
            writeln!(out, "exported {} accounts to {}", ledger.accounts().len(), path.display())?;
        }
        Command::ImportFile { path } => {
            import_from_file(ledger, path)?;
            writeln!(out, "{} accounts after import", ledger.accounts().len())?;
        }
        Command::ExportDir { dir } => {
            export_dir(ledger, dir)?;
            writeln!(out, "exported ledger to {}", dir.display())?;
        }
        Command::ImportDir { dir } => {
            import_dir(ledger, dir)?;
            writeln!(out, "imported ledger from {}", dir.display())?;
        }
    }

    Ok(())
}

fn write_payments(out: &mut dyn Write, payments: &[Payment]) -> Result<(), LedgerError> {
    for payment in payments {
        writeln!(out, "{}", payment)?;
    }
    Ok(())
}
