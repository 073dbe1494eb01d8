//! Directory dump of the whole ledger
//!
//! Writes `accounts.dump`, `payments.dump` and `favorites.dump` into one
//! directory, one record per line. A file is only written when its
//! collection is non-empty.
//!
//! Import reads each file on its own; a missing file is skipped. Records
//! whose ID already exists overwrite the stored entity in place, new IDs are
//! appended. Imported payments and favorites do not touch any balance.

use crate::core::Ledger;
use crate::io::dump_format::{
    encode_records, DumpReader, DumpRecord, ACCOUNTS_FILE, FAVORITES_FILE, LINE_TERMINATOR,
    PAYMENTS_FILE,
};
use crate::types::{Account, Favorite, LedgerError, Payment};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Export accounts, payments and favorites into `dir`
///
/// The directory is created if it does not exist. Every record is encoded
/// before the first file is written.
///
/// # Errors
///
/// Returns `MalformedRecord` if a text field contains a reserved character or
/// surrounding whitespace, and `IoFailure` if the directory or a file cannot be written.
pub fn export_dir(ledger: &Ledger, dir: &Path) -> Result<(), LedgerError> {
    let files = [
        encode_file(dir, ACCOUNTS_FILE, ledger.accounts())?,
        encode_file(dir, PAYMENTS_FILE, ledger.payments())?,
        encode_file(dir, FAVORITES_FILE, ledger.favorites())?,
    ];

    fs::create_dir_all(dir).map_err(|e| LedgerError::io(dir.display(), e))?;

    for (path, data) in files.into_iter().flatten() {
        fs::write(&path, &data).map_err(|e| LedgerError::io(path.display(), e))?;
        debug!(path = %path.display(), bytes = data.len(), "wrote dump file");
    }

    Ok(())
}

/// Import every dump file found in `dir` into the ledger
///
/// # Errors
///
/// Returns `IoFailure` if an existing file cannot be read and
/// `MalformedRecord` on the first bad record. Records processed before the
/// failure stay imported.
pub fn import_dir(ledger: &mut Ledger, dir: &Path) -> Result<(), LedgerError> {
    if let Some(data) = read_optional(&dir.join(ACCOUNTS_FILE))? {
        for account in DumpReader::<_, Account>::lines(data.as_slice()) {
            ledger.restore_account(account?);
        }
    }

    if let Some(data) = read_optional(&dir.join(PAYMENTS_FILE))? {
        for payment in DumpReader::<_, Payment>::lines(data.as_slice()) {
            ledger.restore_payment(payment?);
        }
    }

    if let Some(data) = read_optional(&dir.join(FAVORITES_FILE))? {
        for favorite in DumpReader::<_, Favorite>::lines(data.as_slice()) {
            ledger.restore_favorite(favorite?);
        }
    }

    debug!(
        dir = %dir.display(),
        accounts = ledger.accounts().len(),
        payments = ledger.payments().len(),
        favorites = ledger.favorites().len(),
        "imported dump directory"
    );
    Ok(())
}

/// Encode one collection, or `None` when there is nothing to write
fn encode_file<T: DumpRecord>(
    dir: &Path,
    name: &str,
    records: &[T],
) -> Result<Option<(PathBuf, Vec<u8>)>, LedgerError> {
    if records.is_empty() {
        return Ok(None);
    }

    let data = encode_records(records, LINE_TERMINATOR)?;
    Ok(Some((dir.join(name), data)))
}

/// Read a dump file, treating a missing file as absent
fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, LedgerError> {
    match fs::read(path) {
        Ok(data) => Ok(Some(data)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "dump file not found, skipping");
            Ok(None)
        }
        Err(e) => Err(LedgerError::io(path.display(), e)),
    }
}
