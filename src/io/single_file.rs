//! Single-file account dump
//!
//! Accounts only, written as one blob: `id;phone;balance` records joined by
//! `|` with no trailing separator.
//!
//! Import appends every record as-is. It does not look for an existing
//! account with the same ID or phone, so importing the same file twice
//! duplicates the accounts.

use crate::core::Ledger;
use crate::io::dump_format::{encode_records, DumpReader, RECORD_SEPARATOR};
use crate::types::{Account, LedgerError};
use csv::Terminator;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Write every account to `path`, replacing the file if it exists
///
/// # Errors
///
/// Returns `MalformedRecord` if a phone contains a reserved character or
/// surrounding whitespace, and `IoFailure` if the file cannot be written.
pub fn export_to_file(ledger: &Ledger, path: &Path) -> Result<(), LedgerError> {
    let mut data = encode_records(ledger.accounts(), RECORD_SEPARATOR)?;
    if data.last() == Some(&RECORD_SEPARATOR) {
        data.pop();
    }

    fs::write(path, &data).map_err(|e| LedgerError::io(path.display(), e))?;

    debug!(
        path = %path.display(),
        accounts = ledger.accounts().len(),
        "exported accounts to file"
    );
    Ok(())
}

/// Append every account stored in `path` to the ledger
///
/// # Errors
///
/// Returns `IoFailure` if the file cannot be read and `MalformedRecord` on the
/// first bad record. Accounts read before the bad record stay imported.
pub fn import_from_file(ledger: &mut Ledger, path: &Path) -> Result<(), LedgerError> {
    let data = fs::read(path).map_err(|e| LedgerError::io(path.display(), e))?;

    let records =
        DumpReader::<_, Account>::new(data.as_slice(), Terminator::Any(RECORD_SEPARATOR));

    let mut imported = 0usize;
    for account in records {
        ledger.append_account(account?);
        imported += 1;
    }

    debug!(path = %path.display(), imported, "imported accounts from file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ledger_with_accounts() -> Ledger {
        let mut ledger = Ledger::new();
        for (phone, amount) in [("+1111", 400), ("+2222", 500), ("+3333", 600)] {
            let id = ledger.register_account(phone).unwrap().id;
            ledger.deposit(id, amount).unwrap();
        }
        ledger
    }

    #[test]
    fn test_export_writes_separator_joined_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");

        export_to_file(&ledger_with_accounts(), &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "1;+1111;400|2;+2222;500|3;+3333;600"
        );
    }

    #[test]
    fn test_export_empty_ledger_writes_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");

        export_to_file(&Ledger::new(), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_import_restores_accounts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        let source = ledger_with_accounts();
        export_to_file(&source, &path).unwrap();

        let mut target = Ledger::new();
        import_from_file(&mut target, &path).unwrap();

        assert_eq!(target.accounts(), source.accounts());
    }

    #[test]
    fn test_import_twice_duplicates_accounts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        export_to_file(&ledger_with_accounts(), &path).unwrap();

        let mut target = Ledger::new();
        import_from_file(&mut target, &path).unwrap();
        import_from_file(&mut target, &path).unwrap();

        assert_eq!(target.accounts().len(), 6);
    }

    #[test]
    fn test_import_advances_id_allocator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        fs::write(&path, "7;+7;70").unwrap();

        let mut ledger = Ledger::new();
        import_from_file(&mut ledger, &path).unwrap();

        assert_eq!(ledger.register_account("+8").unwrap().id, 8);
    }

    #[test]
    fn test_import_malformed_keeps_earlier_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.txt");
        fs::write(&path, "1;+1;10|2;+2").unwrap();

        let mut ledger = Ledger::new();
        let result = import_from_file(&mut ledger, &path);

        assert!(matches!(
            result,
            Err(LedgerError::MalformedRecord { line: Some(2), .. })
        ));
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[test]
    fn test_import_missing_file() {
        let dir = TempDir::new().unwrap();

        let result = import_from_file(&mut Ledger::new(), &dir.path().join("absent.txt"));

        assert!(matches!(result, Err(LedgerError::IoFailure { .. })));
    }
}
