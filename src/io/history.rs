//! Chunked payment history export
//!
//! Splits a payment slice into batch files of at most `batch_size` records.
//! A slice that fits in one batch goes to `payments.dump`; otherwise the
//! batches are written to `payments1.dump`, `payments2.dump`, ... in order.

use crate::io::dump_format::{encode_records, LINE_TERMINATOR, PAYMENTS_FILE};
use crate::types::{LedgerError, Payment};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Write `payments` into `dir`, split into batches of `batch_size`
///
/// Empty input returns immediately without touching the filesystem. A batch
/// size of zero is treated as one.
///
/// # Errors
///
/// Returns `MalformedRecord` if a text field contains a reserved character or
/// surrounding whitespace, and `IoFailure` if the directory or a batch file cannot be written.
pub fn history_to_files(
    payments: &[Payment],
    dir: &Path,
    batch_size: usize,
) -> Result<(), LedgerError> {
    if payments.is_empty() {
        return Ok(());
    }

    let batch_size = if batch_size == 0 {
        warn!("history batch size of 0 treated as 1");
        1
    } else {
        batch_size
    };

    let batches = payments
        .chunks(batch_size)
        .map(|batch| encode_records(batch, LINE_TERMINATOR))
        .collect::<Result<Vec<_>, _>>()?;

    fs::create_dir_all(dir).map_err(|e| LedgerError::io(dir.display(), e))?;

    let single = batches.len() == 1;
    for (index, data) in batches.iter().enumerate() {
        let path = batch_path(dir, index, single);
        fs::write(&path, data).map_err(|e| LedgerError::io(path.display(), e))?;
    }

    debug!(
        dir = %dir.display(),
        payments = payments.len(),
        files = batches.len(),
        "wrote payment history"
    );
    Ok(())
}

fn batch_path(dir: &Path, index: usize, single: bool) -> PathBuf {
    if single {
        dir.join(PAYMENTS_FILE)
    } else {
        dir.join(format!("payments{}.dump", index + 1))
    }
}
