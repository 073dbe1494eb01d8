//! Dump format handling for ledger records
//!
//! This module centralizes the delimited text format shared by every
//! persistence scheme:
//! - fields joined by `;`, no header row, no quoting or escaping
//! - one record per line (`\n`) in directory and history dumps
//! - records joined by `|` in the single-file account dump
//!
//! Field order is the declaration order of the entity structs:
//! - account: `id;phone;balance`
//! - payment: `id;account_id;amount;category;status`
//! - favorite: `id;account_id;name;amount;category`
//!
//! Because nothing is escaped, text fields containing `;`, `|`, `\r` or `\n`
//! are refused at write time instead of producing an ambiguous file. Fields
//! are trimmed on read, so leading or trailing whitespace is refused too.

use crate::types::{Account, Favorite, LedgerError, Payment};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, Trim, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Read;
use std::marker::PhantomData;

/// Account dump file name in a dump directory
pub const ACCOUNTS_FILE: &str = "accounts.dump";

/// Payment dump file name (also the single-batch history file name)
pub const PAYMENTS_FILE: &str = "payments.dump";

/// Favorite dump file name in a dump directory
pub const FAVORITES_FILE: &str = "favorites.dump";

/// Separator between fields of one record
pub const FIELD_DELIMITER: u8 = b';';

/// Record terminator of directory and history dumps
pub const LINE_TERMINATOR: u8 = b'\n';

/// Record separator of the single-file account dump
pub const RECORD_SEPARATOR: u8 = b'|';

const RESERVED: [char; 4] = [';', '|', '\r', '\n'];

/// An entity that can be written to and read from a dump
pub trait DumpRecord: Serialize + DeserializeOwned {
    /// Number of fields in one record
    const FIELD_COUNT: usize;

    /// Free-text fields, checked for reserved characters before writing
    fn text_fields(&self) -> Vec<&str>;
}

impl DumpRecord for Account {
    const FIELD_COUNT: usize = 3;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.phone.as_str()]
    }
}

impl DumpRecord for Payment {
    const FIELD_COUNT: usize = 5;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.category.as_str()]
    }
}

impl DumpRecord for Favorite {
    const FIELD_COUNT: usize = 5;

    fn text_fields(&self) -> Vec<&str> {
        vec![self.id.as_str(), self.name.as_str(), self.category.as_str()]
    }
}

/// Encode records into dump bytes, each followed by `terminator`
///
/// # Errors
///
/// Returns `MalformedRecord` (with the 1-based record number) if a text field
/// contains a reserved character or leading/trailing whitespace. Nothing is
/// encoded in that case.
pub fn encode_records<T: DumpRecord>(
    records: &[T],
    terminator: u8,
) -> Result<Vec<u8>, LedgerError> {
    for (index, record) in records.iter().enumerate() {
        for field in record.text_fields() {
            let problem = if field.contains(&RESERVED[..]) {
                "contains a reserved delimiter"
            } else if field.trim() != field {
                "has leading or trailing whitespace"
            } else {
                continue;
            };

            return Err(LedgerError::malformed(
                Some(index as u64 + 1),
                format!("field {:?} {}", field, problem),
            ));
        }
    }

    let mut writer = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(terminator))
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| LedgerError::io("dump buffer", e.into_error()))
}

/// Streaming reader over dump records
///
/// Yields one `Result` per record so callers can commit records as they go.
/// Empty and whitespace-only lines are skipped and fields are trimmed. Record
/// numbers count only the records that are not skipped. Parsing is strict: a
/// wrong field count, a bad integer or an unknown status is a
/// `MalformedRecord` error.
pub struct DumpReader<R: Read, T> {
    records: csv::StringRecordsIntoIter<R>,
    index: u64,
    _record: PhantomData<T>,
}

impl<R: Read, T: DumpRecord> DumpReader<R, T> {
    /// Create a reader splitting records on `terminator`
    pub fn new(reader: R, terminator: Terminator) -> Self {
        let records = ReaderBuilder::new()
            .delimiter(FIELD_DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .terminator(terminator)
            .from_reader(reader)
            .into_records();

        Self {
            records,
            index: 0,
            _record: PhantomData,
        }
    }

    /// Reader for newline-delimited dumps (`\n` or `\r\n`)
    pub fn lines(reader: R) -> Self {
        Self::new(reader, Terminator::CRLF)
    }
}

impl<R: Read, T: DumpRecord> Iterator for DumpReader<R, T> {
    type Item = Result<T, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = loop {
            match self.records.next()? {
                Ok(record) if is_blank(&record) => continue,
                other => break other,
            }
        };
        self.index += 1;

        Some(
            record
                .map_err(LedgerError::from)
                .and_then(|record| parse_record(&record, self.index)),
        )
    }
}

/// A whitespace-only line trims down to a single empty field
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record[0].is_empty()
}

/// Convert one raw record into an entity
fn parse_record<T: DumpRecord>(record: &StringRecord, index: u64) -> Result<T, LedgerError> {
    if record.len() != T::FIELD_COUNT {
        return Err(LedgerError::malformed(
            Some(index),
            format!(
                "expected {} fields, found {}",
                T::FIELD_COUNT,
                record.len()
            ),
        ));
    }

    record
        .deserialize(None)
        .map_err(|e| LedgerError::malformed(Some(index), e.to_string()))
}
