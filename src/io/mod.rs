//! I/O module
//!
//! Handles dump encoding and the persistence schemes built on it.
//!
//! # Components
//!
//! - `dump_format` - Record encoding/decoding shared by every scheme
//! - `single_file` - Accounts-only export/import in one `|`-separated file
//! - `directory` - Full ledger export/import as one file per collection
//! - `history` - Payment history split into fixed-size batch files

pub mod directory;
pub mod dump_format;
pub mod history;
pub mod single_file;

pub use directory::{export_dir, import_dir};
pub use dump_format::{encode_records, DumpReader, DumpRecord};
pub use history::history_to_files;
pub use single_file::{export_to_file, import_from_file};
