//! Wallet Ledger Library
//! # Overview
//!
//! This library provides an in-memory wallet ledger: accounts keyed by phone
//! number, payments debited from them, and favorite payment templates, with
//! concurrent aggregation over the payment history and a plain-text dump
//! format for persistence.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, Payment, Favorite, LedgerError)
//! - [`cli`] - CLI arguments parsing and command execution
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Orchestration of every ledger operation
//!   - [`core::account_manager`] - Account state and the account-ID allocator
//!   - [`core::payment_store`] - Payment history
//!   - [`core::favorite_store`] - Favorite payment templates
//!   - [`core::aggregator`] - Concurrent sum and filter over payments
//! - [`io`] - Dump encoding and the three persistence schemes
//!
//! # Payment Lifecycle
//!
//! - **Pay**: debits the account and records an `INPROGRESS` payment
//! - **Reject**: credits the amount back and marks the payment `FAIL`
//! - **Repeat**: pays again with the account, amount and category of an
//!   earlier payment
//!
//! `OK` is never produced by the ledger itself; it only arrives through an
//! imported dump.
//!
//! # Persistence
//!
//! - Single file: accounts only, `id;phone;balance` records joined by `|`
//! - Directory: `accounts.dump`, `payments.dump`, `favorites.dump`, one
//!   record per line
//! - History: payments split into `payments1.dump`, `payments2.dump`, ...

pub mod cli;
pub mod core;
pub mod io;
pub mod types;

pub use core::{AccountManager, FavoriteStore, Ledger, PaymentAggregator, PaymentStore};
pub use io::{export_dir, export_to_file, history_to_files, import_dir, import_from_file};
pub use types::{
    Account, AccountId, Favorite, FavoriteId, LedgerError, Money, Payment, PaymentId,
    PaymentStatus,
};
