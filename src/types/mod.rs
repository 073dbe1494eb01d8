//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account-related types and identifiers
//! - `payment`: Payment records and their status
//! - `favorite`: Favorite payment templates
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod favorite;
pub mod payment;

pub use account::{Account, AccountId, Money};
pub use error::LedgerError;
pub use favorite::{Favorite, FavoriteId};
pub use payment::{Payment, PaymentId, PaymentStatus};
