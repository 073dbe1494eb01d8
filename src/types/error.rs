//! Error types for the wallet ledger
//!
//! This module defines all error types that can occur while operating on the
//! ledger or persisting it. Errors are designed to be descriptive and
//! user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Validation Errors**: Non-positive amounts, duplicate phone numbers
//! - **Lookup Errors**: Unknown accounts, payments or favorites
//! - **Balance Errors**: Payments exceeding the account balance
//! - **Dump Errors**: Malformed records, file I/O failures

use crate::types::{AccountId, Money};
use thiserror::Error;

/// Main error type for the ledger
///
/// Every operation reports its failure to the immediate caller through this
/// enum. Nothing is retried and nothing is rolled back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Another account is already registered with this phone number
    #[error("Phone number {phone} is already registered")]
    PhoneAlreadyRegistered {
        /// The duplicated phone number
        phone: String,
    },

    /// Deposit or payment amount was zero or negative
    #[error("Amount must be greater than zero, got {amount}")]
    AmountMustBePositive {
        /// The rejected amount
        amount: Money,
    },

    /// No account with the given ID exists
    #[error("Account {account_id} not found")]
    AccountNotFound {
        /// Account ID that was looked up
        account_id: AccountId,
    },

    /// Account balance does not cover the requested payment
    #[error(
        "Insufficient balance on account {account_id}: balance {balance}, requested {requested}"
    )]
    InsufficientBalance {
        /// Account ID
        account_id: AccountId,
        /// Balance at the time of the request
        balance: Money,
        /// Requested payment amount
        requested: Money,
    },

    /// A balance, ID or total would leave the `i64` range
    ///
    /// The operation is rejected and nothing is modified.
    #[error(
        "Arithmetic overflow in {operation}{}",
        .account_id.map(|id| format!(" for account {}", id)).unwrap_or_default()
    )]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account involved, if the operation targets one
        account_id: Option<AccountId>,
    },

    /// No payment with the given ID exists
    #[error("Payment {payment_id} not found")]
    PaymentNotFound {
        /// Payment ID (or lookup description) that was not found
        payment_id: String,
    },

    /// No favorite with the given ID exists
    #[error("Favorite {favorite_id} not found")]
    FavoriteNotFound {
        /// Favorite ID that was looked up
        favorite_id: String,
    },

    /// A dump record could not be parsed or written
    #[error(
        "Malformed record{}: {message}",
        .line.map(|l| format!(" at record {}", l)).unwrap_or_default()
    )]
    MalformedRecord {
        /// 1-based record number (if available)
        line: Option<u64>,
        /// Description of the problem
        message: String,
    },

    /// File create/open/read/write failed
    #[error("I/O failure ({context}): {message}")]
    IoFailure {
        /// Path or resource being accessed
        context: String,
        /// Underlying error description
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoFailure {
            context: "io".to_string(),
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_error) = error.kind() {
            return LedgerError::IoFailure {
                context: "csv".to_string(),
                message: io_error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.record() + 1);

        LedgerError::MalformedRecord {
            line,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a PhoneAlreadyRegistered error
    pub fn phone_already_registered(phone: &str) -> Self {
        LedgerError::PhoneAlreadyRegistered {
            phone: phone.to_string(),
        }
    }

    /// Create an AmountMustBePositive error
    pub fn amount_must_be_positive(amount: Money) -> Self {
        LedgerError::AmountMustBePositive { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_id: AccountId) -> Self {
        LedgerError::AccountNotFound { account_id }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account_id: AccountId, balance: Money, requested: Money) -> Self {
        LedgerError::InsufficientBalance {
            account_id,
            balance,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account_id: Option<AccountId>) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_id,
        }
    }

    /// Create a PaymentNotFound error
    pub fn payment_not_found(payment_id: &str) -> Self {
        LedgerError::PaymentNotFound {
            payment_id: payment_id.to_string(),
        }
    }

    /// Create a PaymentNotFound error for an account-level payment query
    pub fn no_payments_for_account(account_id: AccountId) -> Self {
        LedgerError::PaymentNotFound {
            payment_id: format!("for account {}", account_id),
        }
    }

    /// Create a FavoriteNotFound error
    pub fn favorite_not_found(favorite_id: &str) -> Self {
        LedgerError::FavoriteNotFound {
            favorite_id: favorite_id.to_string(),
        }
    }

    /// Create a MalformedRecord error
    pub fn malformed(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Create an IoFailure error for the given path or resource
    pub fn io(context: impl std::fmt::Display, error: std::io::Error) -> Self {
        LedgerError::IoFailure {
            context: context.to_string(),
            message: error.to_string(),
        }
    }
}
