//! Account-related types for the wallet ledger
//!
//! This module defines the Account structure together with the identifier
//! and money aliases shared by every other entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier
///
/// Allocated sequentially by the ledger, starting at 1.
pub type AccountId = i64;

/// Monetary amount in minor currency units (cents, kopecks, ...)
pub type Money = i64;

/// Wallet account
///
/// Field order matches the on-disk record order: `id;phone;balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, monotonically allocated identifier
    pub id: AccountId,

    /// Phone number the account was registered with
    ///
    /// Unique across all accounts registered through the ledger
    /// (compared as an exact, case-sensitive string).
    pub phone: String,

    /// Current balance in minor units
    ///
    /// Never negative after a successful operation.
    pub balance: Money,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(id: AccountId, phone: impl Into<String>) -> Self {
        Account {
            id,
            phone: phone.into(),
            balance: 0,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account {} phone={} balance={}",
            self.id, self.phone, self.balance
        )
    }
}
