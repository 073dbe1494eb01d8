//! Favorite payment templates

use super::account::{AccountId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Favorite identifier (a UUID string for favorites created by the ledger)
pub type FavoriteId = String;

/// Reusable snapshot of a payment
///
/// Favorites are immutable once created and outlive the payment they were
/// taken from. Field order matches the on-disk record order:
/// `id;account_id;name;amount;category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub account_id: AccountId,
    /// User-chosen label
    pub name: String,
    pub amount: Money,
    pub category: String,
}

impl fmt::Display for Favorite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "favorite {} account={} name={} amount={} category={}",
            self.id, self.account_id, self.name, self.amount, self.category
        )
    }
}
