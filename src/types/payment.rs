//! Payment-related types for the wallet ledger
//!
//! This module defines payment records and the lifecycle status stored
//! with each of them.

use super::account::{AccountId, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment identifier (a UUID string for payments created by the ledger)
pub type PaymentId = String;

/// Lifecycle status of a payment
///
/// The serialized names are part of the dump format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment was created and is awaiting settlement
    #[serde(rename = "INPROGRESS")]
    InProgress,

    /// Payment settled successfully
    #[serde(rename = "OK")]
    Ok,

    /// Payment was rejected; its amount went back to the account
    #[serde(rename = "FAIL")]
    Fail,
}

impl PaymentStatus {
    /// Dump-format name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "INPROGRESS",
            PaymentStatus::Ok => "OK",
            PaymentStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment made from an account
///
/// Field order matches the on-disk record order:
/// `id;account_id;amount;category;status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique payment identifier
    pub id: PaymentId,

    /// Account the payment was debited from
    pub account_id: AccountId,

    /// Amount in minor units (always positive for ledger-created payments)
    pub amount: Money,

    /// Free-form category (auto, pharmacy, restaurant, ...)
    pub category: String,

    /// Current lifecycle status
    pub status: PaymentStatus,
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "payment {} account={} amount={} category={} status={}",
            self.id, self.account_id, self.amount, self.category, self.status
        )
    }
}
