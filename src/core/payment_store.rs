//! Payment storage
//!
//! This module provides the PaymentStore component that keeps every payment
//! the ledger has made. Payments are never deleted; the only in-place change
//! after creation is a status update on reject (or an overwrite on import).
//!
//! # Ordering
//!
//! Payments are stored in insertion order. That order is the canonical
//! iteration order for export and for partitioning aggregation work.
//!
//! # Snapshots
//!
//! The collection sits behind an `Arc` so aggregation workers can share it
//! without copying. Mutation goes through `Arc::make_mut`, which only clones
//! the collection while a snapshot is still alive.

use crate::types::{AccountId, LedgerError, Payment, PaymentStatus};
use std::sync::Arc;

/// Payment store
///
/// Maintains a Vec of payments in insertion order with linear-scan lookups.
#[derive(Debug, Default)]
pub struct PaymentStore {
    /// Payments in insertion order
    payments: Arc<Vec<Payment>>,
}

impl PaymentStore {
    /// Create a new empty payment store
    pub fn new() -> Self {
        PaymentStore {
            payments: Arc::new(Vec::new()),
        }
    }

    /// Append a payment and return a reference to the stored copy
    pub fn store(&mut self, payment: Payment) -> &Payment {
        let payments = Arc::make_mut(&mut self.payments);
        payments.push(payment);
        &payments[payments.len() - 1]
    }

    /// Get a payment by ID
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if no payment has this ID.
    pub fn get(&self, payment_id: &str) -> Result<&Payment, LedgerError> {
        self.payments
            .iter()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| LedgerError::payment_not_found(payment_id))
    }

    /// Get a mutable reference to a payment by ID
    pub fn get_mut(&mut self, payment_id: &str) -> Result<&mut Payment, LedgerError> {
        Arc::make_mut(&mut self.payments)
            .iter_mut()
            .find(|payment| payment.id == payment_id)
            .ok_or_else(|| LedgerError::payment_not_found(payment_id))
    }

    /// Set the status of a payment
    pub fn set_status(
        &mut self,
        payment_id: &str,
        status: PaymentStatus,
    ) -> Result<(), LedgerError> {
        let payment = self.get_mut(payment_id)?;
        payment.status = status;
        Ok(())
    }

    /// Restore a payment from a dump, replacing any payment with the same ID
    pub fn upsert(&mut self, payment: Payment) {
        let payments = Arc::make_mut(&mut self.payments);
        match payments.iter_mut().find(|p| p.id == payment.id) {
            Some(existing) => *existing = payment,
            None => payments.push(payment),
        }
    }

    /// Copies of all payments for one account, in insertion order
    pub fn for_account(&self, account_id: AccountId) -> Vec<Payment> {
        self.payments
            .iter()
            .filter(|payment| payment.account_id == account_id)
            .cloned()
            .collect()
    }

    /// All payments in insertion order
    pub fn all(&self) -> &[Payment] {
        self.payments.as_slice()
    }

    /// Shared read-only view of all payments, without copying them
    pub fn snapshot(&self) -> Arc<Vec<Payment>> {
        Arc::clone(&self.payments)
    }
}
