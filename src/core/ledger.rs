//! Ledger orchestration
//!
//! This module provides the `Ledger`, which owns the account, payment and
//! favorite collections and exposes every operation on them. All mutation
//! goes through it.
//!
//! The ledger enforces business rules such as:
//! - Unique phone numbers across accounts
//! - Positive deposit and payment amounts
//! - Balances that never go negative
//! - Payments and favorites that reference an existing account
//!
//! # Concurrency
//!
//! Mutating operations take `&mut self` and are meant for sequential use.
//! Callers sharing a ledger across threads must serialize access themselves.
//! Aggregation (`sum_payments`, `filter_payments`) only reads the payment
//! collection and fans the work out to concurrent workers.

use crate::core::account_manager::AccountManager;
use crate::core::aggregator::PaymentAggregator;
use crate::core::favorite_store::FavoriteStore;
use crate::core::payment_store::PaymentStore;
use crate::types::{
    Account, AccountId, Favorite, LedgerError, Money, Payment, PaymentStatus,
};
use tracing::{debug, warn};
use uuid::Uuid;

/// In-memory wallet ledger
///
/// Coordinates the AccountManager, PaymentStore and FavoriteStore. Returned
/// references borrow from the ledger; ownership of entities never leaves it.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: AccountManager,
    payments: PaymentStore,
    favorites: FavoriteStore,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Ledger {
            accounts: AccountManager::new(),
            payments: PaymentStore::new(),
            favorites: FavoriteStore::new(),
        }
    }

    /// Register a new account for `phone`
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if the phone is taken.
    pub fn register_account(&mut self, phone: &str) -> Result<&Account, LedgerError> {
        let account = self.accounts.register(phone)?;
        debug!(account_id = account.id, "registered account");
        Ok(account)
    }

    /// Find an account by ID
    pub fn find_account_by_id(&self, account_id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts.get(account_id)
    }

    /// Deposit funds into an account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative
    /// - The account does not exist
    pub fn deposit(&mut self, account_id: AccountId, amount: Money) -> Result<(), LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        self.accounts.credit(account_id, amount, "deposit")?;
        debug!(account_id, amount, "deposited");
        Ok(())
    }

    /// Pay `amount` from an account under `category`
    ///
    /// Debits the account and records a new `INPROGRESS` payment with a
    /// freshly generated ID.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `amount` is zero or negative
    /// - The account does not exist
    /// - The balance is lower than `amount`
    pub fn pay(
        &mut self,
        account_id: AccountId,
        amount: Money,
        category: &str,
    ) -> Result<&Payment, LedgerError> {
        if amount <= 0 {
            return Err(LedgerError::amount_must_be_positive(amount));
        }

        self.accounts.debit(account_id, amount)?;

        let payment = self.payments.store(Payment {
            id: Uuid::new_v4().to_string(),
            account_id,
            amount,
            category: category.to_string(),
            status: PaymentStatus::InProgress,
        });
        debug!(payment_id = %payment.id, account_id, amount, "payment created");

        Ok(payment)
    }

    /// Find a payment by ID
    pub fn find_payment_by_id(&self, payment_id: &str) -> Result<&Payment, LedgerError> {
        self.payments.get(payment_id)
    }

    /// Reject a payment and credit its amount back to the account
    ///
    /// Rejecting a payment that is already `FAIL` changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` or `AccountNotFound` when either lookup fails;
    /// neither collection is modified in that case.
    pub fn reject(&mut self, payment_id: &str) -> Result<(), LedgerError> {
        let payment = self.payments.get(payment_id)?;

        if payment.status == PaymentStatus::Fail {
            warn!(payment_id, "payment already rejected, skipping refund");
            return Ok(());
        }

        let (account_id, amount) = (payment.account_id, payment.amount);

        self.accounts.credit(account_id, amount, "reject")?;
        self.payments.set_status(payment_id, PaymentStatus::Fail)?;
        debug!(payment_id, account_id, amount, "payment rejected");

        Ok(())
    }

    /// Pay again with the account, amount and category of an earlier payment
    ///
    /// The new payment gets its own ID and starts `INPROGRESS` regardless of
    /// the earlier payment's status.
    pub fn repeat(&mut self, payment_id: &str) -> Result<&Payment, LedgerError> {
        let earlier = self.payments.get(payment_id)?;
        let (account_id, amount, category) = (
            earlier.account_id,
            earlier.amount,
            earlier.category.clone(),
        );

        self.pay(account_id, amount, &category)
    }

    /// Save a payment as a named favorite
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if the payment does not exist.
    pub fn favorite_payment(
        &mut self,
        payment_id: &str,
        name: &str,
    ) -> Result<&Favorite, LedgerError> {
        let payment = self.payments.get(payment_id)?;

        let favorite = Favorite {
            id: Uuid::new_v4().to_string(),
            account_id: payment.account_id,
            name: name.to_string(),
            amount: payment.amount,
            category: payment.category.clone(),
        };

        let favorite = self.favorites.store(favorite);
        debug!(favorite_id = %favorite.id, payment_id, "favorite created");
        Ok(favorite)
    }

    /// Find a favorite by ID
    pub fn find_favorite_by_id(&self, favorite_id: &str) -> Result<&Favorite, LedgerError> {
        self.favorites.get(favorite_id)
    }

    /// Make a payment from a favorite template
    ///
    /// Errors from the payment itself are returned unchanged.
    pub fn pay_from_favorite(&mut self, favorite_id: &str) -> Result<&Payment, LedgerError> {
        let favorite = self.favorites.get(favorite_id)?;
        let (account_id, amount, category) = (
            favorite.account_id,
            favorite.amount,
            favorite.category.clone(),
        );

        self.pay(account_id, amount, &category)
    }

    /// Payments of one account, in insertion order
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist and
    /// `PaymentNotFound` if it has no payments.
    pub fn export_account_history(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<Payment>, LedgerError> {
        self.accounts.get(account_id)?;

        let payments = self.payments.for_account(account_id);
        if payments.is_empty() {
            return Err(LedgerError::no_payments_for_account(account_id));
        }

        Ok(payments)
    }

    /// Total amount across all payments, computed by `workers` concurrent workers
    ///
    /// A worker count of zero is treated as one. Safe to call from inside a
    /// tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the total does not fit in `Money`.
    pub fn sum_payments(&self, workers: usize) -> Result<Money, LedgerError> {
        PaymentAggregator::new(workers)?.sum(self.payments.snapshot())
    }

    /// All payments of one account, computed by `workers` concurrent workers
    ///
    /// Results follow insertion order.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` (not `AccountNotFound`) if the account does
    /// not exist.
    pub fn filter_payments(
        &self,
        account_id: AccountId,
        workers: usize,
    ) -> Result<Vec<Payment>, LedgerError> {
        if !self.accounts.contains(account_id) {
            return Err(LedgerError::no_payments_for_account(account_id));
        }

        PaymentAggregator::new(workers)?.filter_by_account(self.payments.snapshot(), account_id)
    }

    /// All accounts in insertion order
    pub fn accounts(&self) -> &[Account] {
        self.accounts.all()
    }

    /// All payments in insertion order
    pub fn payments(&self) -> &[Payment] {
        self.payments.all()
    }

    /// All favorites in insertion order
    pub fn favorites(&self) -> &[Favorite] {
        self.favorites.all()
    }

    /// Restore an account, overwriting one with the same ID
    pub fn restore_account(&mut self, account: Account) {
        self.accounts.upsert(account);
    }

    /// Append an account without any duplicate check
    pub fn append_account(&mut self, account: Account) {
        self.accounts.append(account);
    }

    /// Restore a payment, overwriting one with the same ID
    ///
    /// No balance is touched and the account is not required to exist.
    pub fn restore_payment(&mut self, payment: Payment) {
        self.payments.upsert(payment);
    }

    /// Restore a favorite, overwriting one with the same ID
    pub fn restore_favorite(&mut self, favorite: Favorite) {
        self.favorites.upsert(favorite);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Ledger with one account holding `balance`
    fn funded(balance: Money) -> (Ledger, AccountId) {
        let mut ledger = Ledger::new();
        let id = ledger.register_account("+992000000001").unwrap().id;
        ledger.deposit(id, balance).unwrap();
        (ledger, id)
    }

    #[test]
    fn test_register_ids_strictly_increase() {
        let mut ledger = Ledger::new();

        let ids: Vec<AccountId> = (0..5)
            .map(|i| ledger.register_account(&format!("+{}", i)).unwrap().id)
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_register_duplicate_phone() {
        let mut ledger = Ledger::new();
        ledger.register_account("+1").unwrap();

        let result = ledger.register_account("+1");

        assert!(matches!(
            result,
            Err(LedgerError::PhoneAlreadyRegistered { .. })
        ));
        assert_eq!(ledger.accounts().len(), 1);
    }

    #[rstest]
    #[case::zero(0)]
    #[case::negative(-10)]
    fn test_deposit_non_positive_amount(#[case] amount: Money) {
        let (mut ledger, id) = funded(100);

        let result = ledger.deposit(id, amount);

        assert_eq!(result, Err(LedgerError::amount_must_be_positive(amount)));
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 100);
    }

    #[test]
    fn test_deposit_unknown_account() {
        let mut ledger = Ledger::new();

        assert_eq!(ledger.deposit(3, 10), Err(LedgerError::account_not_found(3)));
    }

    #[test]
    fn test_pay_debits_and_creates_in_progress_payment() {
        let (mut ledger, id) = funded(1_000);

        let payment = ledger.pay(id, 300, "auto").unwrap().clone();

        assert_eq!(payment.account_id, id);
        assert_eq!(payment.amount, 300);
        assert_eq!(payment.category, "auto");
        assert_eq!(payment.status, PaymentStatus::InProgress);
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 700);
        assert_eq!(ledger.find_payment_by_id(&payment.id).unwrap(), &payment);
    }

    #[rstest]
    #[case::zero_amount(1, 0, LedgerError::amount_must_be_positive(0))]
    #[case::unknown_account(2, 10, LedgerError::account_not_found(2))]
    #[case::insufficient(1, 101, LedgerError::insufficient_balance(1, 100, 101))]
    fn test_pay_failures_leave_state_unchanged(
        #[case] account_id: AccountId,
        #[case] amount: Money,
        #[case] expected: LedgerError,
    ) {
        let (mut ledger, id) = funded(100);

        let result = ledger.pay(account_id, amount, "auto").cloned();

        assert_eq!(result, Err(expected));
        assert!(ledger.payments().is_empty());
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 100);
    }

    #[test]
    fn test_payment_ids_are_unique() {
        let (mut ledger, id) = funded(100);

        let first = ledger.pay(id, 10, "a").unwrap().id.clone();
        let second = ledger.pay(id, 10, "a").unwrap().id.clone();

        assert_ne!(first, second);
    }

    #[test]
    fn test_find_payment_unknown() {
        let ledger = Ledger::new();

        assert_eq!(
            ledger.find_payment_by_id("missing"),
            Err(LedgerError::payment_not_found("missing"))
        );
    }

    #[test]
    fn test_reject_restores_balance_and_fails_payment() {
        let (mut ledger, id) = funded(500);
        let payment_id = ledger.pay(id, 200, "shop").unwrap().id.clone();

        ledger.reject(&payment_id).unwrap();

        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 500);
        assert_eq!(
            ledger.find_payment_by_id(&payment_id).unwrap().status,
            PaymentStatus::Fail
        );
    }

    #[test]
    fn test_reject_twice_does_not_credit_twice() {
        let (mut ledger, id) = funded(500);
        let payment_id = ledger.pay(id, 200, "shop").unwrap().id.clone();

        ledger.reject(&payment_id).unwrap();
        ledger.reject(&payment_id).unwrap();

        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 500);
    }

    #[test]
    fn test_reject_unknown_payment() {
        let (mut ledger, id) = funded(500);

        let result = ledger.reject("missing");

        assert!(matches!(result, Err(LedgerError::PaymentNotFound { .. })));
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 500);
    }

    #[test]
    fn test_reject_payment_of_unknown_account() {
        let mut ledger = Ledger::new();
        ledger.restore_payment(Payment {
            id: "orphan".to_string(),
            account_id: 99,
            amount: 10,
            category: "x".to_string(),
            status: PaymentStatus::InProgress,
        });

        let result = ledger.reject("orphan");

        assert_eq!(result, Err(LedgerError::account_not_found(99)));
        assert_eq!(
            ledger.find_payment_by_id("orphan").unwrap().status,
            PaymentStatus::InProgress
        );
    }

    #[rstest]
    #[case::deposit("deposit")]
    #[case::reject("reject")]
    fn test_balance_overflow_leaves_state_unchanged(#[case] operation: &str) {
        let (mut ledger, id) = funded(100);
        let payment_id = ledger.pay(id, 100, "auto").unwrap().id.clone();
        ledger.deposit(id, Money::MAX).unwrap();

        let result = match operation {
            "deposit" => ledger.deposit(id, 1),
            _ => ledger.reject(&payment_id),
        };

        assert_eq!(
            result,
            Err(LedgerError::arithmetic_overflow(operation, Some(id)))
        );
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, Money::MAX);
        assert_eq!(
            ledger.find_payment_by_id(&payment_id).unwrap().status,
            PaymentStatus::InProgress
        );
    }

    #[test]
    fn test_repeat_creates_new_in_progress_payment() {
        let (mut ledger, id) = funded(500);
        let original = ledger.pay(id, 100, "cafe").unwrap().id.clone();
        ledger.reject(&original).unwrap();

        let repeated = ledger.repeat(&original).unwrap().clone();

        assert_ne!(repeated.id, original);
        assert_eq!(repeated.amount, 100);
        assert_eq!(repeated.category, "cafe");
        assert_eq!(repeated.status, PaymentStatus::InProgress);
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 400);
    }

    #[test]
    fn test_repeat_propagates_pay_errors() {
        let (mut ledger, id) = funded(100);
        let original = ledger.pay(id, 100, "cafe").unwrap().id.clone();

        let result = ledger.repeat(&original).cloned();

        assert_eq!(result, Err(LedgerError::insufficient_balance(id, 0, 100)));
        assert_eq!(ledger.payments().len(), 1);
    }

    #[test]
    fn test_favorite_snapshots_payment() {
        let (mut ledger, id) = funded(500);
        let payment_id = ledger.pay(id, 100, "phone").unwrap().id.clone();

        let favorite = ledger.favorite_payment(&payment_id, "my_phone").unwrap().clone();

        assert_eq!(favorite.account_id, id);
        assert_eq!(favorite.amount, 100);
        assert_eq!(favorite.category, "phone");
        assert_eq!(favorite.name, "my_phone");
        assert_eq!(ledger.find_favorite_by_id(&favorite.id).unwrap(), &favorite);
    }

    #[test]
    fn test_favorite_unknown_payment() {
        let mut ledger = Ledger::new();

        let result = ledger.favorite_payment("missing", "name").cloned();

        assert_eq!(result, Err(LedgerError::payment_not_found("missing")));
        assert!(ledger.favorites().is_empty());
    }

    #[test]
    fn test_pay_from_favorite_survives_rejected_source() {
        let (mut ledger, id) = funded(500);
        let payment_id = ledger.pay(id, 100, "phone").unwrap().id.clone();
        let favorite_id = ledger
            .favorite_payment(&payment_id, "my_phone")
            .unwrap()
            .id
            .clone();
        ledger.reject(&payment_id).unwrap();

        let payment = ledger.pay_from_favorite(&favorite_id).unwrap().clone();

        assert_eq!(payment.amount, 100);
        assert_eq!(payment.category, "phone");
        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 400);
    }

    #[test]
    fn test_pay_from_unknown_favorite() {
        let mut ledger = Ledger::new();

        let result = ledger.pay_from_favorite("missing").cloned();

        assert_eq!(result, Err(LedgerError::favorite_not_found("missing")));
    }

    #[test]
    fn test_export_account_history() {
        let (mut ledger, id) = funded(1_000);
        let other = ledger.register_account("+2").unwrap().id;
        ledger.deposit(other, 100).unwrap();
        ledger.pay(id, 10, "a").unwrap();
        ledger.pay(other, 20, "b").unwrap();
        ledger.pay(id, 30, "c").unwrap();

        let history = ledger.export_account_history(id).unwrap();

        let amounts: Vec<Money> = history.iter().map(|p| p.amount).collect();
        assert_eq!(amounts, vec![10, 30]);
    }

    #[test]
    fn test_export_account_history_errors() {
        let (ledger, id) = funded(100);

        assert_eq!(
            ledger.export_account_history(id),
            Err(LedgerError::no_payments_for_account(id))
        );
        assert_eq!(
            ledger.export_account_history(42),
            Err(LedgerError::account_not_found(42))
        );
    }

    #[test]
    fn test_filter_unknown_account_reports_payment_not_found() {
        let ledger = Ledger::new();

        let result = ledger.filter_payments(5, 2);

        assert!(matches!(result, Err(LedgerError::PaymentNotFound { .. })));
    }

    #[test]
    fn test_balance_matches_deposits_minus_live_payments() {
        let (mut ledger, id) = funded(1_000);
        let a = ledger.pay(id, 100, "a").unwrap().id.clone();
        ledger.pay(id, 250, "b").unwrap();
        ledger.deposit(id, 50).unwrap();
        ledger.reject(&a).unwrap();

        let live: Money = ledger
            .payments()
            .iter()
            .filter(|p| p.status != PaymentStatus::Fail)
            .map(|p| p.amount)
            .sum();

        assert_eq!(ledger.find_account_by_id(id).unwrap().balance, 1_050 - live);
    }

    #[test]
    fn test_sum_overflow_from_imported_payments() {
        let mut ledger = Ledger::new();
        for id in ["p1", "p2"] {
            ledger.restore_payment(Payment {
                id: id.to_string(),
                account_id: 1,
                amount: Money::MAX,
                category: "auto".to_string(),
                status: PaymentStatus::Ok,
            });
        }

        let result = ledger.sum_payments(1);

        assert_eq!(result, Err(LedgerError::arithmetic_overflow("sum", None)));
    }

    #[test]
    fn test_aggregation_inside_tokio_runtime() {
        let (mut ledger, id) = funded(1_000);
        ledger.pay(id, 100, "a").unwrap();
        ledger.pay(id, 250, "b").unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let (total, filtered) = runtime.block_on(async {
            (
                ledger.sum_payments(2).unwrap(),
                ledger.filter_payments(id, 2).unwrap().len(),
            )
        });

        assert_eq!(total, 350);
        assert_eq!(filtered, 2);
    }
}
