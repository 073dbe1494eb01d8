//! Account management module
//!
//! This module provides the `AccountManager` struct which owns every account
//! together with the account-ID allocator.
//!
//! The AccountManager is responsible for:
//! - Registering accounts with unique phone numbers
//! - Allocating sequential account IDs
//! - Crediting and debiting balances
//! - Restoring accounts read back from a dump

use crate::types::{Account, AccountId, LedgerError, Money};

/// Owns all accounts and the account-ID allocator
///
/// Accounts are kept in insertion order, which is also the export order.
/// Lookups are linear scans.
#[derive(Debug, Default)]
pub struct AccountManager {
    /// Last allocated account ID (0 when nothing was allocated yet)
    next_account_id: AccountId,

    /// Accounts in insertion order
    accounts: Vec<Account>,
}

impl AccountManager {
    /// Create a new AccountManager with no accounts
    pub fn new() -> Self {
        AccountManager {
            next_account_id: 0,
            accounts: Vec::new(),
        }
    }

    /// Register a new zero-balance account
    ///
    /// # Errors
    ///
    /// Returns `PhoneAlreadyRegistered` if any account already uses `phone`,
    /// or `ArithmeticOverflow` if the ID allocator is exhausted. The manager
    /// is left untouched in both cases.
    pub fn register(&mut self, phone: &str) -> Result<&Account, LedgerError> {
        if self.accounts.iter().any(|account| account.phone == phone) {
            return Err(LedgerError::phone_already_registered(phone));
        }

        self.next_account_id = self
            .next_account_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::arithmetic_overflow("register", None))?;
        self.accounts.push(Account::new(self.next_account_id, phone));

        Ok(&self.accounts[self.accounts.len() - 1])
    }

    /// Look up an account by ID
    pub fn get(&self, account_id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts
            .iter()
            .find(|account| account.id == account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Look up an account by ID for mutation
    pub fn get_mut(&mut self, account_id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .iter_mut()
            .find(|account| account.id == account_id)
            .ok_or_else(|| LedgerError::account_not_found(account_id))
    }

    /// Check whether an account exists
    pub fn contains(&self, account_id: AccountId) -> bool {
        self.accounts.iter().any(|account| account.id == account_id)
    }

    /// Add funds to an account
    ///
    /// `operation` names the caller in the overflow error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - The new balance would overflow; the balance is left unchanged
    pub fn credit(
        &mut self,
        account_id: AccountId,
        amount: Money,
        operation: &str,
    ) -> Result<(), LedgerError> {
        let account = self.get_mut(account_id)?;

        account.balance = account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation, Some(account_id)))?;

        Ok(())
    }

    /// Remove funds from an account
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The account does not exist
    /// - The balance is lower than `amount`
    pub fn debit(&mut self, account_id: AccountId, amount: Money) -> Result<(), LedgerError> {
        let account = self.get_mut(account_id)?;

        if account.balance < amount {
            return Err(LedgerError::insufficient_balance(
                account_id,
                account.balance,
                amount,
            ));
        }

        account.balance -= amount;
        Ok(())
    }

    /// Restore an account from a dump, replacing any account with the same ID
    ///
    /// Accounts with a new ID are appended and the allocator is advanced so
    /// that later registrations never reuse an imported ID.
    pub fn upsert(&mut self, account: Account) {
        if let Some(existing) = self.accounts.iter_mut().find(|a| a.id == account.id) {
            existing.phone = account.phone;
            existing.balance = account.balance;
            return;
        }

        self.append(account);
    }

    /// Append an account without checking for an existing ID or phone
    pub fn append(&mut self, account: Account) {
        self.next_account_id = self.next_account_id.max(account.id);
        self.accounts.push(account);
    }

    /// All accounts in insertion order
    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    /// Last allocated (or imported) account ID
    pub fn last_id(&self) -> AccountId {
        self.next_account_id
    }
}
