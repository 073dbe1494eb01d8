//! Core business logic module
//!
//! This module contains the ledger components:
//! - `account_manager` - Accounts and the account-ID allocator
//! - `payment_store` - Payment history
//! - `favorite_store` - Favorite payment templates
//! - `ledger` - Orchestration of every account, payment and favorite operation
//! - `aggregator` - Concurrent sum/filter over the payment collection

pub mod account_manager;
pub mod aggregator;
pub mod favorite_store;
pub mod ledger;
pub mod payment_store;

pub use account_manager::AccountManager;
pub use aggregator::PaymentAggregator;
pub use favorite_store::FavoriteStore;
pub use ledger::Ledger;
pub use payment_store::PaymentStore;
