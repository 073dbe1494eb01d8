//! Concurrent payment aggregation
//!
//! This module provides the `PaymentAggregator`, which splits the payment
//! collection into contiguous index ranges and processes each range on its
//! own worker task.
//!
//! # Partitioning
//!
//! For `n` payments and `w` workers, every worker covers
//! `chunk = n / w + 1` indices: worker `k` reads `[k * chunk, k * chunk + chunk)`
//! clipped to `[0, n)`. The last worker may get an empty range. `w` is capped
//! at `n`, so a huge worker count never spawns more tasks than payments.
//!
//! # Architecture
//!
//! ```text
//! PaymentAggregator
//!     ├── tokio multi-thread runtime   (min(w, CPU count) threads)
//!     ├── Arc<Vec<Payment>>            (read-only snapshot shared by workers)
//!     └── Arc<Mutex<..>>               (merge accumulator)
//! ```
//!
//! Each worker accumulates locally and takes the mutex once, to merge. Filter
//! results are merged into per-worker slots and flattened by worker index, so
//! the output keeps insertion order no matter which worker finishes first.

use crate::types::{AccountId, LedgerError, Money, Payment};
use futures::future::join_all;
use std::future::Future;
use std::ops::Range;
use std::panic::resume_unwind;
use std::sync::Arc;
use std::thread;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Mutex;
use tokio::task::JoinError;
use tracing::debug;

/// Fan-out/fan-in aggregation over a shared payment collection
#[derive(Debug)]
pub struct PaymentAggregator {
    /// Number of worker tasks (always at least 1)
    workers: usize,
    /// Taken on drop; always `Some` before that
    runtime: Option<Runtime>,
}

impl PaymentAggregator {
    /// Create an aggregator running `workers` concurrent workers
    ///
    /// A worker count of zero is treated as one.
    ///
    /// # Errors
    ///
    /// Returns `IoFailure` if the worker runtime cannot be started.
    pub fn new(workers: usize) -> Result<Self, LedgerError> {
        let workers = workers.max(1);
        let threads = workers.min(num_cpus::get()).max(1);

        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("ledger-aggregate")
            .build()
            .map_err(|e| LedgerError::io("aggregation runtime", e))?;

        Ok(Self {
            workers,
            runtime: Some(runtime),
        })
    }

    /// Number of workers requested for each call
    ///
    /// Fewer tasks are spawned when there are fewer payments than workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Sum the amounts of all payments
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the total does not fit in `Money`.
    pub fn sum(&self, payments: Arc<Vec<Payment>>) -> Result<Money, LedgerError> {
        let count = payments.len();
        let ranges = partition(count, self.workers);

        let total = self.run(async move {
            // Widened so the fold itself cannot overflow before the final check.
            let total = Arc::new(Mutex::new(Some(0i128)));

            let tasks = ranges.into_iter().map(|range| {
                let payments = Arc::clone(&payments);
                let total = Arc::clone(&total);
                tokio::spawn(async move {
                    let local = payments[range]
                        .iter()
                        .try_fold(0i128, |acc, p| acc.checked_add(i128::from(p.amount)));
                    let mut total = total.lock().await;
                    *total = (*total).zip(local).and_then(|(t, l)| t.checked_add(l));
                })
            });

            for joined in join_all(tasks).await {
                rethrow_panic(joined);
            }

            let sum = *total.lock().await;
            sum
        })?;

        let total = total
            .and_then(|t| Money::try_from(t).ok())
            .ok_or_else(|| LedgerError::arithmetic_overflow("sum", None))?;

        debug!(workers = self.workers, payments = count, total, "summed payments");
        Ok(total)
    }

    /// Collect the payments belonging to `account_id`
    ///
    /// The account is not validated here; see `Ledger::filter_payments`.
    pub fn filter_by_account(
        &self,
        payments: Arc<Vec<Payment>>,
        account_id: AccountId,
    ) -> Result<Vec<Payment>, LedgerError> {
        let ranges = partition(payments.len(), self.workers);

        let slots = self.run(async move {
            let slots = Arc::new(Mutex::new(vec![Vec::new(); ranges.len()]));

            let tasks = ranges.into_iter().enumerate().map(|(worker, range)| {
                let payments = Arc::clone(&payments);
                let slots = Arc::clone(&slots);
                tokio::spawn(async move {
                    let local: Vec<Payment> = payments[range]
                        .iter()
                        .filter(|p| p.account_id == account_id)
                        .cloned()
                        .collect();
                    slots.lock().await[worker] = local;
                })
            });

            for joined in join_all(tasks).await {
                rethrow_panic(joined);
            }

            let merged = std::mem::take(&mut *slots.lock().await);
            merged
        })?;

        let filtered: Vec<Payment> = slots.into_iter().flatten().collect();
        debug!(
            workers = self.workers,
            account_id,
            matched = filtered.len(),
            "filtered payments"
        );
        Ok(filtered)
    }

    /// Drive `work` to completion on the aggregation runtime
    ///
    /// A thread already inside a tokio runtime cannot block on another one, so
    /// in that case the work is driven from a scoped helper thread.
    fn run<F>(&self, work: F) -> Result<F::Output, LedgerError>
    where
        F: Future + Send,
        F::Output: Send,
    {
        let runtime = self.runtime.as_ref().ok_or_else(|| {
            LedgerError::io(
                "aggregation runtime",
                std::io::Error::other("runtime already shut down"),
            )
        })?;

        if Handle::try_current().is_err() {
            return Ok(runtime.block_on(work));
        }

        thread::scope(|scope| match scope.spawn(|| runtime.block_on(work)).join() {
            Ok(output) => Ok(output),
            Err(panic) => resume_unwind(panic),
        })
    }
}

impl Drop for PaymentAggregator {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Blocking shutdown panics inside another runtime.
            if Handle::try_current().is_ok() {
                runtime.shutdown_background();
            }
        }
    }
}

/// Split `len` indices into contiguous ranges of `len / w + 1`
///
/// `w` is `workers` capped at `len` (and at least 1), so no more ranges are
/// produced than there are indices to cover.
pub fn partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.min(len).max(1);
    let chunk = len / workers + 1;

    (0..workers)
        .map(|k| {
            let start = (k * chunk).min(len);
            let end = (start + chunk).min(len);
            start..end
        })
        .collect()
}

/// Re-raise a worker panic on the calling thread
fn rethrow_panic(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            resume_unwind(e.into_panic());
        }
    }
}
