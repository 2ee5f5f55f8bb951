// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred Computation Cell
//!
//! The memoization primitive underneath `Maybe`, `Outcome`, and
//! `ValuedOutcome`. A `DeferredCell<T>` owns a thunk and evaluates it at most
//! once per settled result; every later read returns the cached snapshot
//! without re-invoking the thunk.
//!
//! # Lifecycle
//!
//! ```text
//! Pending(thunk) ──force()──→ Done(snapshot)
//! ```
//!
//! The transition is one-way and permanent. Once a snapshot is installed the
//! thunk slot is cleared, so any closure graph captured by the thunk is
//! dropped as soon as it can no longer be needed.
//!
//! # Concurrency
//!
//! Evaluation deliberately happens **outside** any lock. Concurrent first
//! `force()` calls may therefore each run the thunk; the first finisher's
//! result is installed and racing results are discarded, so all observers
//! converge on one canonical snapshot. This racy-but-convergent policy keeps
//! the common single-threaded path free of synchronization cost. Callers who
//! need exactly-once evaluation under concurrency layer it on explicitly
//! (see `Maybe::synchronize`); the cell itself must not be hardened, as that
//! would change the performance characteristics callers rely on.

use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::trace;

/// Memoizing wrapper around a zero-argument computation
///
/// Evaluates its thunk at most once per settled result and caches the
/// snapshot forever after. Cheap to share behind an `Arc`; all the container
/// types in this crate hold exactly one cell and clone the `Arc`.
pub(crate) struct DeferredCell<T> {
    /// The settled snapshot, installed by the first finishing evaluation
    done: OnceLock<T>,
    /// The pending thunk; cleared once a snapshot is installed
    thunk: Mutex<Option<Arc<dyn Fn() -> T + Send + Sync>>>,
}

impl<T> DeferredCell<T> {
    /// Create a cell that is already settled with a known snapshot
    ///
    /// No thunk is stored and `force` never evaluates anything.
    pub(crate) fn known(value: T) -> Self {
        let done = OnceLock::new();
        let _ = done.set(value);
        Self {
            done,
            thunk: Mutex::new(None),
        }
    }

    /// Create a cell that evaluates `f` on first force
    pub(crate) fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            done: OnceLock::new(),
            thunk: Mutex::new(Some(Arc::new(f))),
        }
    }

    /// Report the settled snapshot without forcing
    ///
    /// Returns `None` while the cell is still pending. Used by the
    /// non-forcing `Debug` impls and the `synchronize_on` fast path.
    pub(crate) fn peek(&self) -> Option<&T> {
        self.done.get()
    }

    /// Settle the cell and return the snapshot
    ///
    /// The first call runs the thunk; every call returns the same snapshot.
    /// Concurrent first calls may each run the thunk (see the module docs);
    /// losing results are discarded.
    pub(crate) fn force(&self) -> &T {
        if let Some(value) = self.done.get() {
            return value;
        }

        // Clone the thunk out so evaluation happens outside the lock.
        let thunk = self
            .thunk
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        if let Some(thunk) = thunk {
            let value = thunk();
            match self.done.set(value) {
                Ok(()) => {
                    trace!(
                        cell = std::any::type_name::<T>(),
                        "deferred cell settled"
                    );
                    // Release the captured closure graph.
                    self.thunk
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .take();
                }
                Err(_) => {
                    trace!(
                        cell = std::any::type_name::<T>(),
                        "discarding result of racing evaluation"
                    );
                }
            }
        }

        // Either this call installed a snapshot, a racer did, or the thunk
        // slot was already cleared after an earlier installation.
        self.done
            .get()
            .expect("deferred cell has neither thunk nor snapshot")
    }
}
