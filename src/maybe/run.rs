// Copyright (c) 2025 - Cowboy AI, Inc.
//! Forcing and Background Evaluation
//!
//! `run` and `run_with` settle a chain immediately on the caller's thread.
//! `run_async` is the one opt-in offload in this crate: it eagerly moves the
//! forcing onto tokio's blocking pool and hands back a `Maybe` that waits
//! for the background result when observed. Task-level faults (a panicking
//! evaluation, a runtime shut down before completion) are translated back
//! into the captured-failure channel rather than surfacing as panics.

use super::{Maybe, Realized};
use crate::errors::CapturedError;
use anyhow::anyhow;
use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::debug;

/// Unwrap a panic payload down to its causal message
fn panic_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&'static str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow!("background evaluation panicked: {message}")
}

impl<T: Clone + Send + Sync + 'static> Maybe<T> {
    /// Settle the chain now, on the caller's thread
    pub fn run(&self) -> Maybe<T> {
        self.realized();
        self.clone()
    }

    /// Settle the chain now, running `action` on a present value
    pub fn run_with<F>(&self, action: F) -> Maybe<T>
    where
        F: FnOnce(&T),
    {
        if let Realized::Value(value) = self.realized() {
            action(value);
        }
        self.clone()
    }

    /// Settle the chain on the ambient tokio runtime's blocking pool
    ///
    /// Requires a runtime context; without one the returned `Maybe` settles
    /// failed instead of panicking. See [`Maybe::run_async_on`] for the
    /// semantics.
    pub fn run_async(&self) -> Maybe<T> {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => self.run_async_on(&handle),
            Err(err) => Maybe::failed(anyhow!(
                "no tokio runtime available for background evaluation: {err}"
            )),
        }
    }

    /// Settle the chain on the given runtime's blocking pool
    ///
    /// Spawning is eager: the evaluation starts immediately. The returned
    /// `Maybe` blocks on the background result when first observed:
    ///
    /// - a panic in the evaluation is unwrapped to its causal payload and
    ///   settles the failed state;
    /// - a runtime shut down before the evaluation completes settles a
    ///   cancellation failure;
    /// - otherwise the background snapshot is adopted as-is.
    ///
    /// Observation blocks the calling thread, mirroring a synchronous wait
    /// on the background task. Do not observe from an async worker thread;
    /// await something derived from `run_with` instead, or observe from
    /// blocking context.
    pub fn run_async_on(&self, handle: &tokio::runtime::Handle) -> Maybe<T> {
        let source = self.clone();
        let (tx, rx) = oneshot::channel();

        debug!("spawning background evaluation");
        // Completion is observed through the channel, not the join handle.
        let _ = handle.spawn_blocking(move || {
            // The cell's internals tolerate an unwound evaluation (poisoned
            // locks are re-entered), so unwind safety holds here.
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| source.realized().clone()));
            let snapshot = match outcome {
                Ok(snapshot) => snapshot,
                Err(payload) => Realized::Failed(CapturedError::new(panic_error(payload))),
            };
            let _ = tx.send(snapshot);
        });

        // Shared so racing first observers all wait on the same result.
        let pending: Shared<oneshot::Receiver<Realized<T>>> = rx.shared();
        Maybe::defer(move || match futures::executor::block_on(pending.clone()) {
            Ok(snapshot) => {
                debug!("background evaluation adopted");
                Maybe::from_realized(snapshot)
            }
            Err(_cancelled) => Maybe::failed(anyhow!(
                "background evaluation was cancelled before completing"
            )),
        })
    }
}
