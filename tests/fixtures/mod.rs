// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-deferred
//!
//! Deterministic spy computations for the integration suites. Every fixture
//! pairs a container with the counter that records how often its underlying
//! thunk actually ran, so memoization and short-circuit claims can be
//! asserted rather than assumed.
//!
//! # Design Principles
//! - Fixtures are the only place that constructs instrumented thunks
//! - Counters are plain atomics; no clocks, no randomness
//! - Tests use fixtures, never ad-hoc instrumented closures

use cim_deferred::{Maybe, Outcome};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared invocation counter for a spy thunk
#[derive(Clone, Default)]
pub struct Invocations(Arc<AtomicUsize>);

impl Invocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A `Maybe` whose thunk yields `value` and records every invocation
pub fn counting_maybe(value: i32) -> (Maybe<i32>, Invocations) {
    let invocations = Invocations::new();
    let spy = invocations.clone();
    let maybe = Maybe::from_fn(move || {
        spy.record();
        value
    });
    (maybe, invocations)
}

/// A `Maybe` whose thunk fails and records every invocation
pub fn counting_failure(message: &'static str) -> (Maybe<i32>, Invocations) {
    let invocations = Invocations::new();
    let spy = invocations.clone();
    let maybe = Maybe::try_from_fn(move || {
        spy.record();
        Err::<i32, _>(anyhow::anyhow!(message))
    });
    (maybe, invocations)
}

/// An `Outcome` whose thunk yields the given judgement and records every
/// invocation
pub fn counting_outcome(
    successful: bool,
    observations: Vec<&'static str>,
) -> (Outcome<&'static str>, Invocations) {
    let invocations = Invocations::new();
    let spy = invocations.clone();
    let outcome = Outcome::from_fn(move || {
        spy.record();
        (successful, observations.clone())
    });
    (outcome, invocations)
}
