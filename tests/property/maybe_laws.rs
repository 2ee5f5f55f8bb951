// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Maybe Laws
//!
//! Verifies the monad identities, propagation guarantees, and the
//! memoization contract of `Maybe` across arbitrary values, read counts,
//! and chain shapes.

use cim_deferred::Maybe;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary small payloads, including negatives and zero
fn payload() -> impl Strategy<Value = i32> {
    -1000i32..1000
}

/// Read counts for the memoization property (N >= 1)
fn read_count() -> impl Strategy<Value = usize> {
    1usize..12
}

/// A counting source: yields `value`, records every thunk invocation
fn counting_source(value: i32) -> (Maybe<i32>, Arc<AtomicUsize>) {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();
    let maybe = Maybe::from_fn(move || {
        counter_clone.fetch_add(1, Ordering::SeqCst);
        value
    });
    (maybe, counter)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Memoization
    ///
    /// Reading `value`/`has_value` N times invokes the thunk exactly once,
    /// for any N >= 1.
    #[test]
    fn prop_n_reads_one_evaluation(value in payload(), reads in read_count()) {
        let (maybe, counter) = counting_source(value);

        for _ in 0..reads {
            prop_assert!(maybe.has_value());
            prop_assert_eq!(maybe.value(), Ok(value));
        }
        prop_assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    /// Property: Left identity
    ///
    /// `of(x).bind(f)` equals `f(x)` for a pure selector.
    #[test]
    fn prop_left_identity(x in payload(), delta in payload()) {
        let bound = Maybe::of(x).bind(move |v| Maybe::of(v.wrapping_add(delta)));
        prop_assert_eq!(bound, Maybe::of(x.wrapping_add(delta)));
    }

    /// Property: Right identity
    ///
    /// `m.bind(of)` equals `m` for any realized `m`.
    #[test]
    fn prop_right_identity(x in payload()) {
        let maybe = Maybe::of(x);
        prop_assert_eq!(maybe.bind(Maybe::of), maybe);

        let empty = Maybe::<i32>::empty();
        prop_assert_eq!(empty.bind(Maybe::of), empty);
    }

    /// Property: Associativity
    ///
    /// `m.bind(f).bind(g)` equals `m.bind(|v| f(v).bind(g))`.
    #[test]
    fn prop_bind_associativity(x in payload(), a in payload(), b in payload()) {
        let f = move |v: i32| Maybe::of(v.wrapping_add(a));
        let g = move |v: i32| Maybe::of(v.wrapping_mul(b));

        let left = Maybe::of(x).bind(f).bind(g);
        let right = Maybe::of(x).bind(move |v| f(v).bind(g));
        prop_assert_eq!(left, right);
    }

    /// Property: Empty propagation
    ///
    /// `empty().bind(f)` never invokes `f` and settles empty, for any `f`.
    #[test]
    fn prop_empty_bind_never_invokes(delta in payload()) {
        let invoked = Arc::new(AtomicUsize::new(0));
        let invoked_clone = invoked.clone();

        let bound = Maybe::<i32>::empty().bind(move |v| {
            invoked_clone.fetch_add(1, Ordering::SeqCst);
            Maybe::of(v.wrapping_add(delta))
        });

        prop_assert!(!bound.has_value());
        prop_assert!(bound.error().is_none());
        prop_assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    /// Property: Failure propagation
    ///
    /// A failed source reaches the end of any map/filter/bind chain as the
    /// same captured object, with no selector invoked.
    #[test]
    fn prop_failure_passes_through_chains(delta in payload(), keep in any::<bool>()) {
        let invoked = Arc::new(AtomicUsize::new(0));
        let map_spy = invoked.clone();
        let filter_spy = invoked.clone();

        let source = Maybe::<i32>::failed(anyhow::anyhow!("captured"));
        let original = source.error().unwrap();

        let chained = source
            .map(move |v| {
                map_spy.fetch_add(1, Ordering::SeqCst);
                v.wrapping_add(delta)
            })
            .filter(move |_| {
                filter_spy.fetch_add(1, Ordering::SeqCst);
                keep
            })
            .bind(Maybe::of);

        prop_assert!(chained.error().unwrap().ptr_eq(&original));
        prop_assert_eq!(invoked.load(Ordering::SeqCst), 0);
    }

    /// Property: Or short-circuit
    ///
    /// `a.or(b)` forces `b` only when `a` settles empty.
    #[test]
    fn prop_or_forces_fallback_only_on_empty(x in payload(), y in payload(), state in 0u8..3) {
        let (fallback, fallback_counter) = counting_source(y);

        let left = match state {
            0 => Maybe::of(x),
            1 => Maybe::empty(),
            _ => Maybe::failed(anyhow::anyhow!("left failed")),
        };

        let result = left.or(fallback);
        result.run();

        let expected_forces = if state == 1 { 1 } else { 0 };
        prop_assert_eq!(fallback_counter.load(Ordering::SeqCst), expected_forces);
        if state == 0 {
            prop_assert_eq!(result.value(), Ok(x));
        }
        if state == 1 {
            prop_assert_eq!(result.value(), Ok(y));
        }
    }

    /// Property: Functor composition
    ///
    /// `m.map(f).map(g)` equals `m.map(|v| g(f(v)))`.
    #[test]
    fn prop_map_composition(x in payload(), a in payload(), b in payload()) {
        let composed = Maybe::of(x).map(move |v| v.wrapping_add(a)).map(move |v| v.wrapping_mul(b));
        let fused = Maybe::of(x).map(move |v| v.wrapping_add(a).wrapping_mul(b));
        prop_assert_eq!(composed, fused);
    }

    /// Property: Filter gates on the predicate alone
    #[test]
    fn prop_filter_matches_predicate(x in payload()) {
        let kept = Maybe::of(x).filter(|v| v % 2 == 0);
        prop_assert_eq!(kept.has_value(), x % 2 == 0);
    }
}
