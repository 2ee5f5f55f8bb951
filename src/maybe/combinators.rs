// Copyright (c) 2025 - Cowboy AI, Inc.
//! Maybe Combinators
//!
//! Every combinator here is a thin composition over [`Maybe::bind`] and
//! [`Maybe::defer`], so empty and failure propagation are inherited from the
//! core operator rather than re-implemented. Keeping that discipline is what
//! guarantees a captured failure passes through any chain untouched and no
//! selector ever fires on an empty or failed source.
//!
//! # Available Combinators
//!
//! ## Transforming
//! - `map` / `try_map` - transform a present value
//! - `filter` / `unless` - predicate gates (false/true settle empty)
//! - `flatten` / `flatten_option` - collapse nested containers
//! - `coalesce` / `coalesce_or` - map through an optional selector
//!
//! ## Combining
//! - `or` / `or_else` - left-preferred fallback, right forced lazily
//! - `zip` / `zip_with` - join two independent sources
//! - `when` / `when_value` - conditional substitution
//!
//! ## State hooks
//! - `on_value` / `on_empty` / `on_error` - state-selective taps
//! - `with` - derive a sub-value, tap it, keep the original
//! - `recover` - substitute a recovery computation for a failure
//! - `fail_on` / `fail_on_empty` - convert a state into a failure
//!
//! ## Evaluation control
//! - `using` - scoped resource held for one sub-computation
//! - `synchronize` / `synchronize_on` - exactly-once forcing under a lock
//! - `cast` / `of_type` - recover a typed `Maybe` from an erased view

use super::{DynMaybe, Maybe, Realized};
use crate::errors::CapturedError;
use anyhow::anyhow;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::trace;

impl<T: Clone + Send + Sync + 'static> Maybe<T> {
    /// Transform a present value
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let doubled = Maybe::of(21).map(|v| v * 2);
    /// assert_eq!(doubled.value(), Ok(42));
    /// ```
    pub fn map<U, F>(&self, f: F) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.bind(move |value| Maybe::of(f(value)))
    }

    /// Transform a present value with a fallible selector
    ///
    /// An `Err` from the selector settles the failed state.
    pub fn try_map<U, E, F>(&self, f: F) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        E: Into<anyhow::Error>,
        F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
    {
        self.bind(move |value| match f(value) {
            Ok(mapped) => Maybe::of(mapped),
            Err(err) => Maybe::failed(err),
        })
    }

    /// Keep a present value only when the predicate holds
    ///
    /// A false predicate settles empty. Empty and failed sources pass
    /// through without invoking the predicate.
    pub fn filter<P>(&self, pred: P) -> Maybe<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.bind(move |value| {
            if pred(&value) {
                Maybe::of(value)
            } else {
                Maybe::empty()
            }
        })
    }

    /// Complement of [`Maybe::filter`]: drop the value when the predicate holds
    pub fn unless<P>(&self, pred: P) -> Maybe<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter(move |value| !pred(value))
    }

    /// Left-preferred fallback
    ///
    /// The fallback is forced only when `self` settles empty. A value or a
    /// captured failure on the left passes through with the fallback's
    /// thunk untouched.
    pub fn or(&self, fallback: Maybe<T>) -> Maybe<T> {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Empty => fallback.clone(),
            _ => source.clone(),
        })
    }

    /// Like [`Maybe::or`], constructing the fallback on demand
    pub fn or_else<F>(&self, f: F) -> Maybe<T>
    where
        F: Fn() -> Maybe<T> + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Empty => f(),
            _ => source.clone(),
        })
    }

    /// Map through an optional selector; `None` settles empty
    pub fn coalesce<U, F>(&self, f: F) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        self.map(f).flatten_option()
    }

    /// [`Maybe::coalesce`] with a fallback for the empty result
    pub fn coalesce_or<U, F>(&self, f: F, fallback: Maybe<U>) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        self.coalesce(f).or(fallback)
    }

    /// Derive a sub-value, tap it when present, keep the original value
    ///
    /// A failed derivation propagates; an empty derivation is ignored and
    /// the original value passes through untapped. Used for
    /// validation-with-callback patterns.
    pub fn with<U, S, A>(&self, selector: S, action: A) -> Maybe<T>
    where
        U: Clone + Send + Sync + 'static,
        S: Fn(T) -> Maybe<U> + Send + Sync + 'static,
        A: Fn(&U) + Send + Sync + 'static,
    {
        self.bind(move |value| {
            let derived = selector(value.clone());
            match derived.realized() {
                Realized::Value(sub) => {
                    action(sub);
                    Maybe::of(value)
                }
                Realized::Empty => Maybe::of(value),
                Realized::Failed(err) => Maybe::from_captured(err.clone()),
            }
        })
    }

    /// Substitute a new computation when the predicate matches the value
    ///
    /// A non-matching value passes through unchanged.
    pub fn when<P, S>(&self, pred: P, substitute: S) -> Maybe<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        S: Fn(T) -> Maybe<T> + Send + Sync + 'static,
    {
        self.bind(move |value| {
            if pred(&value) {
                substitute(value)
            } else {
                Maybe::of(value)
            }
        })
    }

    /// Substitute when the value equals `expected`
    pub fn when_value(&self, expected: T, substitute: Maybe<T>) -> Maybe<T>
    where
        T: PartialEq,
    {
        self.when(
            move |value| *value == expected,
            move |_| substitute.clone(),
        )
    }

    /// Join two independent sources into a pair
    ///
    /// Left-to-right: `self` settles first, and a first empty or failure
    /// short-circuits without forcing the other side.
    pub fn zip<U>(&self, other: &Maybe<U>) -> Maybe<(T, U)>
    where
        U: Clone + Send + Sync + 'static,
    {
        self.zip_with(other, |a, b| (a, b))
    }

    /// Join two independent sources with a combining selector
    pub fn zip_with<U, V, F>(&self, other: &Maybe<U>, f: F) -> Maybe<V>
    where
        U: Clone + Send + Sync + 'static,
        V: Clone + Send + Sync + 'static,
        F: Fn(T, U) -> V + Send + Sync + 'static,
    {
        let other = other.clone();
        let f = Arc::new(f);
        self.bind(move |left| {
            let f = Arc::clone(&f);
            other.map(move |right| f(left.clone(), right))
        })
    }

    /// Convert a matching value into the failed state
    ///
    /// Surfaced when a caller later reads [`Maybe::value`].
    pub fn fail_on<P, E, M>(&self, pred: P, make_err: M) -> Maybe<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        E: Into<anyhow::Error>,
        M: Fn(&T) -> E + Send + Sync + 'static,
    {
        self.bind(move |value| {
            if pred(&value) {
                Maybe::failed(make_err(&value))
            } else {
                Maybe::of(value)
            }
        })
    }

    /// Convert the empty state into the failed state
    pub fn fail_on_empty<E, M>(&self, make_err: M) -> Maybe<T>
    where
        E: Into<anyhow::Error>,
        M: Fn() -> E + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Empty => Maybe::failed(make_err()),
            _ => source.clone(),
        })
    }

    /// Tap a present value without changing the realized state
    ///
    /// Fires when the value state is first realized; memoization means once
    /// per chain instance.
    pub fn on_value<F>(&self, f: F) -> Maybe<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.bind(move |value| {
            f(&value);
            Maybe::of(value)
        })
    }

    /// Tap the empty state without changing it
    pub fn on_empty<F>(&self, f: F) -> Maybe<T>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Empty => {
                f();
                Maybe::empty()
            }
            _ => source.clone(),
        })
    }

    /// Tap a captured failure without changing it
    pub fn on_error<F>(&self, f: F) -> Maybe<T>
    where
        F: Fn(&CapturedError) + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Failed(err) => {
                f(err);
                Maybe::from_captured(err.clone())
            }
            _ => source.clone(),
        })
    }

    /// Substitute a recovery computation for a captured failure
    ///
    /// Value and empty states pass through unchanged.
    pub fn recover<F>(&self, f: F) -> Maybe<T>
    where
        F: Fn(&CapturedError) -> Maybe<T> + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Failed(err) => f(err),
            _ => source.clone(),
        })
    }

    /// Run a sub-computation while holding an acquired resource
    ///
    /// The resource is acquired when a value is present, the sub-computation
    /// is settled inside the resource's lifetime, and the resource is
    /// released by RAII on every exit path, including an unwinding one.
    pub fn using<R, U, Acq, F>(&self, acquire: Acq, f: F) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        Acq: Fn() -> R + Send + Sync + 'static,
        F: Fn(&mut R, T) -> Maybe<U> + Send + Sync + 'static,
    {
        self.bind(move |value| {
            let mut resource = acquire();
            let result = f(&mut resource, value);
            // Settle before the resource drops.
            let snapshot = result.realized().clone();
            drop(resource);
            Maybe::from_realized(snapshot)
        })
    }

    /// Force under a private lock
    ///
    /// Equivalent to [`Maybe::synchronize_on`] with a fresh lock and an
    /// always-true predicate: every clone of the returned `Maybe` observing
    /// concurrently serializes on the same lock, so the source settles
    /// exactly once.
    pub fn synchronize(&self) -> Maybe<T> {
        self.synchronize_on(Arc::new(Mutex::new(())), || true)
    }

    /// Force under a shared lock, gated by an optimistic predicate
    ///
    /// When the source is already settled the lock is skipped entirely.
    /// Otherwise `when` decides whether forcing takes the lock.
    ///
    /// Caveat, preserved deliberately: if `when` races its own condition and
    /// answers false while another thread is mid-evaluation, the underlying
    /// thunk can still run more than once (with one result winning, as
    /// always). Callers who need the exactly-once guarantee must supply a
    /// `when` that answers true whenever evaluation may be pending.
    pub fn synchronize_on<P>(&self, lock: Arc<Mutex<()>>, when: P) -> Maybe<T>
    where
        P: Fn() -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || {
            if source.is_realized() {
                return source.clone();
            }
            if when() {
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                trace!("forcing under synchronization lock");
                source.realized();
            }
            source.clone()
        })
    }
}

impl<U: Clone + Send + Sync + 'static> Maybe<Maybe<U>> {
    /// Collapse a nested `Maybe`
    pub fn flatten(&self) -> Maybe<U> {
        self.bind(|inner| inner)
    }
}

impl<U: Clone + Send + Sync + 'static> Maybe<Option<U>> {
    /// Collapse an optional payload: `None` settles empty
    pub fn flatten_option(&self) -> Maybe<U> {
        self.bind(Maybe::from)
    }
}

/// Reinterpret an erased tri-state view as a `Maybe<U>`
///
/// A payload of a different type settles the **failed** state with a cast
/// error naming both types. Empty and failed sources pass through.
pub fn cast<U>(source: Arc<dyn DynMaybe>) -> Maybe<U>
where
    U: Clone + Send + Sync + 'static,
{
    Maybe::defer(move || {
        if let Some(err) = source.error() {
            return Maybe::from_captured(err);
        }
        match source.value_any() {
            None => Maybe::empty(),
            Some(boxed) => match boxed.downcast::<U>() {
                Ok(value) => Maybe::of(*value),
                Err(_) => Maybe::failed(anyhow!(
                    "cannot cast value of type {} to {}",
                    source.value_type_name(),
                    std::any::type_name::<U>()
                )),
            },
        }
    })
}

/// Reinterpret an erased tri-state view, settling **empty** on a type mismatch
///
/// The lenient counterpart of [`cast`]: a payload of a different type is
/// treated as absence rather than failure.
pub fn of_type<U>(source: Arc<dyn DynMaybe>) -> Maybe<U>
where
    U: Clone + Send + Sync + 'static,
{
    Maybe::defer(move || {
        if let Some(err) = source.error() {
            return Maybe::from_captured(err);
        }
        match source.value_any() {
            None => Maybe::empty(),
            Some(boxed) => match boxed.downcast::<U>() {
                Ok(value) => Maybe::of(*value),
                Err(_) => Maybe::empty(),
            },
        }
    })
}
