// Copyright (c) 2025 - Cowboy AI, Inc.
//! Maybe - Deferred Tri-State Value Container
//!
//! A `Maybe<T>` represents a computation that, once observed, settles into
//! exactly one of three states:
//!
//! ```text
//! Maybe<T> ──observe──→ Value(T) | Empty | Failed(CapturedError)
//! ```
//!
//! # Characteristics
//!
//! - **Lazy**: nothing is computed until `value`, `has_value`, `error`, or
//!   `realize` is called
//! - **Memoized**: the underlying thunk runs at most once per settled
//!   result; every later read returns the cached state
//! - **Immutable**: combinators never mutate, they produce new instances
//!   with composed thunks; cloning shares the same memoization cell
//! - **Failure-carrying**: a captured failure propagates through every
//!   downstream combinator untouched until a caller recovers or surfaces it
//!
//! # Concurrency
//!
//! Memoization is racy-but-convergent by default: concurrent first
//! observation from multiple threads may evaluate the thunk more than once,
//! with one result winning. This is deliberate (the single-threaded path
//! pays no lock cost). Wrap with [`Maybe::synchronize`] when exactly-once
//! evaluation under concurrency is required.
//!
//! # Examples
//!
//! ```rust,ignore
//! let maybe = Maybe::from_fn(|| expensive_lookup())
//!     .filter(|v| v.is_current())
//!     .map(|v| v.id);
//!
//! // Nothing has run yet. First observation settles the whole chain.
//! if maybe.has_value() {
//!     println!("id: {:?}", maybe.value());
//! }
//! ```

pub mod combinators;
mod run;

use crate::cell::DeferredCell;
use crate::errors::{CapturedError, MaybeError};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Settled snapshot of a `Maybe` computation
///
/// Constructed once per logical computation and never mutated. The mutual
/// exclusion of value and failure is enforced by the enum itself.
#[derive(Clone)]
pub(crate) enum Realized<T> {
    /// The computation produced a value
    Value(T),
    /// The computation produced no value and no failure
    Empty,
    /// The computation failed; the capture is shared, never rewrapped
    Failed(CapturedError),
}

/// Borrowed view of a settled `Maybe`, for pattern matching
#[derive(Debug)]
pub enum MaybeState<'a, T> {
    /// A value is present
    Value(&'a T),
    /// No value and no failure
    Empty,
    /// A captured failure
    Failed(&'a CapturedError),
}

/// Deferred, memoized, three-state value container
///
/// See the module documentation for semantics. Clones share one memoization
/// cell, so observing any clone settles all of them and the underlying
/// thunk still runs at most once.
pub struct Maybe<T> {
    cell: Arc<DeferredCell<Realized<T>>>,
}

impl<T> Clone for Maybe<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Maybe<T> {
    /// Wrap a known value
    ///
    /// Never fails. An explicit `None` payload is an ordinary present value:
    /// `Maybe::of(None::<u32>)` has a value.
    pub fn of(value: T) -> Self {
        Self::from_realized(Realized::Value(value))
    }

    /// The no-value, no-failure state
    pub fn empty() -> Self {
        Self::from_realized(Realized::Empty)
    }

    /// Wrap a known failure
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        Self::from_realized(Realized::Failed(CapturedError::new(err)))
    }

    /// Re-wrap an already captured failure without rewrapping it
    ///
    /// Propagation keeps the identity of the capture; this is how every
    /// combinator passes a failure through.
    pub(crate) fn from_captured(err: CapturedError) -> Self {
        Self::from_realized(Realized::Failed(err))
    }

    pub(crate) fn from_realized(realized: Realized<T>) -> Self {
        Self {
            cell: Arc::new(DeferredCell::known(realized)),
        }
    }

    /// Defer a computation that produces a value
    ///
    /// `f` is not invoked until the result is observed, and runs at most
    /// once per settled result.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::defer(move || Maybe::of(f()))
    }

    /// Defer a fallible computation
    ///
    /// An `Err` settles the failed state; an `Ok` settles a present value.
    pub fn try_from_fn<F, E>(f: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        Self::defer(move || match f() {
            Ok(value) => Maybe::of(value),
            Err(err) => Maybe::failed(err),
        })
    }

    /// Defer a computation whose construction itself runs through the
    /// monadic machinery
    ///
    /// The whole realized triple of the produced `Maybe` is memoized as a
    /// unit. Every combinator in this crate is built on `defer`, which is
    /// how they all inherit empty/failure propagation instead of
    /// re-implementing it.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Maybe<T> + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(DeferredCell::deferred(move || f().realized().clone())),
        }
    }

    /// Settle and return the snapshot
    pub(crate) fn realized(&self) -> &Realized<T> {
        self.cell.force()
    }

    /// Whether the cell has already settled, without forcing it
    pub(crate) fn is_realized(&self) -> bool {
        self.cell.peek().is_some()
    }

    /// Settle the computation and report whether a value is present
    pub fn has_value(&self) -> bool {
        matches!(self.realized(), Realized::Value(_))
    }

    /// Settle the computation and return the captured failure, if any
    pub fn error(&self) -> Option<CapturedError> {
        match self.realized() {
            Realized::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Settle the computation and unwrap the value
    ///
    /// # Errors
    ///
    /// - [`MaybeError::NoValue`] when the computation settled empty
    /// - [`MaybeError::Failed`] when it settled with a captured failure; the
    ///   original error is surfaced transparently, with its source chain
    ///   intact
    pub fn value(&self) -> Result<T, MaybeError> {
        match self.realized() {
            Realized::Value(value) => Ok(value.clone()),
            Realized::Empty => Err(MaybeError::NoValue),
            Realized::Failed(err) => Err(MaybeError::Failed(err.clone())),
        }
    }

    /// Settle the computation and return a borrowed view for matching
    pub fn realize(&self) -> MaybeState<'_, T> {
        match self.realized() {
            Realized::Value(value) => MaybeState::Value(value),
            Realized::Empty => MaybeState::Empty,
            Realized::Failed(err) => MaybeState::Failed(err),
        }
    }

    /// The core monadic operator
    ///
    /// Settles `self` and feeds a present value to `f`. A captured failure
    /// passes through untouched without invoking `f`; an empty source
    /// propagates empty without invoking `f`. The result is memoized as a
    /// unit, and because clones share one cell, binding twice on the same
    /// source never re-evaluates the source.
    ///
    /// Selector failure is expressed by returning a failed `Maybe` from `f`
    /// (or by using [`Maybe::try_map`]).
    pub fn bind<U, F>(&self, f: F) -> Maybe<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Maybe<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        Maybe::defer(move || match source.realized() {
            Realized::Value(value) => f(value.clone()),
            Realized::Empty => Maybe::empty(),
            Realized::Failed(err) => Maybe::from_captured(err.clone()),
        })
    }

    /// Compare realized states with a supplied comparer on `T`
    ///
    /// Forces both sides. Empty equals empty; failures are equal only when
    /// they are the same captured object; values are compared with `cmp`.
    pub fn eq_by<F>(&self, other: &Self, cmp: F) -> bool
    where
        F: Fn(&T, &T) -> bool,
    {
        match (self.realized(), other.realized()) {
            (Realized::Value(a), Realized::Value(b)) => cmp(a, b),
            (Realized::Empty, Realized::Empty) => true,
            (Realized::Failed(a), Realized::Failed(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Erase the payload type, keeping the tri-state view
    pub fn into_dyn(self) -> Arc<dyn DynMaybe> {
        Arc::new(self)
    }
}

impl<T: Clone + Default + Send + Sync + 'static> Default for Maybe<T> {
    /// Wraps `T::default()` as a present value
    fn default() -> Self {
        Self::of(T::default())
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> PartialEq for Maybe<T> {
    /// Value-based equality on realized states; forces both sides
    fn eq(&self, other: &Self) -> bool {
        self.eq_by(other, |a, b| a == b)
    }
}

impl<T: Clone + Eq + Send + Sync + 'static> Eq for Maybe<T> {}

impl<T: Clone + Hash + Send + Sync + 'static> Hash for Maybe<T> {
    /// Hashes the realized state; a failure hashes by capture identity
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.realized() {
            Realized::Value(value) => {
                0u8.hash(state);
                value.hash(state);
            }
            Realized::Empty => 1u8.hash(state),
            Realized::Failed(err) => {
                2u8.hash(state);
                err.addr().hash(state);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Maybe<T> {
    /// Never forces: shows the memoized state if settled
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>();
        match self.cell.peek() {
            Some(Realized::Value(value)) => write!(f, "Maybe<{name}>({value:?})"),
            Some(Realized::Empty) => write!(f, "Maybe<{name}>(<empty>)"),
            Some(Realized::Failed(err)) => write!(f, "Maybe<{name}>(<failed: {err}>)"),
            None => write!(f, "Maybe<{name}>(<unevaluated>)"),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> From<T> for Maybe<T> {
    /// Wrap a value, mirroring `impl From<T> for Option<T>`
    fn from(value: T) -> Self {
        Maybe::of(value)
    }
}

impl<T: Clone + Send + Sync + 'static> From<Option<T>> for Maybe<T> {
    /// `Some` becomes a present value, `None` becomes empty
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Maybe::of(value),
            None => Maybe::empty(),
        }
    }
}

/// Type-erased tri-state view of a `Maybe`
///
/// Lets generic code inspect realized state without knowing the payload
/// type. Recover a typed `Maybe` with [`combinators::cast`] or
/// [`combinators::of_type`].
pub trait DynMaybe: Send + Sync {
    /// Settle and report whether a value is present
    fn has_value(&self) -> bool;

    /// Settle and return the captured failure, if any
    fn error(&self) -> Option<CapturedError>;

    /// Settle and return a boxed clone of the value, if present
    fn value_any(&self) -> Option<Box<dyn Any + Send>>;

    /// Name of the payload type, for cast diagnostics
    fn value_type_name(&self) -> &'static str;
}

impl<T: Clone + Send + Sync + 'static> DynMaybe for Maybe<T> {
    fn has_value(&self) -> bool {
        Maybe::has_value(self)
    }

    fn error(&self) -> Option<CapturedError> {
        Maybe::error(self)
    }

    fn value_any(&self) -> Option<Box<dyn Any + Send>> {
        match self.realized() {
            Realized::Value(value) => Some(Box::new(value.clone())),
            _ => None,
        }
    }

    fn value_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
