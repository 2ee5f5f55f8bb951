//! Error types for deferred computations
//!
//! Two channels, never conflated: `CapturedError` is the data-shaped failure
//! leg of a `Maybe` tri-state, propagated lazily through binding;
//! `MaybeError` is the error surfaced when a caller explicitly unwraps via
//! `Maybe::value`.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// A captured failure, shared across every clone of a `Maybe` chain
///
/// Wraps the original `anyhow::Error` behind an `Arc` so propagation through
/// binding never copies or rewraps it: downstream combinators pass the same
/// captured object along, and callers always see the true root cause with
/// its source chain intact.
///
/// Equality is reference identity of the captured error object, not message
/// comparison. Two independently captured errors are never equal, even if
/// they print identically.
#[derive(Clone)]
pub struct CapturedError(Arc<anyhow::Error>);

impl CapturedError {
    /// Capture an error
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(Arc::new(err.into()))
    }

    /// Whether `self` and `other` are the same captured error object
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Whether the original error is of type `E`
    pub fn is<E>(&self) -> bool
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.is::<E>()
    }

    /// Downcast to the original typed error, if it is an `E`
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// The underlying error
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }

    /// Stable address of the captured object, for identity hashing
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl std::error::Error for CapturedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&**self.0)
    }
}

impl PartialEq for CapturedError {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for CapturedError {}

/// Error returned by `Maybe::value` when no value can be produced
#[derive(Debug, Error, PartialEq)]
pub enum MaybeError {
    /// The computation settled with no value and no failure
    #[error("no value can be provided")]
    NoValue,

    /// The computation settled with a captured failure; the original error
    /// is surfaced unwrapped
    #[error(transparent)]
    Failed(#[from] CapturedError),
}
