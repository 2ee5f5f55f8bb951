//! Deferred computation primitives for the Composable Information Machine
//!
//! This crate provides lazily-evaluated, memoized containers for fallible,
//! possibly-absent computations: the tri-state value monad [`Maybe`], the
//! success-judgement monad [`Outcome`], and their value-carrying pairing
//! [`ValuedOutcome`]. Every combinator composes thunks; nothing runs until
//! a caller observes a result, and a settled result is cached for the
//! lifetime of the instance.

mod cell;
pub mod errors;
pub mod maybe;
pub mod outcome;

// Re-export commonly used types
pub use errors::{CapturedError, MaybeError};
pub use maybe::combinators::{cast, of_type};
pub use maybe::{DynMaybe, Maybe, MaybeState};
pub use outcome::valued::ValuedOutcome;
pub use outcome::{DynOutcome, Outcome, Unit};
