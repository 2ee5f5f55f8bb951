// Copyright (c) 2025 - Cowboy AI, Inc.
//! Outcome - Deferred Success Judgement with Observations
//!
//! An `Outcome<O>` is the success/failure twin of `Maybe`: a lazily
//! computed boolean flag paired with a lazy trail of observations
//! (diagnostic payloads). Business failure is data, never an error return;
//! the only transition is one-way and permanent:
//!
//! ```text
//! {Unevaluated} ──first force──→ {Success, Failure} × [observations]
//! ```
//!
//! # Characteristics
//!
//! - **Lazy**: nothing runs until `was_successful` or `observations` is read
//! - **Memoized**: the judgement settles once; the observation trail is
//!   computed once and re-enumerable afterwards
//! - **Composable**: `&` combines two outcomes (AND of flags, concatenation
//!   of trails, left operand's observations first), lazily
//!
//! # Example
//!
//! ```rust,ignore
//! let report = check_hostname(&resource)
//!     & check_capacity(&resource)
//!     & check_policy(&resource);
//!
//! if !report.was_successful() {
//!     for finding in report.observations() {
//!         warn!("{finding}");
//!     }
//! }
//! ```

pub mod valued;

use crate::cell::DeferredCell;
use std::fmt;
use std::ops::BitAnd;
use std::sync::Arc;

/// Settled snapshot of an `Outcome` computation
#[derive(Clone)]
pub(crate) struct Judgement<O> {
    pub(crate) successful: bool,
    pub(crate) observations: Vec<O>,
}

/// Observation type carrying no payload
///
/// Marks an `Outcome` where only the boolean matters. Combinators recognize
/// this through [`Outcome::lift`], which widens `Outcome<Unit>` to any
/// observation type while materializing no observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Unit;

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "()")
    }
}

/// Deferred, memoized success judgement carrying observations
///
/// Clones share one memoization cell. See the module documentation.
pub struct Outcome<O> {
    cell: Arc<DeferredCell<Judgement<O>>>,
}

impl<O> Clone for Outcome<O> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<O: Clone + Send + Sync + 'static> Outcome<O> {
    /// Success with no observations
    pub fn success() -> Self {
        Self::from_judgement(Judgement {
            successful: true,
            observations: Vec::new(),
        })
    }

    /// Failure with no observations
    pub fn failure() -> Self {
        Self::from_judgement(Judgement {
            successful: false,
            observations: Vec::new(),
        })
    }

    /// Success carrying observations
    pub fn success_with(observations: impl IntoIterator<Item = O>) -> Self {
        Self::from_judgement(Judgement {
            successful: true,
            observations: observations.into_iter().collect(),
        })
    }

    /// Failure carrying observations
    pub fn failure_with(observations: impl IntoIterator<Item = O>) -> Self {
        Self::from_judgement(Judgement {
            successful: false,
            observations: observations.into_iter().collect(),
        })
    }

    pub(crate) fn from_judgement(judgement: Judgement<O>) -> Self {
        Self {
            cell: Arc::new(DeferredCell::known(judgement)),
        }
    }

    /// Defer a computation producing a flag and observations
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> (bool, Vec<O>) + Send + Sync + 'static,
    {
        Self::defer(move || {
            let (successful, observations) = f();
            Outcome::from_judgement(Judgement {
                successful,
                observations,
            })
        })
    }

    /// Defer a computation whose construction runs through the machinery
    ///
    /// The produced outcome's whole judgement is memoized as a unit. Every
    /// combinator below is built on `defer`.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Outcome<O> + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(DeferredCell::deferred(move || f().judgement().clone())),
        }
    }

    pub(crate) fn judgement(&self) -> &Judgement<O> {
        self.cell.force()
    }

    /// Settle the judgement and report the success flag
    pub fn was_successful(&self) -> bool {
        self.judgement().successful
    }

    /// Settle the judgement and return the observation trail
    ///
    /// The trail is computed once and re-enumerable afterwards.
    pub fn observations(&self) -> &[O] {
        &self.judgement().observations
    }

    /// Feed every observation through a selector producing a new outcome
    ///
    /// Aggregate success is the AND of the source flag and every produced
    /// outcome's flag; aggregate observations are the concatenation of all
    /// produced observations, in source order. This is the binding operator
    /// per-observation transformation pipelines are built from.
    pub fn inform_many<P, F>(&self, f: F) -> Outcome<P>
    where
        P: Clone + Send + Sync + 'static,
        F: Fn(&O) -> Outcome<P> + Send + Sync + 'static,
    {
        let source = self.clone();
        Outcome::defer(move || {
            let judgement = source.judgement();
            let mut successful = judgement.successful;
            let mut observations = Vec::new();
            for observation in &judgement.observations {
                let produced = f(observation);
                let produced = produced.judgement();
                successful &= produced.successful;
                observations.extend(produced.observations.iter().cloned());
            }
            Outcome::from_judgement(Judgement {
                successful,
                observations,
            })
        })
    }

    /// Map each observation, leaving the success flag untouched
    pub fn inform<P, F>(&self, f: F) -> Outcome<P>
    where
        P: Clone + Send + Sync + 'static,
        F: Fn(&O) -> P + Send + Sync + 'static,
    {
        self.inform_many(move |observation| Outcome::success_with([f(observation)]))
    }

    /// Keep only observations matching the predicate; flag untouched
    pub fn notice<P>(&self, pred: P) -> Outcome<O>
    where
        P: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.inform_many(move |observation| {
            if pred(observation) {
                Outcome::success_with([observation.clone()])
            } else {
                Outcome::success()
            }
        })
    }

    /// Drop observations matching the predicate; flag untouched
    ///
    /// Complement of [`Outcome::notice`].
    pub fn ignore<P>(&self, pred: P) -> Outcome<O>
    where
        P: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.notice(move |observation| !pred(observation))
    }

    /// AND the flag with "no observation matches the predicate"
    ///
    /// Observations are kept either way.
    pub fn fail_on<P>(&self, pred: P) -> Outcome<O>
    where
        P: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.inform_many(move |observation| {
            if pred(observation) {
                Outcome::failure_with([observation.clone()])
            } else {
                Outcome::success_with([observation.clone()])
            }
        })
    }

    /// Flip to failure when the condition holds
    pub fn fail_if(&self, condition: bool) -> Outcome<O> {
        self.fail_when(move || condition)
    }

    /// Flip to failure when the condition holds, appending the observation
    /// only when the flip occurs
    pub fn fail_if_with(&self, condition: bool, observation: O) -> Outcome<O> {
        self.fail_when_with(move || condition, observation)
    }

    /// Flip to failure when the deferred condition holds
    pub fn fail_when<F>(&self, condition: F) -> Outcome<O>
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        Outcome::defer(move || {
            if condition() {
                let judgement = source.judgement();
                Outcome::from_judgement(Judgement {
                    successful: false,
                    observations: judgement.observations.clone(),
                })
            } else {
                source.clone()
            }
        })
    }

    /// Flip to failure when the deferred condition holds, appending the
    /// observation only when the flip occurs
    pub fn fail_when_with<F>(&self, condition: F, observation: O) -> Outcome<O>
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        Outcome::defer(move || {
            if condition() {
                let judgement = source.judgement();
                let mut observations = judgement.observations.clone();
                observations.push(observation.clone());
                Outcome::from_judgement(Judgement {
                    successful: false,
                    observations,
                })
            } else {
                source.clone()
            }
        })
    }

    /// Append observations unconditionally; flag untouched
    pub fn observe_many(&self, observations: impl IntoIterator<Item = O>) -> Outcome<O> {
        let appended: Vec<O> = observations.into_iter().collect();
        let source = self.clone();
        Outcome::defer(move || {
            let judgement = source.judgement();
            let mut observations = judgement.observations.clone();
            observations.extend(appended.iter().cloned());
            Outcome::from_judgement(Judgement {
                successful: judgement.successful,
                observations,
            })
        })
    }

    /// Append one observation produced from the settled flag
    pub fn observe<F>(&self, f: F) -> Outcome<O>
    where
        F: Fn(bool) -> O + Send + Sync + 'static,
    {
        let source = self.clone();
        Outcome::defer(move || {
            let judgement = source.judgement();
            let mut observations = judgement.observations.clone();
            observations.push(f(judgement.successful));
            Outcome::from_judgement(Judgement {
                successful: judgement.successful,
                observations,
            })
        })
    }

    /// Merge outcomes: AND of all flags, concatenation of all trails in
    /// argument order, lazily
    pub fn combine(outcomes: impl IntoIterator<Item = Outcome<O>>) -> Outcome<O> {
        let outcomes: Vec<Outcome<O>> = outcomes.into_iter().collect();
        Outcome::defer(move || {
            let mut successful = true;
            let mut observations = Vec::new();
            for outcome in &outcomes {
                let judgement = outcome.judgement();
                successful &= judgement.successful;
                observations.extend(judgement.observations.iter().cloned());
            }
            Outcome::from_judgement(Judgement {
                successful,
                observations,
            })
        })
    }

    /// Erase the observation type, keeping the success-flag view
    pub fn into_dyn(self) -> Arc<dyn DynOutcome> {
        Arc::new(self)
    }
}

impl Outcome<Unit> {
    /// Widen a payload-free outcome to any observation type
    ///
    /// Preserves only the success flag; no observations are materialized.
    /// The explicit lift that replaces an implicit conversion.
    pub fn lift<O: Clone + Send + Sync + 'static>(&self) -> Outcome<O> {
        let source = self.clone();
        Outcome::defer(move || {
            if source.was_successful() {
                Outcome::success()
            } else {
                Outcome::failure()
            }
        })
    }
}

impl<O: Clone + Send + Sync + 'static> BitAnd for Outcome<O> {
    type Output = Outcome<O>;

    /// Binary combine, for fluent `check_a & check_b` chains
    fn bitand(self, rhs: Self) -> Self::Output {
        Outcome::combine([self, rhs])
    }
}

impl<O: Clone + Send + Sync + 'static> From<Result<(), O>> for Outcome<O> {
    /// Bridge for validation functions returning `Result<(), O>`
    ///
    /// `Ok(())` becomes an observation-free success; `Err(o)` becomes a
    /// failure carrying `o` as its one observation.
    fn from(result: Result<(), O>) -> Self {
        match result {
            Ok(()) => Outcome::success(),
            Err(observation) => Outcome::failure_with([observation]),
        }
    }
}

impl<O: fmt::Debug> fmt::Debug for Outcome<O> {
    /// Never forces: shows the memoized judgement if settled
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<O>();
        match self.cell.peek() {
            Some(judgement) => write!(
                f,
                "Outcome<{name}>(successful: {}, observations: {:?})",
                judgement.successful, judgement.observations
            ),
            None => write!(f, "Outcome<{name}>(<unevaluated>)"),
        }
    }
}

/// Type-erased success-flag view of an `Outcome`
pub trait DynOutcome: Send + Sync {
    /// Settle the judgement and report the success flag
    fn was_successful(&self) -> bool;

    /// Settle the judgement and report the trail length
    fn observation_count(&self) -> usize;
}

impl<O: Clone + Send + Sync + 'static> DynOutcome for Outcome<O> {
    fn was_successful(&self) -> bool {
        Outcome::was_successful(self)
    }

    fn observation_count(&self) -> usize {
        self.observations().len()
    }
}
