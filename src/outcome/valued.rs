// Copyright (c) 2025 - Cowboy AI, Inc.
//! ValuedOutcome - Outcome Carrying an Optional Value
//!
//! A `ValuedOutcome<T, O>` is an [`Outcome<O>`] that additionally carries a
//! value slot, for callers who want both a payload and the
//! success/failure-plus-observations trail. It is conceptually
//! `Outcome<O> × Maybe<T>` but deliberately its own memoized type: flag,
//! trail, and value slot are all parts of **one** settled snapshot, so
//! reading all three never re-runs a side-effecting source computation.
//!
//! Produced from an `Outcome` via [`Outcome::with_value`] (attach
//! unconditionally), [`Outcome::with_value_on_success`] (attach only when
//! the outcome succeeded), or [`Outcome::into_valued`] (no value yet).

use super::{Judgement, Outcome, Unit};
use crate::cell::DeferredCell;
use crate::maybe::Maybe;
use std::fmt;
use std::sync::Arc;

/// Settled snapshot: flag, trail, and value slot, from one evaluation
#[derive(Clone)]
pub(crate) struct ValuedJudgement<T, O> {
    pub(crate) successful: bool,
    pub(crate) observations: Vec<O>,
    pub(crate) value: Option<T>,
}

/// Deferred, memoized outcome carrying an optional value
///
/// Clones share one memoization cell; flag, trail, and value derive from a
/// single evaluation of the underlying computation.
pub struct ValuedOutcome<T, O> {
    cell: Arc<DeferredCell<ValuedJudgement<T, O>>>,
}

impl<T, O> Clone for ValuedOutcome<T, O> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<O: Clone + Send + Sync + 'static> Outcome<O> {
    /// Lift to a `ValuedOutcome` with an empty value slot
    pub fn into_valued<T>(&self) -> ValuedOutcome<T, O>
    where
        T: Clone + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let judgement = source.judgement();
            ValuedJudgement {
                successful: judgement.successful,
                observations: judgement.observations.clone(),
                value: None,
            }
        })
    }

    /// Attach a value unconditionally
    pub fn with_value<T>(&self, value: T) -> ValuedOutcome<T, O>
    where
        T: Clone + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let judgement = source.judgement();
            ValuedJudgement {
                successful: judgement.successful,
                observations: judgement.observations.clone(),
                value: Some(value.clone()),
            }
        })
    }

    /// Attach a value only when the outcome settles successful
    ///
    /// A failing outcome yields an empty value slot.
    pub fn with_value_on_success<T>(&self, value: T) -> ValuedOutcome<T, O>
    where
        T: Clone + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let judgement = source.judgement();
            ValuedJudgement {
                successful: judgement.successful,
                observations: judgement.observations.clone(),
                value: judgement.successful.then(|| value.clone()),
            }
        })
    }
}

impl<T, O> ValuedOutcome<T, O>
where
    T: Clone + Send + Sync + 'static,
    O: Clone + Send + Sync + 'static,
{
    pub(crate) fn from_snapshot_fn<F>(f: F) -> Self
    where
        F: Fn() -> ValuedJudgement<T, O> + Send + Sync + 'static,
    {
        Self {
            cell: Arc::new(DeferredCell::deferred(f)),
        }
    }

    pub(crate) fn snapshot(&self) -> &ValuedJudgement<T, O> {
        self.cell.force()
    }

    /// Settle and report the success flag
    pub fn was_successful(&self) -> bool {
        self.snapshot().successful
    }

    /// Settle and return the observation trail
    pub fn observations(&self) -> &[O] {
        &self.snapshot().observations
    }

    /// Settle and report whether the value slot is filled
    pub fn has_value(&self) -> bool {
        self.snapshot().value.is_some()
    }

    /// Settle and return the value slot
    pub fn value(&self) -> Option<T> {
        self.snapshot().value.clone()
    }

    /// Transform the value slot, leaving flag and trail untouched
    pub fn map_value<U, F>(&self, f: F) -> ValuedOutcome<U, O>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot();
            ValuedJudgement {
                successful: snapshot.successful,
                observations: snapshot.observations.clone(),
                value: snapshot.value.clone().map(&f),
            }
        })
    }

    /// Map each observation, leaving flag and value untouched
    pub fn inform<P, F>(&self, f: F) -> ValuedOutcome<T, P>
    where
        P: Clone + Send + Sync + 'static,
        F: Fn(&O) -> P + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot();
            ValuedJudgement {
                successful: snapshot.successful,
                observations: snapshot.observations.iter().map(&f).collect(),
                value: snapshot.value.clone(),
            }
        })
    }

    /// Keep only observations matching the predicate
    pub fn notice<P>(&self, pred: P) -> ValuedOutcome<T, O>
    where
        P: Fn(&O) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot();
            ValuedJudgement {
                successful: snapshot.successful,
                observations: snapshot
                    .observations
                    .iter()
                    .filter(|observation| pred(*observation))
                    .cloned()
                    .collect(),
                value: snapshot.value.clone(),
            }
        })
    }

    /// Drop observations matching the predicate
    pub fn ignore<P>(&self, pred: P) -> ValuedOutcome<T, O>
    where
        P: Fn(&O) -> bool + Send + Sync + 'static,
    {
        self.notice(move |observation| !pred(observation))
    }

    /// Append one observation produced from the settled flag
    pub fn observe<F>(&self, f: F) -> ValuedOutcome<T, O>
    where
        F: Fn(bool) -> O + Send + Sync + 'static,
    {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot();
            let mut observations = snapshot.observations.clone();
            observations.push(f(snapshot.successful));
            ValuedJudgement {
                successful: snapshot.successful,
                observations,
                value: snapshot.value.clone(),
            }
        })
    }

    /// Append observations unconditionally
    pub fn observe_many(&self, observations: impl IntoIterator<Item = O>) -> ValuedOutcome<T, O> {
        let appended: Vec<O> = observations.into_iter().collect();
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot();
            let mut observations = snapshot.observations.clone();
            observations.extend(appended.iter().cloned());
            ValuedJudgement {
                successful: snapshot.successful,
                observations,
                value: snapshot.value.clone(),
            }
        })
    }

    /// Flip to failure when the condition holds; value slot untouched
    pub fn fail_if(&self, condition: bool) -> ValuedOutcome<T, O> {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot().clone();
            if condition {
                ValuedJudgement {
                    successful: false,
                    ..snapshot
                }
            } else {
                snapshot
            }
        })
    }

    /// Flip to failure when the condition holds, appending the observation
    /// only when the flip occurs
    pub fn fail_if_with(&self, condition: bool, observation: O) -> ValuedOutcome<T, O> {
        let source = self.clone();
        ValuedOutcome::from_snapshot_fn(move || {
            let snapshot = source.snapshot().clone();
            if condition {
                let mut observations = snapshot.observations;
                observations.push(observation.clone());
                ValuedJudgement {
                    successful: false,
                    observations,
                    value: snapshot.value,
                }
            } else {
                snapshot
            }
        })
    }

    /// Project back to a plain `Outcome`, sharing the same evaluation
    pub fn into_outcome(&self) -> Outcome<O> {
        let source = self.clone();
        Outcome::defer(move || {
            let snapshot = source.snapshot();
            Outcome::from_judgement(Judgement {
                successful: snapshot.successful,
                observations: snapshot.observations.clone(),
            })
        })
    }

    /// Project the value slot to a `Maybe`, sharing the same evaluation
    ///
    /// An empty value slot settles empty; failure here is absence, not a
    /// captured error, because an `Outcome`'s failure is data.
    pub fn into_maybe(&self) -> Maybe<T> {
        let source = self.clone();
        Maybe::defer(move || Maybe::from(source.snapshot().value.clone()))
    }
}

impl Outcome<Unit> {
    /// Widen a payload-free outcome's valued form to any observation type
    pub fn lift_valued<T, O>(&self, value: T) -> ValuedOutcome<T, O>
    where
        T: Clone + Send + Sync + 'static,
        O: Clone + Send + Sync + 'static,
    {
        self.lift::<O>().with_value_on_success(value)
    }
}

impl<T: fmt::Debug, O: fmt::Debug> fmt::Debug for ValuedOutcome<T, O> {
    /// Never forces: shows the memoized snapshot if settled
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value_name = std::any::type_name::<T>();
        match self.cell.peek() {
            Some(snapshot) => write!(
                f,
                "ValuedOutcome<{value_name}>(successful: {}, value: {:?}, observations: {:?})",
                snapshot.successful, snapshot.value, snapshot.observations
            ),
            None => write!(f, "ValuedOutcome<{value_name}>(<unevaluated>)"),
        }
    }
}
