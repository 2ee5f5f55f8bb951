// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Outcome Algebra
//!
//! Verifies the combination laws of `Outcome`: conjunction of flags,
//! concatenation of observation trails in operand order, the `fail_if`
//! truth table, and the value-coupling contract of `ValuedOutcome`.

use cim_deferred::Outcome;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary observation strings
fn observation() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// An arbitrary judgement: success flag plus up to four observations
fn judgement() -> impl Strategy<Value = (bool, Vec<String>)> {
    (any::<bool>(), prop::collection::vec(observation(), 0..4))
}

/// A sequence of judgements to combine
fn judgement_sequence() -> impl Strategy<Value = Vec<(bool, Vec<String>)>> {
    prop::collection::vec(judgement(), 0..6)
}

fn eager(successful: bool, observations: &[String]) -> Outcome<String> {
    if successful {
        Outcome::success_with(observations.iter().cloned())
    } else {
        Outcome::failure_with(observations.iter().cloned())
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Property: Combine is AND over flags and concatenation over trails
    ///
    /// `combine(s1..sn)` succeeds iff every `si` succeeds, and its
    /// observations are the concatenation of each trail in argument order.
    #[test]
    fn prop_combine_ands_and_concatenates(judgements in judgement_sequence()) {
        let outcomes: Vec<Outcome<String>> = judgements
            .iter()
            .map(|(successful, observations)| eager(*successful, observations))
            .collect();

        let combined = Outcome::combine(outcomes);

        let expected_flag = judgements.iter().all(|(successful, _)| *successful);
        let expected_trail: Vec<String> = judgements
            .iter()
            .flat_map(|(_, observations)| observations.iter().cloned())
            .collect();

        prop_assert_eq!(combined.was_successful(), expected_flag);
        prop_assert_eq!(combined.observations().to_vec(), expected_trail);
    }

    /// Property: `&` agrees with binary combine
    #[test]
    fn prop_bitand_matches_combine(a in judgement(), b in judgement()) {
        let left = eager(a.0, &a.1) & eager(b.0, &b.1);
        let right = Outcome::combine([eager(a.0, &a.1), eager(b.0, &b.1)]);

        prop_assert_eq!(left.was_successful(), right.was_successful());
        prop_assert_eq!(left.observations().to_vec(), right.observations().to_vec());
    }

    /// Property: fail_if truth table
    ///
    /// Flipping appends the observation exactly when the flip occurs, and
    /// the flag is the AND of the source flag and the negated condition.
    #[test]
    fn prop_fail_if_with_truth_table(source in judgement(), condition in any::<bool>()) {
        let outcome = eager(source.0, &source.1)
            .fail_if_with(condition, "flipped".to_string());

        prop_assert_eq!(outcome.was_successful(), source.0 && !condition);

        let mut expected_trail = source.1.clone();
        if condition {
            expected_trail.push("flipped".to_string());
        }
        prop_assert_eq!(outcome.observations().to_vec(), expected_trail);
    }

    /// Property: inform preserves the flag and maps the trail elementwise
    #[test]
    fn prop_inform_preserves_flag(source in judgement()) {
        let outcome = eager(source.0, &source.1).inform(|o| format!("<{o}>"));

        prop_assert_eq!(outcome.was_successful(), source.0);
        let expected: Vec<String> = source.1.iter().map(|o| format!("<{o}>")).collect();
        prop_assert_eq!(outcome.observations().to_vec(), expected);
    }

    /// Property: notice and ignore partition the trail
    #[test]
    fn prop_notice_ignore_partition(source in judgement()) {
        let base = eager(source.0, &source.1);
        let noticed = base.notice(|o| o.contains('a'));
        let ignored = base.ignore(|o| o.contains('a'));

        prop_assert_eq!(
            noticed.observations().len() + ignored.observations().len(),
            source.1.len()
        );
        prop_assert_eq!(noticed.was_successful(), source.0);
        prop_assert_eq!(ignored.was_successful(), source.0);
    }

    /// Property: value coupling gates on the settled flag
    ///
    /// `with_value_on_success` fills the slot iff the outcome succeeded;
    /// `with_value` fills it regardless.
    #[test]
    fn prop_value_coupling(source in judgement(), value in any::<i32>()) {
        let gated = eager(source.0, &source.1).with_value_on_success(value);
        prop_assert_eq!(gated.has_value(), source.0);
        prop_assert_eq!(gated.value(), source.0.then_some(value));

        let unconditional = eager(source.0, &source.1).with_value(value);
        prop_assert_eq!(unconditional.value(), Some(value));
        prop_assert_eq!(unconditional.was_successful(), source.0);
    }

    /// Property: fail_on is AND with "no observation matches"
    #[test]
    fn prop_fail_on(source in judgement()) {
        let outcome = eager(source.0, &source.1).fail_on(|o| o.contains('z'));

        let any_match = source.1.iter().any(|o| o.contains('z'));
        prop_assert_eq!(outcome.was_successful(), source.0 && !any_match);
        prop_assert_eq!(outcome.observations().to_vec(), source.1.clone());
    }
}
