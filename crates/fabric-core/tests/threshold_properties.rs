//! Property-based tests for the percentage-threshold policy.
//!
//! Invariants tested:
//! - A violation is exactly `unhealthy * 100 > max_percent * total`
//! - Adding unhealthy children never clears a violation
//! - A 100% policy is never violated by a valid count; zero unhealthy never violates
//! - A 0% policy is violated by any unhealthy child

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use fabric_core::health::{allowed_unhealthy, delta_threshold_violated, is_threshold_violated};
use proptest::prelude::*;

fn threshold_config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        max_shrink_iters: 512,
        ..ProptestConfig::default()
    }
}

/// A total and an unhealthy count that does not exceed it.
fn population_strategy() -> impl Strategy<Value = (i64, i64)> {
    (0..=1_000_000_i64).prop_flat_map(|total| (Just(total), 0..=total))
}

// ═══════════════════════════════════════════════════════════════════════════
// FIXED CASES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_reference_cases() {
    assert!(is_threshold_violated(0, 10, 1));
    assert!(!is_threshold_violated(50, 3, 1));
    assert!(is_threshold_violated(50, 3, 2));
}

#[test]
fn test_rounding_favors_tolerance() {
    // 1 of 3 is 33.3%: within a 34% policy, beyond a 33% one
    assert!(!is_threshold_violated(34, 3, 1));
    assert!(is_threshold_violated(33, 3, 1));
    assert_eq!(allowed_unhealthy(34, 3), 1);
    assert_eq!(allowed_unhealthy(33, 3), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(threshold_config())]

    /// Property: the policy matches the cross-multiplied comparison.
    #[test]
    fn prop_matches_cross_multiplication(max_percent in 0..=100_i32, (total, unhealthy) in population_strategy()) {
        let expected = unhealthy > 0 && i128::from(unhealthy) * 100 > i128::from(max_percent) * i128::from(total);
        prop_assert_eq!(is_threshold_violated(max_percent, total, unhealthy), expected);
        if unhealthy > 0 {
            prop_assert_eq!(expected, unhealthy > allowed_unhealthy(max_percent, total));
        }
    }

    /// Property: more unhealthy children never make a violation go away.
    #[test]
    fn prop_monotonic_in_unhealthy(max_percent in 0..=100_i32, (total, unhealthy) in population_strategy()) {
        if is_threshold_violated(max_percent, total, unhealthy) && unhealthy < total {
            prop_assert!(is_threshold_violated(max_percent, total, unhealthy + 1));
        }
    }

    /// Property: a looser policy never violates where a stricter one holds.
    #[test]
    fn prop_monotonic_in_percent(max_percent in 0..100_i32, (total, unhealthy) in population_strategy()) {
        if !is_threshold_violated(max_percent, total, unhealthy) {
            prop_assert!(!is_threshold_violated(max_percent + 1, total, unhealthy));
        }
    }

    /// Property: the policy extremes behave as documented.
    #[test]
    fn prop_extremes((total, unhealthy) in population_strategy()) {
        prop_assert!(!is_threshold_violated(100, total, unhealthy));
        prop_assert!(!is_threshold_violated(0, total, 0));
        prop_assert_eq!(is_threshold_violated(0, total, unhealthy), unhealthy > 0);
    }

    /// Property: with no rise over the baseline the delta check holds.
    #[test]
    fn prop_delta_without_growth_holds(max_delta in 0..=100_i32, (total, unhealthy) in population_strategy()) {
        prop_assert!(!delta_threshold_violated(max_delta, unhealthy, total, unhealthy, total));
    }
}
