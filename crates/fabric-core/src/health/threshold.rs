//! Percentage-threshold policies used by aggregated health evaluations.
//!
//! All arithmetic is exact integer arithmetic on widened operands, so no
//! combination of counts overflows or rounds.

/// Most unhealthy children a `max_percent` policy tolerates out of
/// `total_count`: `floor(max_percent * total_count / 100)`.
///
/// Negative inputs are treated as zero.
#[must_use]
pub fn allowed_unhealthy(max_percent: i32, total_count: i64) -> i64 {
    let product = i128::from(max_percent.max(0)) * i128::from(total_count.max(0));
    i64::try_from(product / 100).unwrap_or(i64::MAX)
}

/// Whether `unhealthy_count` out of `total_count` breaks a `max_percent` policy.
///
/// The policy is broken when the unhealthy percentage strictly exceeds
/// `max_percent`, i.e. when `unhealthy_count > allowed_unhealthy(..)`. A
/// 0% policy tolerates no failures; no failures never break a policy.
///
/// ```rust
/// use fabric_core::health::is_threshold_violated;
///
/// assert!(is_threshold_violated(0, 10, 1));
/// assert!(!is_threshold_violated(50, 3, 1));
/// assert!(is_threshold_violated(50, 3, 2));
/// ```
#[must_use]
pub fn is_threshold_violated(max_percent: i32, total_count: i64, unhealthy_count: i64) -> bool {
    let unhealthy = i128::from(unhealthy_count.max(0));
    if unhealthy == 0 {
        return false;
    }
    let max_percent = i128::from(max_percent.max(0));
    let total = i128::from(total_count.max(0));
    unhealthy * 100 > max_percent * total
}

/// Whether the unhealthy ratio grew by more than `max_delta_percent`
/// percentage points over the baseline.
///
/// An empty current population never violates; an empty baseline counts as a
/// 0% baseline.
#[must_use]
pub fn delta_threshold_violated(
    max_delta_percent: i32,
    baseline_error_count: i64,
    baseline_total_count: i64,
    unhealthy_count: i64,
    total_count: i64,
) -> bool {
    let total = i128::from(total_count.max(0));
    if total == 0 {
        return false;
    }
    let unhealthy = i128::from(unhealthy_count.max(0));
    let max_delta = i128::from(max_delta_percent.max(0));
    let baseline_total = i128::from(baseline_total_count.max(0));

    if baseline_total == 0 {
        return unhealthy * 100 > max_delta * total;
    }
    let baseline_errors = i128::from(baseline_error_count.max(0));

    // (unhealthy/total - errors/baseline) * 100 > max_delta, cleared of fractions
    (unhealthy * baseline_total - baseline_errors * total) * 100 > max_delta * total * baseline_total
}
