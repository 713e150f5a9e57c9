//! Argument validation for domain constructors
//!
//! Pure free functions applied to constructor arguments before a value is
//! allowed to exist. Each check either hands the value back unchanged (so call
//! sites can chain) or fails with a [`ValidationError`] naming the offending
//! argument.
//!
//! # Usage
//!
//! ```rust
//! use fabric_core::validation::{require_at_least, require_in_inclusive_range};
//!
//! let target = require_at_least(3, "target_replica_set_size", 1)?;
//! let percent = require_in_inclusive_range(20, "max_percent_unhealthy_nodes", 0, 100)?;
//! # Ok::<(), fabric_core::validation::ValidationError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::fmt::Display;

use thiserror::Error;

/// Upper bound for durations and intervals expressed in seconds on the wire.
pub const MAX_WIRE_SECONDS: u64 = 4_294_967_295;

/// Constructor argument failures.
///
/// Values and bounds are kept in their rendered form so one error type serves
/// every numeric width the model uses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required argument was absent
    #[error("argument '{argument_name}' cannot be null")]
    NullArgument {
        /// Name of the absent argument
        argument_name: String,
    },

    /// A numeric argument fell outside its documented bounds
    #[error("argument '{argument_name}' is out of range: {value} ({})", describe_bounds(.min, .max))]
    OutOfRange {
        /// Name of the offending argument
        argument_name: String,
        /// The rejected value
        value: String,
        /// Lower bound, when the check has one
        min: Option<String>,
        /// Upper bound, when the check has one
        max: Option<String>,
    },
}

#[allow(clippy::ref_option)]
fn describe_bounds(min: &Option<String>, max: &Option<String>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("expected {min}..={max}"),
        (Some(min), None) => format!("expected >= {min}"),
        (None, Some(max)) => format!("expected <= {max}"),
        (None, None) => "no bounds".to_string(),
    }
}

impl ValidationError {
    /// Create a `NullArgument` error variant
    #[must_use]
    pub fn null_argument(argument_name: impl Into<String>) -> Self {
        Self::NullArgument {
            argument_name: argument_name.into(),
        }
    }

    /// Create an `OutOfRange` error variant
    #[must_use]
    pub fn out_of_range<T: Display>(
        argument_name: impl Into<String>,
        value: T,
        min: Option<T>,
        max: Option<T>,
    ) -> Self {
        Self::OutOfRange {
            argument_name: argument_name.into(),
            value: value.to_string(),
            min: min.map(|m| m.to_string()),
            max: max.map(|m| m.to_string()),
        }
    }

    /// Name of the argument that failed validation
    #[must_use]
    pub fn argument_name(&self) -> &str {
        match self {
            Self::NullArgument { argument_name } | Self::OutOfRange { argument_name, .. } => {
                argument_name
            }
        }
    }

    /// Check if this is a `NullArgument` error
    #[must_use]
    pub const fn is_null_argument(&self) -> bool {
        matches!(self, Self::NullArgument { .. })
    }

    /// Check if this is an `OutOfRange` error
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }
}

/// Reject an absent argument.
///
/// # Errors
///
/// Returns `ValidationError::NullArgument` when `value` is `None`.
pub fn require_not_null<T>(value: Option<T>, argument_name: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::null_argument(argument_name))
}

/// Require `min <= value <= max`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `value < min || value > max`.
pub fn require_in_inclusive_range<T>(
    value: T,
    argument_name: &str,
    min: T,
    max: T,
) -> Result<T, ValidationError>
where
    T: Copy + PartialOrd + Display,
{
    if value < min || value > max {
        return Err(ValidationError::out_of_range(
            argument_name,
            value,
            Some(min),
            Some(max),
        ));
    }
    Ok(value)
}

/// Require `value >= min`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `value < min`.
pub fn require_at_least<T>(value: T, argument_name: &str, min: T) -> Result<T, ValidationError>
where
    T: Copy + PartialOrd + Display,
{
    if value < min {
        return Err(ValidationError::out_of_range(
            argument_name,
            value,
            Some(min),
            None,
        ));
    }
    Ok(value)
}

/// Require `value <= max`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `value > max`.
pub fn require_at_most<T>(value: T, argument_name: &str, max: T) -> Result<T, ValidationError>
where
    T: Copy + PartialOrd + Display,
{
    if value > max {
        return Err(ValidationError::out_of_range(
            argument_name,
            value,
            None,
            Some(max),
        ));
    }
    Ok(value)
}

/// Require `value < bound`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `value >= bound`.
pub fn require_less_than<T>(value: T, argument_name: &str, bound: T) -> Result<T, ValidationError>
where
    T: Copy + PartialOrd + Display,
{
    if value >= bound {
        return Err(ValidationError::OutOfRange {
            argument_name: argument_name.to_string(),
            value: value.to_string(),
            min: None,
            max: Some(format!("< {bound}")),
        });
    }
    Ok(value)
}

/// Require `value > bound`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `value <= bound`.
pub fn require_greater_than<T>(
    value: T,
    argument_name: &str,
    bound: T,
) -> Result<T, ValidationError>
where
    T: Copy + PartialOrd + Display,
{
    if value <= bound {
        return Err(ValidationError::OutOfRange {
            argument_name: argument_name.to_string(),
            value: value.to_string(),
            min: Some(format!("> {bound}")),
            max: None,
        });
    }
    Ok(value)
}

/// Apply a check to an optional argument, passing `None` through untouched.
///
/// # Errors
///
/// Propagates the error from `check` when `value` is present and invalid.
pub fn check_optional<T, F>(value: Option<T>, check: F) -> Result<Option<T>, ValidationError>
where
    F: FnOnce(T) -> Result<T, ValidationError>,
{
    value.map(check).transpose()
}

/// Require a wire duration in seconds to fit the documented `[0, 4294967295]` window.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `seconds` exceeds [`MAX_WIRE_SECONDS`].
pub fn require_wire_seconds(seconds: u64, argument_name: &str) -> Result<u64, ValidationError> {
    require_in_inclusive_range(seconds, argument_name, 0, MAX_WIRE_SECONDS)
}

/// Require a percentage in `[0, 100]`.
///
/// # Errors
///
/// Returns `ValidationError::OutOfRange` when `percent` is outside `[0, 100]`.
pub fn require_percentage(percent: i32, argument_name: &str) -> Result<i32, ValidationError> {
    require_in_inclusive_range(percent, argument_name, 0, 100)
}
