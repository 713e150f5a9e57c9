//! Resolution error taxonomy.
//!
//! Every failure names the field (as a dotted path from the payload root) so a
//! caller can tell exactly which part of a nested payload was rejected.

use thiserror::Error;

use crate::{identifiers::IdentifierError, validation::ValidationError};

/// Failures raised while turning a wire payload into a typed variant, or back.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The discriminator field was absent, null, empty or the `Invalid` sentinel
    #[error("{family}: discriminator '{field}' is missing or unset")]
    MissingDiscriminator {
        /// Family being resolved
        family: &'static str,
        /// Path of the discriminator field
        field: String,
    },

    /// The discriminator names no registered variant
    #[error("{family}: unknown discriminator '{kind}'")]
    UnknownDiscriminator {
        /// Family being resolved
        family: &'static str,
        /// The unrecognized discriminator value
        kind: String,
    },

    /// A field the variant requires was absent or null
    #[error("required field '{field}' is missing")]
    MissingRequiredField {
        /// Path of the missing field
        field: String,
    },

    /// A field was present but had the wrong shape
    #[error("field '{field}' is invalid: {reason}")]
    InvalidField {
        /// Path of the offending field
        field: String,
        /// What was wrong with it
        reason: String,
    },

    /// A field failed identifier validation
    #[error("field '{field}' is not a valid identifier: {source}")]
    MalformedIdentifier {
        /// Path of the offending field
        field: String,
        /// The identifier invariant that failed
        #[source]
        source: IdentifierError,
    },

    /// A field the variant does not declare, under strict resolution
    #[error("field '{field}' is not recognized")]
    UnexpectedField {
        /// Path of the unrecognized field
        field: String,
    },

    /// Nested variants went deeper than the configured limit
    #[error("nesting exceeds maximum depth of {max_depth} at '{field}'")]
    DepthExceeded {
        /// Configured limit
        max_depth: usize,
        /// Path where the limit was hit
        field: String,
    },

    /// The variant registered for a discriminator reported a different one
    #[error("{family}: variant registered for '{requested}' reported '{constructed}'")]
    KindMismatch {
        /// Family being resolved
        family: &'static str,
        /// Discriminator on the wire
        requested: String,
        /// Discriminator of the constructed value
        constructed: String,
    },

    /// A field could not be encoded on the way out
    #[error("field '{field}' could not be encoded: {reason}")]
    Encoding {
        /// Name of the field
        field: String,
        /// Encoder message
        reason: String,
    },

    /// A constructor constraint was violated
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ResolutionError {
    /// Create a `MissingDiscriminator` error variant
    #[must_use]
    pub fn missing_discriminator(family: &'static str, field: impl Into<String>) -> Self {
        Self::MissingDiscriminator {
            family,
            field: field.into(),
        }
    }

    /// Create an `UnknownDiscriminator` error variant
    #[must_use]
    pub fn unknown_discriminator(family: &'static str, kind: impl Into<String>) -> Self {
        Self::UnknownDiscriminator {
            family,
            kind: kind.into(),
        }
    }

    /// Create a `MissingRequiredField` error variant
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Create an `InvalidField` error variant
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an `Encoding` error variant
    #[must_use]
    pub fn encoding(field: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Encoding {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this is a `MissingDiscriminator` error
    #[must_use]
    pub const fn is_missing_discriminator(&self) -> bool {
        matches!(self, Self::MissingDiscriminator { .. })
    }

    /// Check if this is an `UnknownDiscriminator` error
    #[must_use]
    pub const fn is_unknown_discriminator(&self) -> bool {
        matches!(self, Self::UnknownDiscriminator { .. })
    }

    /// Check if this is a `MissingRequiredField` error
    #[must_use]
    pub const fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingRequiredField { .. })
    }

    /// The field path this error points at, when it has one
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingDiscriminator { field, .. }
            | Self::MissingRequiredField { field }
            | Self::InvalidField { field, .. }
            | Self::MalformedIdentifier { field, .. }
            | Self::UnexpectedField { field }
            | Self::DepthExceeded { field, .. }
            | Self::Encoding { field, .. } => Some(field),
            Self::Validation(err) => Some(err.argument_name()),
            Self::UnknownDiscriminator { .. } | Self::KindMismatch { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_family_and_kind() {
        let err = ResolutionError::unknown_discriminator("HealthEvaluation", "Bogus");
        assert_eq!(
            err.to_string(),
            "HealthEvaluation: unknown discriminator 'Bogus'"
        );
        assert!(err.is_unknown_discriminator());
        assert_eq!(err.field(), None);
    }

    #[test]
    fn test_field_path_is_exposed() {
        let err = ResolutionError::missing_field("UnhealthyEvaluations[0].HealthEvaluation.NodeName");
        assert_eq!(
            err.field(),
            Some("UnhealthyEvaluations[0].HealthEvaluation.NodeName")
        );
    }

    #[test]
    fn test_validation_converts() {
        let err: ResolutionError = ValidationError::null_argument("ServiceName").into();
        assert_eq!(err.field(), Some("ServiceName"));
        assert_eq!(err.to_string(), "argument 'ServiceName' cannot be null");
    }
}
