//! Crate-wide error type.
//!
//! Each concern owns a structured error:
//! - [`ValidationError`]: constructor argument checks
//! - [`IdentifierError`]: identifier parsing
//! - [`ResolutionError`]: discriminator resolution and materialization
//!
//! [`Error`] wraps them for callers that do not care which layer failed, and
//! adds configuration and JSON parse failures. [`Error::error_kind`] gives the
//! stable kind name for any of them.

use std::fmt;

use crate::{identifiers::IdentifierError, validation::ValidationError, variant::ResolutionError};

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Constructor argument check failed
    Validation(ValidationError),
    /// Identifier could not be parsed
    Identifier(IdentifierError),
    /// Payload could not be resolved into a variant
    Resolution(ResolutionError),
    /// Configuration could not be read or applied
    Config(String),
    /// Input was not well-formed JSON
    Parse(String),
}

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Stable name of the failure kind.
    ///
    /// Identifier failures are all `MalformedIdentifier`, whether raised
    /// directly or while resolving a payload.
    #[must_use]
    pub const fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(err) | Self::Resolution(ResolutionError::Validation(err)) => {
                validation_kind(err)
            }
            Self::Identifier(_) | Self::Resolution(ResolutionError::MalformedIdentifier { .. }) => {
                "MalformedIdentifier"
            }
            Self::Resolution(err) => resolution_kind(err),
            Self::Config(_) => "InvalidConfig",
            Self::Parse(_) => "Parse",
        }
    }
}

const fn validation_kind(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::NullArgument { .. } => "NullArgument",
        ValidationError::OutOfRange { .. } => "OutOfRange",
    }
}

const fn resolution_kind(err: &ResolutionError) -> &'static str {
    match err {
        ResolutionError::MissingDiscriminator { .. } => "MissingDiscriminator",
        ResolutionError::UnknownDiscriminator { .. } => "UnknownDiscriminator",
        ResolutionError::MissingRequiredField { .. } => "MissingRequiredField",
        ResolutionError::InvalidField { .. } => "InvalidField",
        ResolutionError::MalformedIdentifier { .. } => "MalformedIdentifier",
        ResolutionError::UnexpectedField { .. } => "UnexpectedField",
        ResolutionError::DepthExceeded { .. } => "DepthExceeded",
        ResolutionError::KindMismatch { .. } => "KindMismatch",
        ResolutionError::Encoding { .. } => "Encoding",
        ResolutionError::Validation(err) => validation_kind(err),
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Identifier(err) => write!(f, "{err}"),
            Self::Resolution(err) => write!(f, "{err}"),
            Self::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Identifier(err) => Some(err),
            Self::Resolution(err) => Some(err),
            Self::Config(_) | Self::Parse(_) => None,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<IdentifierError> for Error {
    fn from(err: IdentifierError) -> Self {
        Self::Identifier(err)
    }
}

impl From<ResolutionError> for Error {
    fn from(err: ResolutionError) -> Self {
        Self::Resolution(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse config: {err}"))
    }
}

/// Result alias using the crate-wide [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_config() {
        let err = Error::config("max_depth missing");
        assert_eq!(err.to_string(), "Invalid configuration: max_depth missing");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::from(ValidationError::null_argument("x")).error_kind(),
            "NullArgument"
        );
        assert_eq!(
            Error::from(ValidationError::out_of_range("x", 5, Some(0), Some(1))).error_kind(),
            "OutOfRange"
        );
        assert_eq!(
            Error::from(IdentifierError::empty()).error_kind(),
            "MalformedIdentifier"
        );
        assert_eq!(
            Error::from(ResolutionError::MalformedIdentifier {
                field: "PartitionId".to_string(),
                source: IdentifierError::empty(),
            })
            .error_kind(),
            "MalformedIdentifier"
        );
        assert_eq!(
            Error::from(ResolutionError::missing_discriminator("HealthEvaluation", "Kind"))
                .error_kind(),
            "MissingDiscriminator"
        );
        assert_eq!(
            Error::from(ResolutionError::unknown_discriminator("HealthEvaluation", "Bogus"))
                .error_kind(),
            "UnknownDiscriminator"
        );
        assert_eq!(
            Error::from(ResolutionError::missing_field("NodeName")).error_kind(),
            "MissingRequiredField"
        );
        assert_eq!(
            Error::from(ResolutionError::from(ValidationError::null_argument("x"))).error_kind(),
            "NullArgument"
        );
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").err();
        assert!(json_err.is_some_and(|e| matches!(Error::from(e), Error::Parse(_))));
    }

    #[test]
    fn test_error_source_is_exposed() {
        use std::error::Error as _;

        let err = Error::from(IdentifierError::empty());
        assert!(err.source().is_some());
        assert!(Error::config("x").source().is_none());
    }
}
