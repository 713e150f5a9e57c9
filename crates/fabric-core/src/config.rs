//! Configuration loading and management
//!
//! # Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. An optional TOML file handed to [`Config::from_file`]
//! 3. Environment variables: `FABRIC_CORE_*`
//!
//! # Example Config
//!
//! ```toml
//! [resolver]
//! max_depth = 32
//! reject_unknown_attributes = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{validation::require_in_inclusive_range, Error, Result};

/// Environment override for [`ResolverConfig::max_depth`]
pub const ENV_MAX_DEPTH: &str = "FABRIC_CORE_MAX_DEPTH";

/// Environment override for [`ResolverConfig::reject_unknown_attributes`]
pub const ENV_REJECT_UNKNOWN_ATTRIBUTES: &str = "FABRIC_CORE_REJECT_UNKNOWN_ATTRIBUTES";

const DEFAULT_MAX_DEPTH: usize = 64;
const MAX_DEPTH_CEILING: usize = 1024;

// ═══════════════════════════════════════════════════════════════════════════
// CONFIGURATION STRUCTURES
// ═══════════════════════════════════════════════════════════════════════════

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub resolver: ResolverConfig,
}

/// Knobs for discriminator resolution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Deepest permitted nesting of discriminated variants
    pub max_depth: usize,
    /// Fail on attributes a variant does not declare instead of ignoring them
    pub reject_unknown_attributes: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_unknown_attributes: false,
        }
    }
}

impl ResolverConfig {
    /// Strict conformance mode: unknown attributes are errors.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reject_unknown_attributes: true,
        }
    }

    /// Replace the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Check the values are usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if `max_depth` is outside `[1, 1024]`.
    pub fn validate(&self) -> Result<()> {
        require_in_inclusive_range(self.max_depth, "resolver.max_depth", 1, MAX_DEPTH_CEILING)?;
        Ok(())
    }
}

impl Config {
    /// Parse a TOML document, fill unspecified keys with defaults and validate.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The file cannot be read
    /// - The TOML is malformed
    /// - An environment override cannot be parsed
    /// - A value fails validation
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        tracing::debug!("Loaded config file: {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first failing constraint.
    pub fn validate(&self) -> Result<()> {
        self.resolver.validate()
    }

    /// Apply environment variable overrides
    ///
    /// # Errors
    ///
    /// Returns error if environment variable values are invalid
    fn apply_env_vars(&mut self) -> Result<()> {
        // FABRIC_CORE_MAX_DEPTH
        if let Ok(value) = std::env::var(ENV_MAX_DEPTH) {
            self.resolver.max_depth = value
                .parse()
                .map_err(|e| Error::config(format!("Invalid {ENV_MAX_DEPTH} value: {e}")))?;
            tracing::debug!(max_depth = self.resolver.max_depth, "resolver depth overridden from environment");
        }

        // FABRIC_CORE_REJECT_UNKNOWN_ATTRIBUTES
        if let Ok(value) = std::env::var(ENV_REJECT_UNKNOWN_ATTRIBUTES) {
            self.resolver.reject_unknown_attributes = value.parse().map_err(|e| {
                Error::config(format!("Invalid {ENV_REJECT_UNKNOWN_ATTRIBUTES} value: {e}"))
            })?;
            tracing::debug!(
                reject_unknown_attributes = self.resolver.reject_unknown_attributes,
                "strict resolution overridden from environment"
            );
        }

        Ok(())
    }
}
