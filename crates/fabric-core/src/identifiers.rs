//! Semantic newtypes for cluster identifiers
//!
//! # Parse-at-Boundaries Pattern
//!
//! Each identifier type:
//! - Validates its input on construction (parse-once pattern)
//! - Cannot represent invalid states
//! - Compares and hashes by its normalized value, so it is safe as a map key
//! - Serializes to and from its canonical string form with validation
//!
//! There are no implicit conversions from raw strings, UUIDs or integers.
//! Every construction path goes through `parse`, `TryFrom` or `FromStr`.
//!
//! # Unified Error Type
//!
//! All identifier validation uses [`IdentifierError`]:
//! - **`Null`**: a required identifier was absent
//! - **`Empty`**: identifier is empty or whitespace-only
//! - **`BadScheme`**: hierarchical name without the `fabric` scheme
//! - **`HasAuthority`**: hierarchical name with an authority component
//! - **`TrailingSlash`**: hierarchical name ending in an empty segment
//! - **`ForbiddenCharacter`**: hierarchical name containing a reserved character
//! - **`InvalidFormat`**: any other structural problem
//! - **`InvalidUuid`**: unparseable partition id
//! - **`InvalidInteger`**: unparseable replica id

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::{fmt, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

// ============================================================================
// UNIFIED IDENTIFIER ERROR
// ============================================================================

/// Unified error type for all identifier validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// A required identifier was absent
    #[error("{identifier} cannot be null")]
    Null {
        /// Which identifier type was being constructed
        identifier: &'static str,
    },

    /// Identifier is empty or contains only whitespace
    #[error("identifier cannot be empty")]
    Empty,

    /// Hierarchical name does not use the required scheme
    #[error("name must use the '{expected}:' scheme (got: {value})")]
    BadScheme {
        /// The required scheme
        expected: &'static str,
        /// The rejected input
        value: String,
    },

    /// Hierarchical name carries an authority component
    #[error("name must not have an authority component (got: {value})")]
    HasAuthority {
        /// The rejected input
        value: String,
    },

    /// Hierarchical name ends with a slash
    #[error("name must not end with '/' (got: {value})")]
    TrailingSlash {
        /// The rejected input
        value: String,
    },

    /// Hierarchical name contains a reserved character
    #[error("name contains forbidden character {character:?} (got: {value})")]
    ForbiddenCharacter {
        /// The first forbidden character found
        character: char,
        /// The rejected input
        value: String,
    },

    /// Identifier format is invalid (generic format error)
    #[error("invalid identifier format: {details}")]
    InvalidFormat {
        /// Human-readable explanation of format requirements
        details: String,
    },

    /// Partition id is not a UUID
    #[error("identifier is not a valid UUID: {value}")]
    InvalidUuid {
        /// The rejected input
        value: String,
    },

    /// Replica id is not a 64-bit signed integer
    #[error("identifier is not a valid 64-bit integer: {value}")]
    InvalidInteger {
        /// The rejected input
        value: String,
    },
}

// ============================================================================
// HELPER METHODS
// ============================================================================

impl IdentifierError {
    /// Create a `Null` error variant
    #[must_use]
    pub const fn null(identifier: &'static str) -> Self {
        Self::Null { identifier }
    }

    /// Create an `Empty` error variant
    #[must_use]
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// Create an `InvalidFormat` error variant
    #[must_use]
    pub fn invalid_format(details: impl Into<String>) -> Self {
        Self::InvalidFormat {
            details: details.into(),
        }
    }

    /// Check if this is a `Null` error
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null { .. })
    }

    /// Check if this is an `Empty` error
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Check if this is a `BadScheme` error
    #[must_use]
    pub const fn is_bad_scheme(&self) -> bool {
        matches!(self, Self::BadScheme { .. })
    }

    /// Check if this is a `TrailingSlash` error
    #[must_use]
    pub const fn is_trailing_slash(&self) -> bool {
        matches!(self, Self::TrailingSlash { .. })
    }

    /// Check if this is a `ForbiddenCharacter` error
    #[must_use]
    pub const fn is_forbidden_character(&self) -> bool {
        matches!(self, Self::ForbiddenCharacter { .. })
    }
}

// ============================================================================
// HIERARCHICAL NAME
// ============================================================================

/// Characters that can never appear in a hierarchical name.
///
/// `?` and `#` would start a query or fragment, `\` is rejected by the naming
/// service. ASCII control characters are rejected separately.
pub const FORBIDDEN_NAME_CHARACTERS: &[char] = &['?', '#', '\\'];

/// Segment separator used by the flattened wire form of a name.
const FLAT_ID_SEPARATOR: char = '~';

/// Escaped form of the separator when it appears inside a segment.
const ESCAPED_FLAT_ID_SEPARATOR: &str = "%7E";

/// Escaped form of `%`, applied first so escapes never collide with input.
const ESCAPED_PERCENT: &str = "%25";

/// `.` and `..` segments, including their percent-encoded spellings.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Validate a hierarchical name and return its normalized URI.
///
/// Rules:
/// - Scheme is `fabric` (case-insensitive, normalized to lowercase)
/// - No authority component (`fabric://host/...`)
/// - Rooted path (`fabric:/...`)
/// - No trailing slash except on the root name `fabric:/`
/// - No empty segments and no `.` or `..` segments
/// - No characters from [`FORBIDDEN_NAME_CHARACTERS`] and no control characters
fn validate_hierarchical_name(s: &str) -> Result<Url, IdentifierError> {
    if s.is_empty() {
        return Err(IdentifierError::empty());
    }

    if let Some(character) = s
        .chars()
        .find(|c| FORBIDDEN_NAME_CHARACTERS.contains(c) || c.is_control())
    {
        return Err(IdentifierError::ForbiddenCharacter {
            character,
            value: s.to_string(),
        });
    }

    let url = Url::parse(s).map_err(|_| IdentifierError::BadScheme {
        expected: HierarchicalName::SCHEME,
        value: s.to_string(),
    })?;

    if url.scheme() != HierarchicalName::SCHEME {
        return Err(IdentifierError::BadScheme {
            expected: HierarchicalName::SCHEME,
            value: s.to_string(),
        });
    }

    if url.has_authority() {
        return Err(IdentifierError::HasAuthority {
            value: s.to_string(),
        });
    }

    if url.cannot_be_a_base() {
        return Err(IdentifierError::invalid_format(format!(
            "name '{s}' must be rooted at '{}:/'",
            HierarchicalName::SCHEME
        )));
    }

    // Url::parse collapses dot segments; the raw input must not rely on that.
    let raw_path = s.split_once(':').map_or("", |(_, rest)| rest);
    if raw_path.split('/').any(is_dot_segment) {
        return Err(IdentifierError::invalid_format(format!(
            "name '{s}' contains a '.' or '..' segment"
        )));
    }

    let path = url.path();
    if path != "/" && path.ends_with('/') {
        return Err(IdentifierError::TrailingSlash {
            value: s.to_string(),
        });
    }

    if path.contains("//") {
        return Err(IdentifierError::invalid_format(format!(
            "name '{s}' contains an empty segment"
        )));
    }

    Ok(url)
}

/// A validated hierarchical resource name (`fabric:/app/service`)
///
/// # Construction
///
/// ```rust
/// use fabric_core::identifiers::HierarchicalName;
///
/// let name = HierarchicalName::parse("fabric:/myapp/app1")?;
/// assert_eq!(name.flat_id(), "myapp~app1");
/// # Ok::<(), fabric_core::identifiers::IdentifierError>(())
/// ```
///
/// # Guarantees
///
/// - Scheme is `fabric`
/// - No authority, trailing slash, empty segment or forbidden character
/// - Equality and hashing use the normalized URI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HierarchicalName(Url);

impl HierarchicalName {
    /// The only accepted scheme
    pub const SCHEME: &'static str = "fabric";

    /// Parse and validate a hierarchical name (trims whitespace first)
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` naming the first invariant that failed.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        validate_hierarchical_name(s.trim()).map(Self)
    }

    /// The root name `fabric:/`
    ///
    /// # Errors
    ///
    /// Never fails in practice; the literal is validated like any other input.
    pub fn root() -> Result<Self, IdentifierError> {
        Self::parse(format!("{}:/", Self::SCHEME))
    }

    /// Rebuild a name from its flattened wire form (`myapp~app1`)
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` if the rebuilt name is invalid.
    pub fn from_flat_id(flat_id: &str) -> Result<Self, IdentifierError> {
        let path = flat_id
            .split(FLAT_ID_SEPARATOR)
            .map(|segment| {
                segment
                    .replace(ESCAPED_FLAT_ID_SEPARATOR, "~")
                    .replace(ESCAPED_PERCENT, "%")
            })
            .join("/");
        Self::parse(format!("{}:/{path}", Self::SCHEME))
    }

    /// Whether this is the root name `fabric:/`
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.path() == "/"
    }

    /// Path segments below the root, in their escaped form
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        self.0
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|segment| !segment.is_empty())
            .collect()
    }

    /// The flattened wire form used as an API path segment.
    ///
    /// The scheme is stripped and segments are joined with `~`. A `~` inside a
    /// segment is escaped as `%7E`, and `%` as `%25`, so distinct names never
    /// share a flat id and the mapping stays reversible.
    #[must_use]
    pub fn flat_id(&self) -> String {
        self.segments()
            .into_iter()
            .map(|segment| {
                segment
                    .replace('%', ESCAPED_PERCENT)
                    .replace(FLAT_ID_SEPARATOR, ESCAPED_FLAT_ID_SEPARATOR)
            })
            .join(&FLAT_ID_SEPARATOR.to_string())
    }

    /// The enclosing name, or `None` for the root
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let segments = self.segments();
        let (_, ancestors) = segments.split_last()?;
        let mut parent = self.0.clone();
        parent.set_path(&format!("/{}", ancestors.join("/")));
        Some(Self(parent))
    }

    /// Append one segment below this name
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` if the segment is empty, contains `/`, or
    /// makes the name invalid.
    pub fn append(&self, segment: &str) -> Result<Self, IdentifierError> {
        if segment.is_empty() {
            return Err(IdentifierError::empty());
        }
        if segment.contains('/') {
            return Err(IdentifierError::invalid_format(format!(
                "segment '{segment}' cannot contain '/'"
            )));
        }
        if self.is_root() {
            Self::parse(format!("{self}{segment}"))
        } else {
            Self::parse(format!("{self}/{segment}"))
        }
    }

    /// Whether `other` is this name or lives below it
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments().starts_with(&self.segments())
    }

    /// Get the normalized name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Borrow the underlying URI
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for HierarchicalName {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for HierarchicalName {
    type Error = IdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for HierarchicalName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HierarchicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_str())
    }
}

impl AsRef<str> for HierarchicalName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<HierarchicalName> for String {
    #[allow(clippy::use_self)] // Self refers to String, not HierarchicalName
    fn from(name: HierarchicalName) -> String {
        name.0.into()
    }
}

// ============================================================================
// NODE NAME
// ============================================================================

/// A cluster node name
///
/// Any string is a valid node name. The empty string is the distinguished
/// [`NodeName::empty`] value rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeName(String);

impl NodeName {
    /// Wrap a node name; never fails
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The distinguished empty node name
    #[must_use]
    pub const fn empty() -> Self {
        Self(String::new())
    }

    /// Parse a node name
    ///
    /// Accepts any input verbatim; provided so every identifier shares the
    /// same `parse` entry point.
    ///
    /// # Errors
    ///
    /// Never returns an error.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        Ok(Self::new(s))
    }

    /// Whether this is the empty node name
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the node name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into an owned String
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for NodeName {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// PARTITION ID
// ============================================================================

/// A validated partition id (128-bit UUID)
///
/// # Construction
///
/// ```rust
/// use fabric_core::identifiers::PartitionId;
///
/// let lower = PartitionId::parse("1b4d9f4e-2f4c-4d4b-8c1e-5e6f7a8b9c0d")?;
/// let upper = PartitionId::parse("1B4D9F4E-2F4C-4D4B-8C1E-5E6F7A8B9C0D")?;
/// assert_eq!(lower, upper);
/// # Ok::<(), fabric_core::identifiers::IdentifierError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartitionId(Uuid);

impl PartitionId {
    /// The all-zero partition id
    pub const EMPTY: Self = Self(Uuid::nil());

    /// Wrap an existing UUID
    #[must_use]
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a partition id in any standard UUID form and letter case
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Empty` or `IdentifierError::InvalidUuid`.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::empty());
        }
        Uuid::parse_str(trimmed)
            .map(Self)
            .map_err(|_| IdentifierError::InvalidUuid {
                value: trimmed.to_string(),
            })
    }

    /// Parse a possibly-absent partition id, rejecting absence
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Null` when `s` is `None`.
    pub fn from_option(s: Option<&str>) -> Result<Self, IdentifierError> {
        s.ok_or_else(|| IdentifierError::null("PartitionId"))
            .and_then(Self::parse)
    }

    /// Whether this is the all-zero id
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }

    /// Borrow the underlying UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl TryFrom<String> for PartitionId {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for PartitionId {
    type Error = IdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for PartitionId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<PartitionId> for String {
    #[allow(clippy::use_self)] // Self refers to String, not PartitionId
    fn from(id: PartitionId) -> String {
        id.to_string()
    }
}

// ============================================================================
// REPLICA ID
// ============================================================================

/// A validated replica or instance id (64-bit signed integer)
///
/// Travels on the wire as a decimal string so values beyond 2^53 survive
/// JSON number handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReplicaId(i64);

impl ReplicaId {
    /// The zero replica id
    pub const EMPTY: Self = Self(0);

    /// Wrap an existing integer id
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Parse a decimal replica id
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Empty` or `IdentifierError::InvalidInteger`.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::empty());
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| IdentifierError::InvalidInteger {
                value: trimmed.to_string(),
            })
    }

    /// Parse a possibly-absent replica id, rejecting absence
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Null` when `s` is `None`.
    pub fn from_option(s: Option<&str>) -> Result<Self, IdentifierError> {
        s.ok_or_else(|| IdentifierError::null("ReplicaId"))
            .and_then(Self::parse)
    }

    /// Whether this is the zero id
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// The raw integer value
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl TryFrom<String> for ReplicaId {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ReplicaId {
    type Error = IdentifierError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl FromStr for ReplicaId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ReplicaId> for String {
    #[allow(clippy::use_self)] // Self refers to String, not ReplicaId
    fn from(id: ReplicaId) -> String {
        id.to_string()
    }
}

// ============================================================================
// CONTINUATION TOKEN
// ============================================================================

/// An opaque paging position
///
/// Only presence matters: an absent or empty token on the wire means there
/// are no further pages, so it never becomes a `ContinuationToken`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContinuationToken(String);

impl ContinuationToken {
    /// Parse a non-empty token
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError::Empty` for an empty token.
    pub fn parse(s: impl Into<String>) -> Result<Self, IdentifierError> {
        let s = s.into();
        if s.is_empty() {
            return Err(IdentifierError::empty());
        }
        Ok(Self(s))
    }

    /// Interpret a token as received on the wire
    #[must_use]
    pub fn from_wire(token: Option<String>) -> Option<Self> {
        token.and_then(|t| Self::parse(t).ok())
    }

    /// Serde adapter mapping an absent, null or empty token to `None`
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error if the value is not a string or null.
    pub fn deserialize_wire<'de, D>(deserializer: D) -> Result<Option<Self>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Self::from_wire)
    }

    /// Get the token as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContinuationToken {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl fmt::Display for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContinuationToken> for String {
    #[allow(clippy::use_self)] // Self refers to String, not ContinuationToken
    fn from(token: ContinuationToken) -> String {
        token.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
