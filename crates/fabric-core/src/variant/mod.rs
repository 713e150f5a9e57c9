//! Discriminated variant families
//!
//! A family is a closed sum type whose concrete case is selected on the wire
//! by a discriminator field (`Kind`, `ServiceKind`, `ScheduleKind`, ...).
//! Families are declared with `variant_family!`, which generates the
//! discriminator enum, the boxed-variant enum and an exhaustive dispatch.
//! Concrete variants implement [`WireRecord`] by reading and writing their
//! declared attributes through [`AttributeReader`] and [`AttributeWriter`].
//!
//! # Resolution
//!
//! ```rust
//! use fabric_core::health::HealthEvaluation;
//! use fabric_core::variant::{resolve_value, to_value};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "Kind": "Node",
//!     "AggregatedHealthState": "Error",
//!     "NodeName": "_Node_0",
//! });
//! let evaluation: HealthEvaluation = resolve_value(&payload)?;
//! assert_eq!(to_value(&evaluation)?, payload);
//! # Ok::<(), fabric_core::variant::ResolutionError>(())
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use std::{fmt, hash::Hash, str::FromStr};

mod error;
mod macros;
mod reader;
mod resolver;
mod writer;

pub use error::ResolutionError;
pub(crate) use macros::{variant_family, wire_record};
pub use reader::AttributeReader;
pub use resolver::{
    materialize, read_record, record_to_value, registered_kinds, resolve, resolve_value,
    resolve_value_with, resolve_with, to_value,
};
pub use writer::AttributeWriter;

// ============================================================================
// TRAITS
// ============================================================================

/// The closed set of tags a family can carry.
///
/// Wire names are the exact, case-sensitive tag identifiers.
pub trait Discriminator:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Into<&'static str> + 'static
{
    /// The unset sentinel; it never resolves to a variant
    const INVALID: Self;

    /// Every declared tag, `INVALID` included
    fn variants() -> &'static [Self];

    fn is_invalid(self) -> bool {
        self == Self::INVALID
    }

    fn wire_name(self) -> &'static str {
        self.into()
    }
}

/// A record that knows its own wire attributes.
pub trait WireRecord: Sized {
    /// Read the declared attributes
    ///
    /// # Errors
    ///
    /// Returns the first attribute that is missing, mistyped or violates a
    /// constructor constraint.
    fn read(reader: &mut AttributeReader<'_>) -> Result<Self, ResolutionError>;

    /// Write the declared attributes, omitting unset optionals
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute cannot be encoded.
    fn write(&self, writer: &mut AttributeWriter) -> Result<(), ResolutionError>;
}

/// A discriminated family: an enum of concrete variants sharing a tag field.
pub trait VariantFamily: Sized {
    type Kind: Discriminator;

    /// Family name used in error messages
    const FAMILY: &'static str;

    /// Name of the discriminator attribute on the wire
    const KIND_FIELD: &'static str;

    fn kind(&self) -> Self::Kind;

    /// Build the variant registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if `kind` has no registered variant or its
    /// attributes do not resolve.
    fn construct(kind: Self::Kind, reader: &mut AttributeReader<'_>) -> Result<Self, ResolutionError>;

    /// Write this variant's attributes, without the discriminator.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute cannot be encoded.
    fn write_variant(&self, writer: &mut AttributeWriter) -> Result<(), ResolutionError>;
}
