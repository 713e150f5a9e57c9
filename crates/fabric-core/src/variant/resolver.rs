//! Discriminator resolution: `(kind, attributes)` to a typed variant and back.
//!
//! Resolution is a single exhaustive dispatch per family, generated by
//! `variant_family!`. Nested families recurse
//! through [`AttributeReader`] so every error carries the dotted path of the
//! field that failed.

use serde_json::{Map, Value};

use super::{
    AttributeReader, AttributeWriter, Discriminator, ResolutionError, VariantFamily, WireRecord,
};
use crate::config::ResolverConfig;

// ============================================================================
// RESOLVE
// ============================================================================

/// Resolve a variant from its discriminator and attribute bag using the
/// default [`ResolverConfig`].
///
/// `attributes` may or may not repeat the discriminator field; it is never
/// treated as an unknown attribute, but when present it must name `kind`.
///
/// # Errors
///
/// Returns `MissingDiscriminator` when `kind` is absent, empty or `Invalid`,
/// `UnknownDiscriminator` when it names no variant, `InvalidField` when the
/// repeated discriminator disagrees with `kind`, and any attribute error
/// raised while constructing the variant.
pub fn resolve<F: VariantFamily>(
    kind: Option<&str>,
    attributes: &Map<String, Value>,
) -> Result<F, ResolutionError> {
    resolve_with(kind, attributes, &ResolverConfig::default())
}

/// Resolve a variant with explicit resolver settings.
///
/// # Errors
///
/// See [`resolve`]; additionally `UnexpectedField` in strict mode.
pub fn resolve_with<F: VariantFamily>(
    kind: Option<&str>,
    attributes: &Map<String, Value>,
    config: &ResolverConfig,
) -> Result<F, ResolutionError> {
    let kind = parse_kind::<F>(kind, F::KIND_FIELD)?;
    construct(kind, attributes, config, String::new(), 1)
}

/// Resolve a variant from a JSON object that carries its own discriminator.
///
/// # Errors
///
/// See [`resolve`]; additionally `InvalidField` when `value` is not an object
/// or the discriminator is not a string.
pub fn resolve_value<F: VariantFamily>(value: &Value) -> Result<F, ResolutionError> {
    resolve_value_with(value, &ResolverConfig::default())
}

/// [`resolve_value`] with explicit resolver settings.
///
/// # Errors
///
/// See [`resolve_value`].
pub fn resolve_value_with<F: VariantFamily>(
    value: &Value,
    config: &ResolverConfig,
) -> Result<F, ResolutionError> {
    resolve_nested(value, config, String::new(), 1)
}

pub(crate) fn resolve_nested<F: VariantFamily>(
    value: &Value,
    config: &ResolverConfig,
    path: String,
    depth: usize,
) -> Result<F, ResolutionError> {
    if depth > config.max_depth {
        return Err(ResolutionError::DepthExceeded {
            max_depth: config.max_depth,
            field: path,
        });
    }

    let attributes = value.as_object().ok_or_else(|| {
        ResolutionError::invalid_field(display_path(&path, F::FAMILY), "expected an object")
    })?;

    let kind_path = join(&path, F::KIND_FIELD);
    let kind = match attributes.get(F::KIND_FIELD) {
        None | Some(Value::Null) => None,
        Some(Value::String(kind)) => Some(kind.as_str()),
        Some(other) => {
            return Err(ResolutionError::invalid_field(
                kind_path,
                format!("discriminator must be a string, got {other}"),
            ))
        }
    };
    let kind = parse_kind::<F>(kind, &kind_path)?;
    construct(kind, attributes, config, path, depth)
}

fn parse_kind<F: VariantFamily>(kind: Option<&str>, field: &str) -> Result<F::Kind, ResolutionError> {
    let Some(raw) = kind.filter(|k| !k.is_empty()) else {
        tracing::debug!(family = F::FAMILY, field, "discriminator missing");
        return Err(ResolutionError::missing_discriminator(F::FAMILY, field));
    };

    let parsed = raw.parse::<F::Kind>().map_err(|_| {
        tracing::debug!(family = F::FAMILY, kind = raw, "discriminator not recognized");
        ResolutionError::unknown_discriminator(F::FAMILY, raw)
    })?;

    if parsed.is_invalid() {
        tracing::debug!(family = F::FAMILY, field, "discriminator is the Invalid sentinel");
        return Err(ResolutionError::missing_discriminator(F::FAMILY, field));
    }
    Ok(parsed)
}

fn construct<F: VariantFamily>(
    kind: F::Kind,
    attributes: &Map<String, Value>,
    config: &ResolverConfig,
    path: String,
    depth: usize,
) -> Result<F, ResolutionError> {
    if let Some(repeated) = attributes.get(F::KIND_FIELD).filter(|v| !v.is_null()) {
        if repeated.as_str() != Some(kind.wire_name()) {
            tracing::debug!(family = F::FAMILY, kind = %kind, %repeated, "discriminator contradicts attributes");
            return Err(ResolutionError::invalid_field(
                join(&path, F::KIND_FIELD),
                format!("discriminator {repeated} contradicts requested kind '{kind}'"),
            ));
        }
    }

    let mut reader = AttributeReader::new(attributes, config, path, depth);
    reader.mark_consumed(F::KIND_FIELD);

    let variant = F::construct(kind, &mut reader)?;
    if variant.kind() != kind {
        return Err(ResolutionError::KindMismatch {
            family: F::FAMILY,
            requested: kind.to_string(),
            constructed: variant.kind().to_string(),
        });
    }

    tracing::trace!(family = F::FAMILY, kind = %kind, depth, path = reader.path(), "resolved variant");
    reader.finish()?;
    Ok(variant)
}

/// Read a plain (non-discriminated) record from a JSON object.
///
/// Variants nested inside start at depth 1, as if the record were not there.
///
/// # Errors
///
/// `InvalidField` when `value` is not an object, or any attribute error.
pub fn read_record<R: WireRecord>(value: &Value, config: &ResolverConfig) -> Result<R, ResolutionError> {
    let attributes = value
        .as_object()
        .ok_or_else(|| ResolutionError::invalid_field("<root>", "expected an object"))?;
    let mut reader = AttributeReader::new(attributes, config, String::new(), 0);
    let record = R::read(&mut reader)?;
    reader.finish()?;
    Ok(record)
}

// ============================================================================
// MATERIALIZE
// ============================================================================

/// Break a variant back into its discriminator and declared attributes.
///
/// The returned map does not contain the discriminator field; [`to_value`]
/// adds it.
///
/// # Errors
///
/// Returns `MissingDiscriminator` if the variant reports `Invalid`, or any
/// encoding error from its attributes.
pub fn materialize<F: VariantFamily>(
    variant: &F,
) -> Result<(F::Kind, Map<String, Value>), ResolutionError> {
    let kind = variant.kind();
    if kind.is_invalid() {
        return Err(ResolutionError::missing_discriminator(F::FAMILY, F::KIND_FIELD));
    }
    let mut writer = AttributeWriter::new();
    variant.write_variant(&mut writer)?;
    Ok((kind, writer.into_map()))
}

/// Encode a variant as a JSON object including its discriminator field.
///
/// # Errors
///
/// See [`materialize`].
pub fn to_value<F: VariantFamily>(variant: &F) -> Result<Value, ResolutionError> {
    let (kind, mut attributes) = materialize(variant)?;
    attributes.insert(
        F::KIND_FIELD.to_string(),
        Value::String(kind.wire_name().to_string()),
    );
    Ok(Value::Object(attributes))
}

/// Encode a plain record as a JSON object.
///
/// # Errors
///
/// Any validation or encoding error raised while writing it.
pub fn record_to_value<R: WireRecord>(record: &R) -> Result<Value, ResolutionError> {
    let mut writer = AttributeWriter::new();
    record.write(&mut writer)?;
    Ok(Value::Object(writer.into_map()))
}

/// Every kind a family can resolve, in declaration order, `Invalid` excluded.
#[must_use]
pub fn registered_kinds<F: VariantFamily>() -> Vec<F::Kind> {
    F::Kind::variants()
        .iter()
        .copied()
        .filter(|kind| !kind.is_invalid())
        .collect()
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

fn display_path(path: &str, family: &str) -> String {
    if path.is_empty() {
        family.to_string()
    } else {
        path.to_string()
    }
}
