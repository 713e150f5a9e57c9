//! Typed, path-aware access to a wire attribute bag.

use std::{borrow::Cow, collections::BTreeSet, fmt::Display, str::FromStr};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::{resolver, ResolutionError, VariantFamily, WireRecord};
use crate::{
    config::ResolverConfig,
    identifiers::IdentifierError,
    validation::{check_optional, require_percentage},
};

/// Reads the attributes a record declares, recording which ones it consumed.
///
/// Absent and JSON-null attributes are the same thing: "unset". Each accessor
/// maps failures onto a [`ResolutionError`] whose field is the dotted path from
/// the payload root.
#[derive(Debug)]
pub struct AttributeReader<'a> {
    attributes: &'a Map<String, Value>,
    config: &'a ResolverConfig,
    path: String,
    depth: usize,
    consumed: BTreeSet<&'a str>,
}

impl<'a> AttributeReader<'a> {
    pub(crate) const fn new(
        attributes: &'a Map<String, Value>,
        config: &'a ResolverConfig,
        path: String,
        depth: usize,
    ) -> Self {
        Self {
            attributes,
            config,
            path,
            depth,
            consumed: BTreeSet::new(),
        }
    }

    /// Dotted path of the record being read; empty at the payload root
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of enclosing discriminated variants
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Path of a field inside this record
    #[must_use]
    pub fn field_path(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.path)
        }
    }

    pub(crate) fn mark_consumed(&mut self, name: &str) {
        if let Some((key, _)) = self.attributes.get_key_value(name) {
            self.consumed.insert(key.as_str());
        }
    }

    fn take(&mut self, name: &str) -> Option<&'a Value> {
        let attributes = self.attributes;
        attributes.get_key_value(name).and_then(|(key, value)| {
            self.consumed.insert(key.as_str());
            (!value.is_null()).then_some(value)
        })
    }

    fn take_required(&mut self, name: &str) -> Result<&'a Value, ResolutionError> {
        self.take(name)
            .ok_or_else(|| ResolutionError::missing_field(self.field_path(name)))
    }

    fn decode<T: DeserializeOwned>(&self, name: &str, value: &'a Value) -> Result<T, ResolutionError> {
        T::deserialize(value).map_err(|e| ResolutionError::invalid_field(self.field_path(name), e))
    }

    // ------------------------------------------------------------------
    // Plain values
    // ------------------------------------------------------------------

    /// A required plain value decoded with serde
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when unset, `InvalidField` when mistyped.
    pub fn required<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ResolutionError> {
        let value = self.take_required(name)?;
        self.decode(name, value)
    }

    /// An optional plain value decoded with serde
    ///
    /// # Errors
    ///
    /// `InvalidField` when present but mistyped.
    pub fn optional<T: DeserializeOwned>(&mut self, name: &str) -> Result<Option<T>, ResolutionError> {
        self.take(name)
            .map(|value| self.decode(name, value))
            .transpose()
    }

    /// A required percentage in `[0, 100]`
    ///
    /// # Errors
    ///
    /// As [`Self::required`], plus `Validation` when out of range.
    pub fn required_percentage(&mut self, name: &str) -> Result<i32, ResolutionError> {
        let percent = self.required(name)?;
        Ok(require_percentage(percent, &self.field_path(name))?)
    }

    /// An optional percentage in `[0, 100]`
    ///
    /// # Errors
    ///
    /// As [`Self::optional`], plus `Validation` when out of range.
    pub fn optional_percentage(&mut self, name: &str) -> Result<Option<i32>, ResolutionError> {
        let percent = self.optional(name)?;
        let field = self.field_path(name);
        Ok(check_optional(percent, |p| require_percentage(p, &field))?)
    }

    // ------------------------------------------------------------------
    // Identifiers
    // ------------------------------------------------------------------

    fn parse_id<T>(&self, name: &str, value: &'a Value) -> Result<T, ResolutionError>
    where
        T: FromStr<Err = IdentifierError>,
    {
        let text = text_of(value).ok_or_else(|| {
            ResolutionError::invalid_field(self.field_path(name), "expected a string identifier")
        })?;
        text.parse().map_err(|source| ResolutionError::MalformedIdentifier {
            field: self.field_path(name),
            source,
        })
    }

    /// A required identifier, keeping the structured identifier error
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when unset, `MalformedIdentifier` when invalid.
    pub fn required_id<T>(&mut self, name: &str) -> Result<T, ResolutionError>
    where
        T: FromStr<Err = IdentifierError>,
    {
        let value = self.take_required(name)?;
        self.parse_id(name, value)
    }

    /// An optional identifier
    ///
    /// # Errors
    ///
    /// `MalformedIdentifier` when present but invalid.
    pub fn optional_id<T>(&mut self, name: &str) -> Result<Option<T>, ResolutionError>
    where
        T: FromStr<Err = IdentifierError>,
    {
        self.take(name)
            .map(|value| self.parse_id(name, value))
            .transpose()
    }

    /// An optional list of identifiers
    ///
    /// # Errors
    ///
    /// `InvalidField` when not a list, `MalformedIdentifier` for a bad element.
    pub fn optional_ids<T>(&mut self, name: &str) -> Result<Option<Vec<T>>, ResolutionError>
    where
        T: FromStr<Err = IdentifierError>,
    {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| ResolutionError::invalid_field(self.field_path(name), "expected a list"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.parse_id(&format!("{name}[{index}]"), item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    // ------------------------------------------------------------------
    // Large integers
    // ------------------------------------------------------------------

    fn parse_decimal<T>(&self, name: &str, value: &'a Value) -> Result<T, ResolutionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let text = text_of(value).ok_or_else(|| {
            ResolutionError::invalid_field(self.field_path(name), "expected a decimal string")
        })?;
        text.trim()
            .parse()
            .map_err(|e| ResolutionError::invalid_field(self.field_path(name), e))
    }

    /// A required integer carried as a decimal string
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when unset, `InvalidField` when unparseable.
    pub fn required_decimal<T>(&mut self, name: &str) -> Result<T, ResolutionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let value = self.take_required(name)?;
        self.parse_decimal(name, value)
    }

    /// An optional integer carried as a decimal string
    ///
    /// # Errors
    ///
    /// `InvalidField` when present but unparseable.
    pub fn optional_decimal<T>(&mut self, name: &str) -> Result<Option<T>, ResolutionError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.take(name)
            .map(|value| self.parse_decimal(name, value))
            .transpose()
    }

    // ------------------------------------------------------------------
    // Nested discriminated variants
    // ------------------------------------------------------------------

    fn nested<F: VariantFamily>(&self, path: String, value: &'a Value) -> Result<F, ResolutionError> {
        resolver::resolve_nested(value, self.config, path, self.depth + 1)
    }

    /// A required nested variant
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when unset, or any error from resolving it.
    pub fn variant<F: VariantFamily>(&mut self, name: &str) -> Result<F, ResolutionError> {
        let value = self.take_required(name)?;
        self.nested(self.field_path(name), value)
    }

    /// An optional nested variant
    ///
    /// # Errors
    ///
    /// Any error from resolving it when present.
    pub fn optional_variant<F: VariantFamily>(&mut self, name: &str) -> Result<Option<F>, ResolutionError> {
        self.take(name)
            .map(|value| self.nested(self.field_path(name), value))
            .transpose()
    }

    /// An optional list of nested variants
    ///
    /// # Errors
    ///
    /// `InvalidField` when not a list, or the first element that fails.
    pub fn optional_variants<F: VariantFamily>(
        &mut self,
        name: &str,
    ) -> Result<Option<Vec<F>>, ResolutionError> {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| ResolutionError::invalid_field(self.field_path(name), "expected a list"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.nested(self.field_path(&format!("{name}[{index}]")), item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    // ------------------------------------------------------------------
    // Plain records that may embed variants
    // ------------------------------------------------------------------

    fn record<R: WireRecord>(&self, path: String, value: &'a Value) -> Result<R, ResolutionError> {
        let attributes = value
            .as_object()
            .ok_or_else(|| ResolutionError::invalid_field(path.clone(), "expected an object"))?;
        let mut reader = AttributeReader::new(attributes, self.config, path, self.depth);
        let record = R::read(&mut reader)?;
        reader.finish()?;
        Ok(record)
    }

    /// A required embedded record
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` when unset, or any error from reading it.
    pub fn required_record<R: WireRecord>(&mut self, name: &str) -> Result<R, ResolutionError> {
        let value = self.take_required(name)?;
        self.record(self.field_path(name), value)
    }

    /// An optional embedded record
    ///
    /// # Errors
    ///
    /// Any error from reading it when present.
    pub fn optional_record<R: WireRecord>(&mut self, name: &str) -> Result<Option<R>, ResolutionError> {
        self.take(name)
            .map(|value| self.record(self.field_path(name), value))
            .transpose()
    }

    /// An optional list of embedded records
    ///
    /// # Errors
    ///
    /// `InvalidField` when not a list, or the first element that fails.
    pub fn optional_records<R: WireRecord>(
        &mut self,
        name: &str,
    ) -> Result<Option<Vec<R>>, ResolutionError> {
        let Some(value) = self.take(name) else {
            return Ok(None);
        };
        let items = value
            .as_array()
            .ok_or_else(|| ResolutionError::invalid_field(self.field_path(name), "expected a list"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| self.record(self.field_path(&format!("{name}[{index}]")), item))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    // ------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------

    /// Deal with attributes nobody consumed.
    ///
    /// They are ignored for forward compatibility unless the resolver runs in
    /// strict mode.
    ///
    /// # Errors
    ///
    /// `UnexpectedField` for the first unconsumed attribute in strict mode.
    pub(crate) fn finish(self) -> Result<(), ResolutionError> {
        for key in self.attributes.keys() {
            if self.consumed.contains(key.as_str()) {
                continue;
            }
            let field = self.field_path(key);
            if self.config.reject_unknown_attributes {
                return Err(ResolutionError::UnexpectedField { field });
            }
            tracing::debug!(field = %field, "ignoring unrecognized attribute");
        }
        Ok(())
    }
}

/// String form of a scalar; numbers are accepted so lenient producers that
/// emit large integers as JSON numbers still resolve.
fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        _ => None,
    }
}
