//! Building a wire attribute bag from typed records.

use std::fmt::Display;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{resolver, ResolutionError, VariantFamily, WireRecord};

/// Collects a record's attributes under their wire names.
///
/// Unset optional attributes are omitted rather than written as null.
#[derive(Debug, Default)]
pub struct AttributeWriter {
    attributes: Map<String, Value>,
}

impl AttributeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a plain value
    ///
    /// # Errors
    ///
    /// `Encoding` if the value cannot be represented as JSON.
    pub fn put<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> Result<(), ResolutionError> {
        let encoded = serde_json::to_value(value).map_err(|e| ResolutionError::encoding(name, e))?;
        self.attributes.insert(name.to_string(), encoded);
        Ok(())
    }

    /// Write a plain value when present
    ///
    /// # Errors
    ///
    /// `Encoding` if the value cannot be represented as JSON.
    pub fn put_optional<T: Serialize>(&mut self, name: &str, value: Option<&T>) -> Result<(), ResolutionError> {
        value.map_or(Ok(()), |v| self.put(name, v))
    }

    /// Write an identifier in its canonical string form
    pub fn put_id<T: Display>(&mut self, name: &str, value: &T) {
        self.attributes
            .insert(name.to_string(), Value::String(value.to_string()));
    }

    /// Write an identifier when present
    pub fn put_optional_id<T: Display>(&mut self, name: &str, value: Option<&T>) {
        if let Some(value) = value {
            self.put_id(name, value);
        }
    }

    /// Write a list of identifiers when present
    pub fn put_optional_ids<T: Display>(&mut self, name: &str, values: Option<&[T]>) {
        if let Some(values) = values {
            let items = values.iter().map(|v| Value::String(v.to_string())).collect();
            self.attributes.insert(name.to_string(), Value::Array(items));
        }
    }

    /// Write an integer as a decimal string
    pub fn put_decimal<T: Display>(&mut self, name: &str, value: T) {
        self.attributes
            .insert(name.to_string(), Value::String(value.to_string()));
    }

    /// Write an integer as a decimal string when present
    pub fn put_optional_decimal<T: Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.put_decimal(name, value);
        }
    }

    /// Write a nested variant, discriminator included
    ///
    /// # Errors
    ///
    /// Any error raised while materializing the variant.
    pub fn put_variant<F: VariantFamily>(&mut self, name: &str, value: &F) -> Result<(), ResolutionError> {
        let encoded = resolver::to_value(value)?;
        self.attributes.insert(name.to_string(), encoded);
        Ok(())
    }

    /// Write a nested variant when present
    ///
    /// # Errors
    ///
    /// Any error raised while materializing the variant.
    pub fn put_optional_variant<F: VariantFamily>(
        &mut self,
        name: &str,
        value: Option<&F>,
    ) -> Result<(), ResolutionError> {
        value.map_or(Ok(()), |v| self.put_variant(name, v))
    }

    /// Write a list of nested variants when present
    ///
    /// # Errors
    ///
    /// Any error raised while materializing an element.
    pub fn put_optional_variants<F: VariantFamily>(
        &mut self,
        name: &str,
        values: Option<&[F]>,
    ) -> Result<(), ResolutionError> {
        let Some(values) = values else {
            return Ok(());
        };
        let items = values
            .iter()
            .map(resolver::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.attributes.insert(name.to_string(), Value::Array(items));
        Ok(())
    }

    /// Write an embedded record
    ///
    /// # Errors
    ///
    /// Any error raised while writing the record.
    pub fn put_record<R: WireRecord>(&mut self, name: &str, value: &R) -> Result<(), ResolutionError> {
        let encoded = record_value(value)?;
        self.attributes.insert(name.to_string(), encoded);
        Ok(())
    }

    /// Write an embedded record when present
    ///
    /// # Errors
    ///
    /// Any error raised while writing the record.
    pub fn put_optional_record<R: WireRecord>(
        &mut self,
        name: &str,
        value: Option<&R>,
    ) -> Result<(), ResolutionError> {
        value.map_or(Ok(()), |value| self.put_record(name, value))
    }

    /// Write a list of embedded records when present
    ///
    /// # Errors
    ///
    /// Any error raised while writing an element.
    pub fn put_optional_records<R: WireRecord>(
        &mut self,
        name: &str,
        values: Option<&[R]>,
    ) -> Result<(), ResolutionError> {
        let Some(values) = values else {
            return Ok(());
        };
        let items = values
            .iter()
            .map(record_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.attributes.insert(name.to_string(), Value::Array(items));
        Ok(())
    }

    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.attributes
    }
}

fn record_value<R: WireRecord>(record: &R) -> Result<Value, ResolutionError> {
    resolver::record_to_value(record)
}
