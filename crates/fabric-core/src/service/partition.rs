//! How a service's key space is split into partitions.

use crate::{
    validation::{require_at_least, require_in_inclusive_range, require_not_null, ValidationError},
    variant::{
        variant_family, wire_record, AttributeReader, AttributeWriter, ResolutionError, WireRecord,
    },
};

/// A single partition covering the whole service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingletonPartitionSchemeDescription;

impl WireRecord for SingletonPartitionSchemeDescription {
    fn read(_: &mut AttributeReader<'_>) -> Result<Self, ResolutionError> {
        Ok(Self)
    }

    fn write(&self, _: &mut AttributeWriter) -> Result<(), ResolutionError> {
        Ok(())
    }
}

wire_record! {
    /// `Count` partitions evenly dividing the `[LowKey, HighKey]` range.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct UniformInt64RangePartitionSchemeDescription {
        required count: i32 = "Count",
        decimal low_key: i64 = "LowKey",
        decimal high_key: i64 = "HighKey",
    }
    validate = Self::validate;
}

impl UniformInt64RangePartitionSchemeDescription {
    /// # Errors
    ///
    /// Returns `OutOfRange` if `count < 1` or `low_key > high_key`.
    pub fn new(count: i32, low_key: i64, high_key: i64) -> Result<Self, ValidationError> {
        let scheme = Self {
            count,
            low_key,
            high_key,
        };
        scheme.validate()?;
        Ok(scheme)
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `count < 1` or `low_key > high_key`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_at_least(self.count, "Count", 1)?;
        require_in_inclusive_range(self.low_key, "LowKey", i64::MIN, self.high_key)?;
        Ok(())
    }
}

wire_record! {
    /// One partition per name.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NamedPartitionSchemeDescription {
        required count: i32 = "Count",
        required names: Vec<String> = "Names",
    }
    validate = Self::validate;
}

impl NamedPartitionSchemeDescription {
    /// A scheme with one partition per entry of `names`
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `names` is empty or too long to count.
    pub fn new(names: Vec<String>) -> Result<Self, ValidationError> {
        let count = i32::try_from(names.len())
            .map_err(|_| ValidationError::out_of_range("Names", names.len(), None, None))?;
        let scheme = Self { count, names };
        scheme.validate()?;
        Ok(scheme)
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` if `count < 1` or `names` does not hold exactly
    /// `count` entries.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let count = require_at_least(self.count, "Count", 1)?;
        let expected = require_not_null(usize::try_from(count).ok(), "Count")?;
        require_in_inclusive_range(self.names.len(), "Names", expected, expected)?;
        Ok(())
    }
}

variant_family! {
    /// Partitioning scheme of a service, selected by `PartitionScheme`.
    pub enum PartitionSchemeDescription: PartitionScheme {
        family = "PartitionSchemeDescription",
        field = "PartitionScheme",
        Singleton(SingletonPartitionSchemeDescription),
        UniformInt64Range(UniformInt64RangePartitionSchemeDescription),
        Named(NamedPartitionSchemeDescription),
    }
}

impl PartitionSchemeDescription {
    /// Number of partitions the scheme creates
    #[must_use]
    pub fn partition_count(&self) -> i32 {
        match self {
            Self::Singleton(_) => 1,
            Self::UniformInt64Range(scheme) => scheme.count,
            Self::Named(scheme) => scheme.count,
        }
    }
}
