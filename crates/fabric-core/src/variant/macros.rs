//! Declaration macro for discriminated variant families.
//!
//! # Example
//!
//! ```rust,ignore
//! variant_family! {
//!     /// A trigger that drives auto-scaling
//!     pub enum ScalingTriggerDescription: ScalingTriggerKind {
//!         family = "ScalingTriggerDescription",
//!         field = "Kind",
//!         AveragePartitionLoad(AveragePartitionLoadScalingTrigger),
//!         AverageServiceLoad(AverageServiceLoadScalingTrigger),
//!     }
//! }
//! ```
//!
//! expands to:
//! - a `ScalingTriggerKind` enum with an `Invalid` sentinel plus one tag per
//!   variant, whose wire names are the tag identifiers
//! - a `ScalingTriggerDescription` enum holding each record boxed
//! - `kind()`, `From<Record>` for each record and the `VariantFamily` impl
//!   dispatching to each record's `WireRecord` impl
//! - serde impls that route through the resolver, so the family nests inside
//!   ordinary serde-derived structs
//!
//! Concrete variants are usually declared with `wire_record!`, which pairs
//! each field with the accessor that reads and writes it:
//!
//! ```rust,ignore
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub struct NodeRepairTargetDescription {
//!         optional_ids node_names: Option<Vec<NodeName>> = "NodeNames",
//!     }
//! }
//! ```

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

/// Declare a discriminated family and its discriminator enum.
///
/// Every record named must implement `WireRecord`. Records must be distinct
/// types so each gets its own `From` impl.
macro_rules! variant_family {
    (
        $(#[$family_meta:meta])*
        $vis:vis enum $family:ident : $kind:ident {
            family = $family_name:literal,
            field = $field:literal,
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($record:ty)
            ),+ $(,)?
        }
    ) => {
        #[doc = concat!("Discriminator for [`", stringify!($family), "`], serialized under `", $field, "`")]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::strum::EnumString,
            ::strum::Display,
            ::strum::IntoStaticStr,
            ::strum::VariantArray,
        )]
        $vis enum $kind {
            /// Unset discriminator; never resolves
            Invalid,
            $(
                #[doc = concat!("Selects [`", stringify!($family), "::", stringify!($variant), "`]")]
                $variant,
            )+
        }

        impl $crate::variant::Discriminator for $kind {
            const INVALID: Self = Self::Invalid;

            fn variants() -> &'static [Self] {
                <Self as ::strum::VariantArray>::VARIANTS
            }
        }

        $(#[$family_meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $family {
            $(
                $(#[$variant_meta])*
                $variant(::std::boxed::Box<$record>),
            )+
        }

        impl $family {
            /// The discriminator this variant carries on the wire
            #[must_use]
            pub const fn kind(&self) -> $kind {
                match self {
                    $(Self::$variant(_) => $kind::$variant,)+
                }
            }
        }

        $(
            impl ::std::convert::From<$record> for $family {
                fn from(record: $record) -> Self {
                    Self::$variant(::std::boxed::Box::new(record))
                }
            }
        )+

        impl $crate::variant::VariantFamily for $family {
            type Kind = $kind;

            const FAMILY: &'static str = $family_name;
            const KIND_FIELD: &'static str = $field;

            fn kind(&self) -> $kind {
                Self::kind(self)
            }

            fn construct(
                kind: $kind,
                reader: &mut $crate::variant::AttributeReader<'_>,
            ) -> ::std::result::Result<Self, $crate::variant::ResolutionError> {
                match kind {
                    $(
                        $kind::$variant => {
                            <$record as $crate::variant::WireRecord>::read(reader)
                                .map(|record| Self::$variant(::std::boxed::Box::new(record)))
                        }
                    )+
                    $kind::Invalid => ::std::result::Result::Err(
                        $crate::variant::ResolutionError::missing_discriminator(
                            $family_name,
                            reader.field_path($field),
                        ),
                    ),
                }
            }

            fn write_variant(
                &self,
                writer: &mut $crate::variant::AttributeWriter,
            ) -> ::std::result::Result<(), $crate::variant::ResolutionError> {
                match self {
                    $(
                        Self::$variant(record) => {
                            <$record as $crate::variant::WireRecord>::write(record, writer)
                        }
                    )+
                }
            }
        }

        impl ::serde::Serialize for $family {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                let value = $crate::variant::to_value(self).map_err(::serde::ser::Error::custom)?;
                ::serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $family {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                $crate::variant::resolve_value(&value).map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Declare a record and its `WireRecord` impl from per-field accessors.
///
/// Accessors:
/// - `required`, `optional`: plain serde values
/// - `id`, `optional_id`, `optional_ids`: identifiers, keeping their errors
/// - `decimal`, `optional_decimal`: integers carried as decimal strings
/// - `percent`: optional percentage checked against `[0, 100]`
/// - `variant`, `optional_variant`, `optional_variants`: nested families
/// - `record`, `optional_record`, `optional_records`: embedded records
/// - `flatten`: a record whose attributes sit at this level; takes no name
///
/// A trailing `validate = path;` runs `path(&record)` after reading and
/// before writing.
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $access:ident $field:ident : $ty:ty $(= $wire:literal)?
            ),+ $(,)?
        }
        $(validate = $validate:path;)?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )+
        }

        impl $crate::variant::WireRecord for $name {
            fn read(
                reader: &mut $crate::variant::AttributeReader<'_>,
            ) -> ::std::result::Result<Self, $crate::variant::ResolutionError> {
                let record = Self {
                    $($field: $crate::variant::wire_record!(@read $access reader $($wire)?),)+
                };
                $($validate(&record)?;)?
                ::std::result::Result::Ok(record)
            }

            fn write(
                &self,
                writer: &mut $crate::variant::AttributeWriter,
            ) -> ::std::result::Result<(), $crate::variant::ResolutionError> {
                $($validate(self)?;)?
                $($crate::variant::wire_record!(@write $access writer self.$field $(, $wire)?);)+
                ::std::result::Result::Ok(())
            }
        }
    };

    (@read flatten $reader:ident) => { $crate::variant::WireRecord::read($reader)? };
    (@read required $reader:ident $wire:literal) => { $reader.required($wire)? };
    (@read optional $reader:ident $wire:literal) => { $reader.optional($wire)? };
    (@read id $reader:ident $wire:literal) => { $reader.required_id($wire)? };
    (@read optional_id $reader:ident $wire:literal) => { $reader.optional_id($wire)? };
    (@read optional_ids $reader:ident $wire:literal) => { $reader.optional_ids($wire)? };
    (@read decimal $reader:ident $wire:literal) => { $reader.required_decimal($wire)? };
    (@read optional_decimal $reader:ident $wire:literal) => { $reader.optional_decimal($wire)? };
    (@read percent $reader:ident $wire:literal) => { $reader.optional_percentage($wire)? };
    (@read variant $reader:ident $wire:literal) => { $reader.variant($wire)? };
    (@read optional_variant $reader:ident $wire:literal) => { $reader.optional_variant($wire)? };
    (@read optional_variants $reader:ident $wire:literal) => { $reader.optional_variants($wire)? };
    (@read record $reader:ident $wire:literal) => { $reader.required_record($wire)? };
    (@read optional_record $reader:ident $wire:literal) => { $reader.optional_record($wire)? };
    (@read optional_records $reader:ident $wire:literal) => { $reader.optional_records($wire)? };

    (@write flatten $writer:ident $value:expr) => {
        $crate::variant::WireRecord::write(&$value, $writer)?
    };
    (@write required $writer:ident $value:expr, $wire:literal) => { $writer.put($wire, &$value)? };
    (@write optional $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional($wire, $value.as_ref())?
    };
    (@write id $writer:ident $value:expr, $wire:literal) => { $writer.put_id($wire, &$value) };
    (@write optional_id $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_id($wire, $value.as_ref())
    };
    (@write optional_ids $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_ids($wire, $value.as_deref())
    };
    (@write decimal $writer:ident $value:expr, $wire:literal) => { $writer.put_decimal($wire, &$value) };
    (@write optional_decimal $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_decimal($wire, $value.as_ref())
    };
    (@write percent $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional($wire, $value.as_ref())?
    };
    (@write variant $writer:ident $value:expr, $wire:literal) => { $writer.put_variant($wire, &$value)? };
    (@write optional_variant $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_variant($wire, $value.as_ref())?
    };
    (@write optional_variants $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_variants($wire, $value.as_deref())?
    };
    (@write record $writer:ident $value:expr, $wire:literal) => { $writer.put_record($wire, &$value)? };
    (@write optional_record $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_record($wire, $value.as_ref())?
    };
    (@write optional_records $writer:ident $value:expr, $wire:literal) => {
        $writer.put_optional_records($wire, $value.as_deref())?
    };
}

pub(crate) use variant_family;
pub(crate) use wire_record;
