//! Serde adapters for wire conventions.
//!
//! Integers that may exceed 32 bits travel as decimal strings. Lenient
//! producers sometimes send them as JSON numbers, so both are accepted on
//! input; output is always the string form.
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Status {
//!     #[serde(
//!         default,
//!         with = "fabric_core::wire::decimal_option",
//!         skip_serializing_if = "Option::is_none"
//!     )]
//!     last_sequence_number: Option<i64>,
//! }
//! ```

use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Text(String),
    Number(serde_json::Number),
}

impl Decimal {
    fn parse<T, E>(self) -> Result<T, E>
    where
        T: FromStr,
        T::Err: Display,
        E: de::Error,
    {
        match self {
            Self::Text(text) => text.trim().parse(),
            Self::Number(number) => number.to_string().parse(),
        }
        .map_err(|e| E::custom(format!("invalid decimal: {e}")))
    }
}

/// An optional integer carried as a decimal string; pair with
/// `#[serde(default, skip_serializing_if = "Option::is_none")]`.
pub mod decimal_option {
    use super::{Decimal, Deserialize, Deserializer, Display, FromStr, Serialize, Serializer};

    /// # Errors
    ///
    /// Propagates the serializer's error.
    #[allow(clippy::ref_option)]
    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        value.as_ref().map(ToString::to_string).serialize(serializer)
    }

    /// # Errors
    ///
    /// Fails when a present value is not a valid decimal for `T`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        Option::<Decimal>::deserialize(deserializer)?
            .map(Decimal::parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Sample {
        #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
        sequence_number: Option<i64>,
        #[serde(default, with = "decimal_option", skip_serializing_if = "Option::is_none")]
        interval_in_seconds: Option<u64>,
    }

    #[test]
    fn test_decimal_strings_round_trip() -> Result<(), serde_json::Error> {
        let payload = json!({ "SequenceNumber": "-42", "IntervalInSeconds": "4294967295" });
        let sample: Sample = serde_json::from_value(payload.clone())?;
        assert_eq!(
            sample,
            Sample {
                sequence_number: Some(-42),
                interval_in_seconds: Some(4_294_967_295),
            }
        );
        assert_eq!(serde_json::to_value(&sample)?, payload);
        Ok(())
    }

    #[test]
    fn test_numbers_are_accepted_and_written_as_strings() -> Result<(), serde_json::Error> {
        let sample: Sample = serde_json::from_value(json!({ "SequenceNumber": 7 }))?;
        assert_eq!(sample.sequence_number, Some(7));
        assert_eq!(sample.interval_in_seconds, None);
        assert_eq!(
            serde_json::to_value(&sample)?,
            json!({ "SequenceNumber": "7" })
        );
        Ok(())
    }

    #[test]
    fn test_absent_and_null_are_none() -> Result<(), serde_json::Error> {
        let sample: Sample = serde_json::from_value(json!({ "IntervalInSeconds": null }))?;
        assert_eq!(
            sample,
            Sample {
                sequence_number: None,
                interval_in_seconds: None,
            }
        );
        assert_eq!(serde_json::to_value(&sample)?, json!({}));
        Ok(())
    }

    #[test]
    fn test_garbage_is_rejected() {
        let result = serde_json::from_value::<Sample>(json!({ "SequenceNumber": "seven" }));
        assert!(result.is_err_and(|e| e.to_string().contains("invalid decimal")));
    }
}
