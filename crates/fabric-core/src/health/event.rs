//! Health reports as stored by the health store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::HealthState;
use crate::wire;

/// A single health report about an entity.
///
/// Embedded by `EventHealthEvaluation` as the event that made an entity
/// unhealthy, and carried by the health-report fabric events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthEvent {
    /// Watchdog or system component that generated the report
    pub source_id: String,
    /// Category of the reported information
    pub property: String,
    pub health_state: HealthState,
    /// ISO 8601 duration; absent means the report never expires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live_in_milli_seconds: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "wire::decimal_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub sequence_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_when_expired: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_utc_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_utc_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ok_transition_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_warning_transition_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error_transition_at: Option<DateTime<Utc>>,
}

impl HealthEvent {
    /// A report with only its identifying attributes set
    #[must_use]
    pub fn new(source_id: impl Into<String>, property: impl Into<String>, health_state: HealthState) -> Self {
        Self {
            source_id: source_id.into(),
            property: property.into(),
            health_state,
            time_to_live_in_milli_seconds: None,
            description: None,
            sequence_number: None,
            remove_when_expired: None,
            is_expired: None,
            source_utc_timestamp: None,
            last_modified_utc_timestamp: None,
            last_ok_transition_at: None,
            last_warning_transition_at: None,
            last_error_transition_at: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_sequence_number(mut self, sequence_number: i64) -> Self {
        self.sequence_number = Some(sequence_number);
        self
    }

    /// Whether the report has expired; unset means it has not
    #[must_use]
    pub fn has_expired(&self) -> bool {
        self.is_expired.unwrap_or(false)
    }
}
