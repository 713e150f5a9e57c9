//! Periodic backup configuration: when backups run and where they go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    validation::{require_at_least, require_not_null, ValidationError},
    variant::{variant_family, wire_record},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum BackupScheduleFrequencyType {
    Invalid,
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

// ============================================================================
// SCHEDULES
// ============================================================================

wire_record! {
    /// Back up every `Interval`, an ISO 8601 duration such as `PT4H`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FrequencyBasedBackupScheduleDescription {
        required interval: String = "Interval",
    }
}

impl FrequencyBasedBackupScheduleDescription {
    #[must_use]
    pub fn new(interval: impl Into<String>) -> Self {
        Self {
            interval: interval.into(),
        }
    }
}

wire_record! {
    /// Back up at fixed times of day, every day or on chosen weekdays.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct TimeBasedBackupScheduleDescription {
        required schedule_frequency_type: BackupScheduleFrequencyType = "ScheduleFrequencyType",
        optional run_days: Option<Vec<DayOfWeek>> = "RunDays",
        /// Only the time-of-day part is significant
        required run_times: Vec<DateTime<Utc>> = "RunTimes",
    }
    validate = Self::validate;
}

impl TimeBasedBackupScheduleDescription {
    /// A schedule running every day at `run_times`
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `run_times` is empty.
    pub fn daily(run_times: Vec<DateTime<Utc>>) -> Result<Self, ValidationError> {
        let schedule = Self {
            schedule_frequency_type: BackupScheduleFrequencyType::Daily,
            run_days: None,
            run_times,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// A schedule running on `run_days` at `run_times`
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if either list is empty.
    pub fn weekly(run_days: Vec<DayOfWeek>, run_times: Vec<DateTime<Utc>>) -> Result<Self, ValidationError> {
        let schedule = Self {
            schedule_frequency_type: BackupScheduleFrequencyType::Weekly,
            run_days: Some(run_days),
            run_times,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// # Errors
    ///
    /// Returns `OutOfRange` for an `Invalid` frequency or an empty time list,
    /// and `NullArgument` or `OutOfRange` when a weekly schedule names no days.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.schedule_frequency_type == BackupScheduleFrequencyType::Invalid {
            return Err(ValidationError::out_of_range(
                "ScheduleFrequencyType",
                self.schedule_frequency_type,
                Some(BackupScheduleFrequencyType::Daily),
                Some(BackupScheduleFrequencyType::Weekly),
            ));
        }
        require_at_least(self.run_times.len(), "RunTimes", 1)?;
        if self.schedule_frequency_type == BackupScheduleFrequencyType::Weekly {
            let days = require_not_null(self.run_days.as_ref(), "RunDays")?;
            require_at_least(days.len(), "RunDays", 1)?;
        }
        Ok(())
    }
}

variant_family! {
    /// When backups are taken, selected by `ScheduleKind`.
    pub enum BackupScheduleDescription: BackupScheduleKind {
        family = "BackupScheduleDescription",
        field = "ScheduleKind",
        FrequencyBased(FrequencyBasedBackupScheduleDescription),
        TimeBased(TimeBasedBackupScheduleDescription),
    }
}

// ============================================================================
// STORAGE
// ============================================================================

wire_record! {
    /// Attributes shared by every backup store.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct BackupStorageCommon {
        optional friendly_name: Option<String> = "FriendlyName",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AzureBlobBackupStorageDescription {
        flatten common: BackupStorageCommon,
        required connection_string: String = "ConnectionString",
        required container_name: String = "ContainerName",
    }
}

impl AzureBlobBackupStorageDescription {
    #[must_use]
    pub fn new(connection_string: impl Into<String>, container_name: impl Into<String>) -> Self {
        Self {
            common: BackupStorageCommon::default(),
            connection_string: connection_string.into(),
            container_name: container_name.into(),
        }
    }
}

wire_record! {
    /// An SMB or local file share.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FileShareBackupStorageDescription {
        flatten common: BackupStorageCommon,
        required path: String = "Path",
        optional primary_user_name: Option<String> = "PrimaryUserName",
        optional primary_password: Option<String> = "PrimaryPassword",
        optional secondary_user_name: Option<String> = "SecondaryUserName",
        optional secondary_password: Option<String> = "SecondaryPassword",
    }
}

impl FileShareBackupStorageDescription {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            common: BackupStorageCommon::default(),
            path: path.into(),
            primary_user_name: None,
            primary_password: None,
            secondary_user_name: None,
            secondary_password: None,
        }
    }
}

variant_family! {
    /// Where backups are stored, selected by `StorageKind`.
    pub enum BackupStorageDescription: BackupStorageKind {
        family = "BackupStorageDescription",
        field = "StorageKind",
        AzureBlobStore(AzureBlobBackupStorageDescription),
        FileShare(FileShareBackupStorageDescription),
    }
}

impl BackupStorageDescription {
    #[must_use]
    pub fn friendly_name(&self) -> Option<&str> {
        match self {
            Self::AzureBlobStore(storage) => storage.common.friendly_name.as_deref(),
            Self::FileShare(storage) => storage.common.friendly_name.as_deref(),
        }
    }
}
