//! Replicas and the replication status each one reports.
//!
//! `ReplicaInfo` is what a partition's replica list returns. `ReplicatorStatus`
//! is the replicator's view from inside a stateful replica: a primary tracks
//! its remote secondaries, a secondary tracks what it has received.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    health::HealthState,
    identifiers::{NodeName, ReplicaId},
    validation::{check_optional, require_percentage, ValidationError},
    variant::{variant_family, wire_record},
};

/// Lifecycle status of a replica or instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ReplicaStatus {
    Invalid,
    InBuild,
    Standby,
    Ready,
    Down,
    Dropped,
}

/// Role of a stateful replica in its replica set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ReplicaRole {
    Unknown,
    None,
    Primary,
    IdleSecondary,
    ActiveSecondary,
}

impl ReplicaRole {
    #[must_use]
    pub const fn is_secondary(self) -> bool {
        matches!(self, Self::IdleSecondary | Self::ActiveSecondary)
    }
}

// ============================================================================
// REPLICA INFO
// ============================================================================

wire_record! {
    /// Attributes shared by replicas and instances.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ReplicaInfoCommon {
        optional replica_status: Option<ReplicaStatus> = "ReplicaStatus",
        optional health_state: Option<HealthState> = "HealthState",
        id node_name: NodeName = "NodeName",
        /// Endpoint the replica listens on
        optional address: Option<String> = "Address",
        optional_decimal last_in_build_duration_in_seconds: Option<u64> = "LastInBuildDurationInSeconds",
    }
}

impl ReplicaInfoCommon {
    #[must_use]
    pub const fn new(node_name: NodeName) -> Self {
        Self {
            replica_status: None,
            health_state: None,
            node_name,
            address: None,
            last_in_build_duration_in_seconds: None,
        }
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatefulReplicaInfo {
        flatten common: ReplicaInfoCommon,
        optional replica_role: Option<ReplicaRole> = "ReplicaRole",
        id replica_id: ReplicaId = "ReplicaId",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatelessReplicaInfo {
        flatten common: ReplicaInfoCommon,
        id instance_id: ReplicaId = "InstanceId",
    }
}

variant_family! {
    /// A replica (stateful) or instance (stateless), selected by `ServiceKind`.
    pub enum ReplicaInfo: ReplicaKind {
        family = "ReplicaInfo",
        field = "ServiceKind",
        Stateful(StatefulReplicaInfo),
        Stateless(StatelessReplicaInfo),
    }
}

impl ReplicaInfo {
    #[must_use]
    pub fn common(&self) -> &ReplicaInfoCommon {
        match self {
            Self::Stateful(replica) => &replica.common,
            Self::Stateless(replica) => &replica.common,
        }
    }

    /// Replica id for stateful replicas, instance id for stateless ones
    #[must_use]
    pub fn id(&self) -> ReplicaId {
        match self {
            Self::Stateful(replica) => replica.replica_id,
            Self::Stateless(replica) => replica.instance_id,
        }
    }
}

// ============================================================================
// REPLICATOR STATUS
// ============================================================================

wire_record! {
    /// Occupancy of a replication or copy queue.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ReplicationQueueStatus {
        percent queue_utilization_percentage: Option<i32> = "QueueUtilizationPercentage",
        optional_decimal queue_memory_size: Option<u64> = "QueueMemorySize",
        optional_decimal first_sequence_number: Option<i64> = "FirstSequenceNumber",
        optional_decimal completed_sequence_number: Option<i64> = "CompletedSequenceNumber",
        optional_decimal committed_sequence_number: Option<i64> = "CommittedSequenceNumber",
        optional_decimal last_sequence_number: Option<i64> = "LastSequenceNumber",
    }
    validate = Self::validate;
}

impl ReplicationQueueStatus {
    /// # Errors
    ///
    /// Returns `OutOfRange` if the utilization leaves `[0, 100]`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_optional(self.queue_utilization_percentage, |p| {
            require_percentage(p, "QueueUtilizationPercentage")
        })?;
        Ok(())
    }

    /// Operations queued but not yet completed, when both ends are known
    #[must_use]
    pub fn pending_operations(&self) -> Option<i64> {
        let (Some(last), Some(completed)) = (self.last_sequence_number, self.completed_sequence_number)
        else {
            return None;
        };
        Some(last.saturating_sub(completed).max(0))
    }
}

wire_record! {
    /// What the primary knows about one of its secondaries.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RemoteReplicatorStatus {
        id replica_id: ReplicaId = "ReplicaId",
        optional last_acknowledgement_processed_time_utc: Option<DateTime<Utc>> = "LastAcknowledgementProcessedTimeUtc",
        optional_decimal last_received_replication_sequence_number: Option<i64> = "LastReceivedReplicationSequenceNumber",
        optional_decimal last_applied_replication_sequence_number: Option<i64> = "LastAppliedReplicationSequenceNumber",
        optional is_in_build: Option<bool> = "IsInBuild",
        optional_decimal last_received_copy_sequence_number: Option<i64> = "LastReceivedCopySequenceNumber",
        optional_decimal last_applied_copy_sequence_number: Option<i64> = "LastAppliedCopySequenceNumber",
    }
}

impl RemoteReplicatorStatus {
    #[must_use]
    pub const fn new(replica_id: ReplicaId) -> Self {
        Self {
            replica_id,
            last_acknowledgement_processed_time_utc: None,
            last_received_replication_sequence_number: None,
            last_applied_replication_sequence_number: None,
            is_in_build: None,
            last_received_copy_sequence_number: None,
            last_applied_copy_sequence_number: None,
        }
    }
}

wire_record! {
    /// Replicator status of a primary replica.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PrimaryReplicatorStatus {
        optional_record replication_queue_status: Option<ReplicationQueueStatus> = "ReplicationQueueStatus",
        optional_records remote_replicators: Option<Vec<RemoteReplicatorStatus>> = "RemoteReplicators",
    }
}

wire_record! {
    /// Replicator status of a secondary, active or idle.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct SecondaryReplicatorStatus {
        optional_record replication_queue_status: Option<ReplicationQueueStatus> = "ReplicationQueueStatus",
        optional last_replication_operation_received_time_utc: Option<DateTime<Utc>> = "LastReplicationOperationReceivedTimeUtc",
        optional is_in_build: Option<bool> = "IsInBuild",
        optional_record copy_queue_status: Option<ReplicationQueueStatus> = "CopyQueueStatus",
        optional last_copy_operation_received_time_utc: Option<DateTime<Utc>> = "LastCopyOperationReceivedTimeUtc",
        optional last_acknowledgement_sent_time_utc: Option<DateTime<Utc>> = "LastAcknowledgementSentTimeUtc",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct ActiveSecondaryReplicatorStatus {
        flatten status: SecondaryReplicatorStatus,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct IdleSecondaryReplicatorStatus {
        flatten status: SecondaryReplicatorStatus,
    }
}

variant_family! {
    /// Replicator status by replica role, selected by `Kind`.
    pub enum ReplicatorStatus: ReplicatorStatusKind {
        family = "ReplicatorStatus",
        field = "Kind",
        Primary(PrimaryReplicatorStatus),
        ActiveSecondary(ActiveSecondaryReplicatorStatus),
        IdleSecondary(IdleSecondaryReplicatorStatus),
    }
}

impl ReplicatorStatus {
    /// The replication queue, whichever role reported it
    #[must_use]
    pub fn replication_queue_status(&self) -> Option<&ReplicationQueueStatus> {
        match self {
            Self::Primary(status) => status.replication_queue_status.as_ref(),
            Self::ActiveSecondary(status) => status.status.replication_queue_status.as_ref(),
            Self::IdleSecondary(status) => status.status.replication_queue_status.as_ref(),
        }
    }

    /// The role this status corresponds to
    #[must_use]
    pub const fn role(&self) -> ReplicaRole {
        match self {
            Self::Primary(_) => ReplicaRole::Primary,
            Self::ActiveSecondary(_) => ReplicaRole::ActiveSecondary,
            Self::IdleSecondary(_) => ReplicaRole::IdleSecondary,
        }
    }
}
