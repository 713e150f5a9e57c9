//! Cluster events as returned by the event store.
//!
//! Every event carries an instance id and timestamp; the rest depends on the
//! entity it is about. Entity ids are flattened names (`shop~cart`), so an
//! event can be correlated with a [`HierarchicalName`] through
//! [`HierarchicalName::flat_id`] and back.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    health::HealthState,
    identifiers::{HierarchicalName, IdentifierError, NodeName, PartitionId, ReplicaId},
    variant::{variant_family, wire_record},
};

wire_record! {
    /// Attributes every event carries.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct FabricEventCommon {
        required event_instance_id: Uuid = "EventInstanceId",
        required time_stamp: DateTime<Utc> = "TimeStamp",
        optional category: Option<String> = "Category",
        optional has_correlated_events: Option<bool> = "HasCorrelatedEvents",
    }
}

impl FabricEventCommon {
    #[must_use]
    pub const fn new(event_instance_id: Uuid, time_stamp: DateTime<Utc>) -> Self {
        Self {
            event_instance_id,
            time_stamp,
            category: None,
            has_correlated_events: None,
        }
    }
}

wire_record! {
    /// The report carried by a health-report event.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct HealthReportDetails {
        required source_id: String = "SourceId",
        required property: String = "Property",
        required health_state: HealthState = "HealthState",
        optional_decimal time_to_live_ms: Option<i64> = "TimeToLiveMs",
        optional_decimal sequence_number: Option<i64> = "SequenceNumber",
        optional description: Option<String> = "Description",
        optional remove_when_expired: Option<bool> = "RemoveWhenExpired",
        optional source_utc_timestamp: Option<DateTime<Utc>> = "SourceUtcTimestamp",
    }
}

impl HealthReportDetails {
    #[must_use]
    pub fn new(source_id: impl Into<String>, property: impl Into<String>, health_state: HealthState) -> Self {
        Self {
            source_id: source_id.into(),
            property: property.into(),
            health_state,
            time_to_live_ms: None,
            sequence_number: None,
            description: None,
            remove_when_expired: None,
            source_utc_timestamp: None,
        }
    }
}

// ============================================================================
// APPLICATION EVENTS
// ============================================================================

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ApplicationCreatedEvent {
        flatten common: FabricEventCommon,
        required application_id: String = "ApplicationId",
        required application_type_name: String = "ApplicationTypeName",
        required application_type_version: String = "ApplicationTypeVersion",
        optional application_definition_kind: Option<String> = "ApplicationDefinitionKind",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ApplicationDeletedEvent {
        flatten common: FabricEventCommon,
        required application_id: String = "ApplicationId",
        required application_type_name: String = "ApplicationTypeName",
        required application_type_version: String = "ApplicationTypeVersion",
    }
}

// ============================================================================
// NODE EVENTS
// ============================================================================

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NodeUpEvent {
        flatten common: FabricEventCommon,
        id node_name: NodeName = "NodeName",
        decimal node_instance: i64 = "NodeInstance",
        optional node_id: Option<String> = "NodeId",
        optional ip_address_or_fqdn: Option<String> = "IpAddressOrFQDN",
        optional last_node_down_at: Option<DateTime<Utc>> = "LastNodeDownAt",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct NodeDownEvent {
        flatten common: FabricEventCommon,
        id node_name: NodeName = "NodeName",
        decimal node_instance: i64 = "NodeInstance",
        optional last_node_up_at: Option<DateTime<Utc>> = "LastNodeUpAt",
    }
}

// ============================================================================
// HEALTH REPORT EVENTS
// ============================================================================

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PartitionNewHealthReportEvent {
        flatten common: FabricEventCommon,
        id partition_id: PartitionId = "PartitionId",
        flatten report: HealthReportDetails,
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct StatefulReplicaNewHealthReportEvent {
        flatten common: FabricEventCommon,
        id partition_id: PartitionId = "PartitionId",
        id replica_id: ReplicaId = "ReplicaId",
        flatten report: HealthReportDetails,
    }
}

// ============================================================================
// SERVICE EVENTS
// ============================================================================

wire_record! {
    /// Attributes shared by service lifecycle events.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServiceEventDetails {
        required service_id: String = "ServiceId",
        id service_name: HierarchicalName = "ServiceName",
        required service_type_name: String = "ServiceTypeName",
        optional_id application_name: Option<HierarchicalName> = "ApplicationName",
        optional application_type_name: Option<String> = "ApplicationTypeName",
        decimal service_instance: i64 = "ServiceInstance",
        required is_stateful: bool = "IsStateful",
        required partition_count: i32 = "PartitionCount",
        optional target_replica_set_size: Option<i32> = "TargetReplicaSetSize",
        optional min_replica_set_size: Option<i32> = "MinReplicaSetSize",
        optional service_package_version: Option<String> = "ServicePackageVersion",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServiceCreatedEvent {
        flatten common: FabricEventCommon,
        flatten service: ServiceEventDetails,
        optional_id partition_id: Option<PartitionId> = "PartitionId",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServiceDeletedEvent {
        flatten common: FabricEventCommon,
        flatten service: ServiceEventDetails,
    }
}

// ============================================================================
// CLUSTER EVENTS
// ============================================================================

wire_record! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ClusterUpgradeStartedEvent {
        flatten common: FabricEventCommon,
        optional current_cluster_version: Option<String> = "CurrentClusterVersion",
        required target_cluster_version: String = "TargetClusterVersion",
        optional upgrade_type: Option<String> = "UpgradeType",
        optional rolling_upgrade_mode: Option<String> = "RollingUpgradeMode",
        optional failure_action: Option<String> = "FailureAction",
    }
}

wire_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct ClusterUpgradeCompletedEvent {
        flatten common: FabricEventCommon,
        required target_cluster_version: String = "TargetClusterVersion",
        optional overall_upgrade_elapsed_time_in_ms: Option<f64> = "OverallUpgradeElapsedTimeInMs",
    }
}

variant_family! {
    /// An event from the cluster event store, selected by `Kind`.
    pub enum FabricEvent: FabricEventKind {
        family = "FabricEvent",
        field = "Kind",
        ApplicationCreated(ApplicationCreatedEvent),
        ApplicationDeleted(ApplicationDeletedEvent),
        NodeUp(NodeUpEvent),
        NodeDown(NodeDownEvent),
        PartitionNewHealthReport(PartitionNewHealthReportEvent),
        StatefulReplicaNewHealthReport(StatefulReplicaNewHealthReportEvent),
        ServiceCreated(ServiceCreatedEvent),
        ServiceDeleted(ServiceDeletedEvent),
        ClusterUpgradeStarted(ClusterUpgradeStartedEvent),
        ClusterUpgradeCompleted(ClusterUpgradeCompletedEvent),
    }
}

impl FabricEvent {
    #[must_use]
    pub fn common(&self) -> &FabricEventCommon {
        match self {
            Self::ApplicationCreated(event) => &event.common,
            Self::ApplicationDeleted(event) => &event.common,
            Self::NodeUp(event) => &event.common,
            Self::NodeDown(event) => &event.common,
            Self::PartitionNewHealthReport(event) => &event.common,
            Self::StatefulReplicaNewHealthReport(event) => &event.common,
            Self::ServiceCreated(event) => &event.common,
            Self::ServiceDeleted(event) => &event.common,
            Self::ClusterUpgradeStarted(event) => &event.common,
            Self::ClusterUpgradeCompleted(event) => &event.common,
        }
    }

    #[must_use]
    pub fn time_stamp(&self) -> DateTime<Utc> {
        self.common().time_stamp
    }

    /// Flattened id of the application an application event is about
    #[must_use]
    pub fn application_id(&self) -> Option<&str> {
        match self {
            Self::ApplicationCreated(event) => Some(&event.application_id),
            Self::ApplicationDeleted(event) => Some(&event.application_id),
            _ => None,
        }
    }

    /// The application an application event is about, rebuilt from its id
    ///
    /// # Errors
    ///
    /// Returns `IdentifierError` if the id does not rebuild into a valid name.
    pub fn application_name(&self) -> Option<Result<HierarchicalName, IdentifierError>> {
        self.application_id().map(HierarchicalName::from_flat_id)
    }

    /// The health report a health-report event carries
    #[must_use]
    pub fn health_report(&self) -> Option<&HealthReportDetails> {
        match self {
            Self::PartitionNewHealthReport(event) => Some(&event.report),
            Self::StatefulReplicaNewHealthReport(event) => Some(&event.report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::variant::{resolve_value, to_value, ResolutionError};

    #[test]
    fn test_application_event_correlates_by_flat_id() -> crate::Result<()> {
        let payload = json!({
            "Kind": "ApplicationCreated",
            "EventInstanceId": "6b2e0a58-4a8c-4d2c-9f1e-3c8f0e9a7d11",
            "TimeStamp": "2026-03-01T12:00:00Z",
            "Category": "Operational",
            "HasCorrelatedEvents": false,
            "ApplicationId": "shop~cart",
            "ApplicationTypeName": "ShopType",
            "ApplicationTypeVersion": "1.0.0",
            "ApplicationDefinitionKind": "ServiceFabricApplicationDescription",
        });
        let event: FabricEvent = resolve_value(&payload)?;
        let name = event.application_name().transpose()?;
        assert_eq!(name, Some(HierarchicalName::parse("fabric:/shop/cart")?));
        assert_eq!(to_value(&event)?, payload);
        Ok(())
    }

    #[test]
    fn test_replica_health_report() -> Result<(), ResolutionError> {
        let payload = json!({
            "Kind": "StatefulReplicaNewHealthReport",
            "EventInstanceId": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "TimeStamp": "2026-03-01T12:00:00Z",
            "PartitionId": "1b4d9f4e-2f4c-4d4b-8c1e-5e6f7a8b9c0d",
            "ReplicaId": "131998743250839219",
            "SourceId": "System.RA",
            "Property": "ReplicaOpenStatus",
            "HealthState": "Warning",
            "TimeToLiveMs": "9223372036854775807",
            "SequenceNumber": "131998743250839300",
        });
        let event: FabricEvent = resolve_value(&payload)?;
        let report = event.health_report();
        assert_eq!(report.map(|r| r.health_state), Some(HealthState::Warning));
        assert_eq!(report.and_then(|r| r.time_to_live_ms), Some(i64::MAX));
        assert_eq!(event.application_id(), None);
        assert_eq!(to_value(&event)?, payload);
        Ok(())
    }

    #[test]
    fn test_event_requires_instance_id() {
        let result = resolve_value::<FabricEvent>(&json!({
            "Kind": "NodeDown",
            "TimeStamp": "2026-03-01T12:00:00Z",
            "NodeName": "_Node_4",
            "NodeInstance": "1",
        }));
        assert_eq!(result, Err(ResolutionError::missing_field("EventInstanceId")));
    }

    #[test]
    fn test_service_created_flattens_details() -> Result<(), ResolutionError> {
        let payload = json!({
            "Kind": "ServiceCreated",
            "EventInstanceId": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "TimeStamp": "2026-03-01T12:00:00Z",
            "ServiceId": "shop~cart",
            "ServiceName": "fabric:/shop/cart",
            "ServiceTypeName": "CartType",
            "ApplicationName": "fabric:/shop",
            "ServiceInstance": "131998743250839219",
            "IsStateful": true,
            "PartitionCount": 2,
            "TargetReplicaSetSize": 3,
            "MinReplicaSetSize": 2,
        });
        let event: FabricEvent = resolve_value(&payload)?;
        let FabricEvent::ServiceCreated(created) = &event else {
            return Err(ResolutionError::invalid_field("Kind", "expected ServiceCreated"));
        };
        assert_eq!(created.service.service_name.flat_id(), created.service.service_id);
        assert_eq!(to_value(&event)?, payload);
        Ok(())
    }
}
