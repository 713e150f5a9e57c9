//! The `HealthEvaluation` family.
//!
//! A health evaluation explains why an entity's aggregated health state is
//! what it is. Aggregating variants (`Nodes`, `Partitions`, ...) list the
//! child evaluations that were unhealthy, each wrapped in a
//! [`HealthEvaluationWrapper`], forming a tree that mirrors the cluster's
//! entity hierarchy.

use super::{HealthEvent, HealthState};
use crate::{
    identifiers::{HierarchicalName, NodeName, PartitionId, ReplicaId},
    variant::{
        variant_family, wire_record, AttributeReader, AttributeWriter, ResolutionError, WireRecord,
    },
};

// ============================================================================
// SHARED ATTRIBUTES
// ============================================================================

/// Attributes every health evaluation carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthEvaluationCommon {
    pub aggregated_health_state: HealthState,
    pub description: Option<String>,
}

impl HealthEvaluationCommon {
    #[must_use]
    pub const fn new(aggregated_health_state: HealthState) -> Self {
        Self {
            aggregated_health_state,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl WireRecord for HealthEvaluationCommon {
    fn read(reader: &mut AttributeReader<'_>) -> Result<Self, ResolutionError> {
        Ok(Self {
            aggregated_health_state: reader.required("AggregatedHealthState")?,
            description: reader.optional("Description")?,
        })
    }

    fn write(&self, writer: &mut AttributeWriter) -> Result<(), ResolutionError> {
        writer.put("AggregatedHealthState", &self.aggregated_health_state)?;
        writer.put_optional("Description", self.description.as_ref())
    }
}

/// Uniform view over the concrete evaluation records.
pub trait HealthEvaluationRecord {
    fn common(&self) -> &HealthEvaluationCommon;

    /// Child evaluations that contributed to this one; empty for leaves
    fn unhealthy_evaluations(&self) -> &[HealthEvaluationWrapper];
}

/// Container placing one evaluation in its parent's `UnhealthyEvaluations`.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthEvaluationWrapper {
    pub health_evaluation: HealthEvaluation,
}

impl HealthEvaluationWrapper {
    #[must_use]
    pub const fn new(health_evaluation: HealthEvaluation) -> Self {
        Self { health_evaluation }
    }
}

impl From<HealthEvaluation> for HealthEvaluationWrapper {
    fn from(health_evaluation: HealthEvaluation) -> Self {
        Self::new(health_evaluation)
    }
}

impl WireRecord for HealthEvaluationWrapper {
    fn read(reader: &mut AttributeReader<'_>) -> Result<Self, ResolutionError> {
        Ok(Self {
            health_evaluation: reader.variant("HealthEvaluation")?,
        })
    }

    fn write(&self, writer: &mut AttributeWriter) -> Result<(), ResolutionError> {
        writer.put_variant("HealthEvaluation", &self.health_evaluation)
    }
}

// ============================================================================
// RECORD DECLARATIONS
// ============================================================================

/// Declares an evaluation record carrying the shared attributes, the listed
/// fields and optional `UnhealthyEvaluations`.
macro_rules! evaluation_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $($access:ident $field:ident : $ty:ty = $wire:literal),* $(,)?
        }
    ) => {
        wire_record! {
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                flatten common: HealthEvaluationCommon,
                $($access $field: $ty = $wire,)*
                optional_records unhealthy_evaluations: Option<Vec<HealthEvaluationWrapper>> = "UnhealthyEvaluations",
            }
        }

        impl HealthEvaluationRecord for $name {
            fn common(&self) -> &HealthEvaluationCommon {
                &self.common
            }

            fn unhealthy_evaluations(&self) -> &[HealthEvaluationWrapper] {
                self.unhealthy_evaluations.as_deref().unwrap_or_default()
            }
        }
    };
}

// ----------------------------------------------------------------------------
// Leaf-ish evaluations: one entity and its own unhealthy children
// ----------------------------------------------------------------------------

wire_record! {
    /// An event reported on the entity made it unhealthy.
    #[derive(Debug, Clone, PartialEq)]
    pub struct EventHealthEvaluation {
        flatten common: HealthEvaluationCommon,
        /// Whether warnings were treated with the same severity as errors
        optional consider_warning_as_error: Option<bool> = "ConsiderWarningAsError",
        required unhealthy_event: HealthEvent = "UnhealthyEvent",
    }
}

impl HealthEvaluationRecord for EventHealthEvaluation {
    fn common(&self) -> &HealthEvaluationCommon {
        &self.common
    }

    fn unhealthy_evaluations(&self) -> &[HealthEvaluationWrapper] {
        &[]
    }
}

evaluation_record! {
    /// Health of a single node.
    pub struct NodeHealthEvaluation {
        id node_name: NodeName = "NodeName",
    }
}

evaluation_record! {
    /// Health of a single application.
    pub struct ApplicationHealthEvaluation {
        id application_name: HierarchicalName = "ApplicationName",
    }
}

evaluation_record! {
    /// Health of a single service.
    pub struct ServiceHealthEvaluation {
        id service_name: HierarchicalName = "ServiceName",
    }
}

evaluation_record! {
    /// Health of a single partition.
    pub struct PartitionHealthEvaluation {
        id partition_id: PartitionId = "PartitionId",
    }
}

evaluation_record! {
    /// Health of a single replica or stateless instance.
    pub struct ReplicaHealthEvaluation {
        id partition_id: PartitionId = "PartitionId",
        id replica_or_instance_id: ReplicaId = "ReplicaOrInstanceId",
    }
}

evaluation_record! {
    /// Health of an application deployed on one node.
    pub struct DeployedApplicationHealthEvaluation {
        id node_name: NodeName = "NodeName",
        id application_name: HierarchicalName = "ApplicationName",
    }
}

evaluation_record! {
    /// Health of a service package deployed on one node.
    pub struct DeployedServicePackageHealthEvaluation {
        id node_name: NodeName = "NodeName",
        id application_name: HierarchicalName = "ApplicationName",
        required service_manifest_name: String = "ServiceManifestName",
        optional service_package_activation_id: Option<String> = "ServicePackageActivationId",
    }
}

// ----------------------------------------------------------------------------
// Aggregating evaluations with a percentage policy
// ----------------------------------------------------------------------------

evaluation_record! {
    /// Replicas of one partition, checked against the per-partition policy.
    pub struct ReplicasHealthEvaluation {
        percent max_percent_unhealthy_replicas_per_partition: Option<i32> = "MaxPercentUnhealthyReplicasPerPartition",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Partitions of one service, checked against the per-service policy.
    pub struct PartitionsHealthEvaluation {
        percent max_percent_unhealthy_partitions_per_service: Option<i32> = "MaxPercentUnhealthyPartitionsPerService",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Deployed service packages of one deployed application.
    pub struct DeployedServicePackagesHealthEvaluation {
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Deployed instances of one application.
    pub struct DeployedApplicationsHealthEvaluation {
        percent max_percent_unhealthy_deployed_applications: Option<i32> = "MaxPercentUnhealthyDeployedApplications",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Services of one service type within an application.
    pub struct ServicesHealthEvaluation {
        optional service_type_name: Option<String> = "ServiceTypeName",
        percent max_percent_unhealthy_services: Option<i32> = "MaxPercentUnhealthyServices",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// All cluster nodes.
    pub struct NodesHealthEvaluation {
        percent max_percent_unhealthy_nodes: Option<i32> = "MaxPercentUnhealthyNodes",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// All non-system applications.
    pub struct ApplicationsHealthEvaluation {
        percent max_percent_unhealthy_applications: Option<i32> = "MaxPercentUnhealthyApplications",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// The `fabric:/System` application.
    pub struct SystemApplicationHealthEvaluation {}
}

evaluation_record! {
    /// Deployed applications within one upgrade domain.
    pub struct UpgradeDomainDeployedApplicationsHealthEvaluation {
        optional upgrade_domain_name: Option<String> = "UpgradeDomainName",
        percent max_percent_unhealthy_deployed_applications: Option<i32> = "MaxPercentUnhealthyDeployedApplications",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Nodes within one upgrade domain.
    pub struct UpgradeDomainNodesHealthEvaluation {
        optional upgrade_domain_name: Option<String> = "UpgradeDomainName",
        percent max_percent_unhealthy_nodes: Option<i32> = "MaxPercentUnhealthyNodes",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Applications of one application type, under a type-specific policy.
    pub struct ApplicationTypeApplicationsHealthEvaluation {
        optional application_type_name: Option<String> = "ApplicationTypeName",
        percent max_percent_unhealthy_applications: Option<i32> = "MaxPercentUnhealthyApplications",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Nodes of one node type, under a type-specific policy.
    pub struct NodeTypeNodesHealthEvaluation {
        optional node_type_name: Option<String> = "NodeTypeName",
        percent max_percent_unhealthy_nodes: Option<i32> = "MaxPercentUnhealthyNodes",
        optional total_count: Option<i64> = "TotalCount",
    }
}

// ----------------------------------------------------------------------------
// Upgrade delta checks: growth in unhealthy nodes against a baseline
// ----------------------------------------------------------------------------

evaluation_record! {
    /// Cluster-wide growth of unhealthy nodes during an upgrade.
    pub struct DeltaNodesCheckHealthEvaluation {
        optional baseline_error_count: Option<i64> = "BaselineErrorCount",
        optional baseline_total_count: Option<i64> = "BaselineTotalCount",
        percent max_percent_delta_unhealthy_nodes: Option<i32> = "MaxPercentDeltaUnhealthyNodes",
        optional total_count: Option<i64> = "TotalCount",
    }
}

evaluation_record! {
    /// Growth of unhealthy nodes within one upgrade domain.
    pub struct UpgradeDomainDeltaNodesCheckHealthEvaluation {
        optional upgrade_domain_name: Option<String> = "UpgradeDomainName",
        optional baseline_error_count: Option<i64> = "BaselineErrorCount",
        optional baseline_total_count: Option<i64> = "BaselineTotalCount",
        percent max_percent_upgrade_domain_delta_unhealthy_nodes: Option<i32> = "MaxPercentUpgradeDomainDeltaUnhealthyNodes",
        optional total_count: Option<i64> = "TotalCount",
    }
}

// ============================================================================
// THE FAMILY
// ============================================================================

variant_family! {
    /// One node of a health-evaluation tree, selected by `Kind`.
    pub enum HealthEvaluation: HealthEvaluationKind {
        family = "HealthEvaluation",
        field = "Kind",
        Event(EventHealthEvaluation),
        Replicas(ReplicasHealthEvaluation),
        Partitions(PartitionsHealthEvaluation),
        DeployedServicePackages(DeployedServicePackagesHealthEvaluation),
        DeployedApplications(DeployedApplicationsHealthEvaluation),
        Services(ServicesHealthEvaluation),
        Nodes(NodesHealthEvaluation),
        Applications(ApplicationsHealthEvaluation),
        SystemApplication(SystemApplicationHealthEvaluation),
        UpgradeDomainDeployedApplications(UpgradeDomainDeployedApplicationsHealthEvaluation),
        UpgradeDomainNodes(UpgradeDomainNodesHealthEvaluation),
        Replica(ReplicaHealthEvaluation),
        Partition(PartitionHealthEvaluation),
        DeployedServicePackage(DeployedServicePackageHealthEvaluation),
        DeployedApplication(DeployedApplicationHealthEvaluation),
        Service(ServiceHealthEvaluation),
        Node(NodeHealthEvaluation),
        Application(ApplicationHealthEvaluation),
        DeltaNodesCheck(DeltaNodesCheckHealthEvaluation),
        UpgradeDomainDeltaNodesCheck(UpgradeDomainDeltaNodesCheckHealthEvaluation),
        ApplicationTypeApplications(ApplicationTypeApplicationsHealthEvaluation),
        NodeTypeNodes(NodeTypeNodesHealthEvaluation),
    }
}

impl HealthEvaluation {
    /// The concrete record behind this variant
    #[must_use]
    pub fn record(&self) -> &dyn HealthEvaluationRecord {
        match self {
            Self::Event(r) => &**r,
            Self::Replicas(r) => &**r,
            Self::Partitions(r) => &**r,
            Self::DeployedServicePackages(r) => &**r,
            Self::DeployedApplications(r) => &**r,
            Self::Services(r) => &**r,
            Self::Nodes(r) => &**r,
            Self::Applications(r) => &**r,
            Self::SystemApplication(r) => &**r,
            Self::UpgradeDomainDeployedApplications(r) => &**r,
            Self::UpgradeDomainNodes(r) => &**r,
            Self::Replica(r) => &**r,
            Self::Partition(r) => &**r,
            Self::DeployedServicePackage(r) => &**r,
            Self::DeployedApplication(r) => &**r,
            Self::Service(r) => &**r,
            Self::Node(r) => &**r,
            Self::Application(r) => &**r,
            Self::DeltaNodesCheck(r) => &**r,
            Self::UpgradeDomainDeltaNodesCheck(r) => &**r,
            Self::ApplicationTypeApplications(r) => &**r,
            Self::NodeTypeNodes(r) => &**r,
        }
    }

    #[must_use]
    pub fn aggregated_health_state(&self) -> HealthState {
        self.record().common().aggregated_health_state
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.record().common().description.as_deref()
    }
}
