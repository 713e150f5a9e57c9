//! Service descriptions, partitioning, placement and auto-scaling.
//!
//! `ServiceDescription` is the deepest non-health family: a single payload
//! nests a partition scheme, a list of placement policies and scaling
//! policies that each pair a trigger with a mechanism.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod description;
mod info;
mod partition;
mod placement;
mod scaling;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use description::{
    ServiceDescription, ServiceDescriptionCommon, ServiceKind, ServiceLoadMetricDescription,
    StatefulServiceDescription, StatelessServiceDescription,
};
pub use info::{ServiceInfo, ServiceInfoCommon, ServiceInfoKind, StatefulServiceInfo, StatelessServiceInfo};
pub use partition::{
    NamedPartitionSchemeDescription, PartitionScheme, PartitionSchemeDescription,
    SingletonPartitionSchemeDescription, UniformInt64RangePartitionSchemeDescription,
};
pub use placement::{
    ServicePlacementInvalidDomainPolicyDescription,
    ServicePlacementNonPartiallyPlaceServicePolicyDescription, ServicePlacementPolicyDescription,
    ServicePlacementPolicyType, ServicePlacementPreferPrimaryDomainPolicyDescription,
    ServicePlacementRequireDomainDistributionPolicyDescription,
    ServicePlacementRequireDomainPolicyDescription,
};
pub use scaling::{
    AddRemoveIncrementalNamedPartitionScalingMechanism, AveragePartitionLoadScalingTrigger,
    AverageServiceLoadScalingTrigger, PartitionInstanceCountScaleMechanism,
    ScalingMechanismDescription, ScalingMechanismKind, ScalingPolicyDescription,
    ScalingTriggerDescription, ScalingTriggerKind,
};

/// Cost the resource balancer assigns to moving a replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum MoveCost {
    Zero,
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Relative importance of a load metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ServiceLoadMetricWeight {
    Zero,
    Low,
    Medium,
    High,
}

/// Whether service packages share a host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ServicePackageActivationMode {
    SharedProcess,
    ExclusiveProcess,
}

/// Lifecycle status of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ServiceStatus {
    Unknown,
    Active,
    Upgrading,
    Deleting,
    Creating,
    Failed,
}
