//! Health states, health reports and the recursive health-evaluation tree.
//!
//! # Tree Shape
//!
//! ```text
//! Applications (MaxPercentUnhealthyApplications = 0, TotalCount = 4)
//! └── Application fabric:/shop
//!     └── Services (ServiceTypeName = CartType)
//!         └── Service fabric:/shop/cart
//!             └── Partitions
//!                 └── Partition 0d1f4e6a-...
//!                     └── Replicas
//!                         └── Replica 131_998_..
//!                             └── Event (System.RA / ReplicaOpenStatus)
//! ```
//!
//! Every level is a [`HealthEvaluation`] resolved from the wire by its `Kind`
//! discriminator. Aggregating levels carry a percentage policy; see
//! [`is_threshold_violated`].

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod evaluation;
mod event;
mod threshold;
mod tree;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub use evaluation::{
    ApplicationHealthEvaluation, ApplicationTypeApplicationsHealthEvaluation,
    ApplicationsHealthEvaluation, DeltaNodesCheckHealthEvaluation,
    DeployedApplicationHealthEvaluation, DeployedApplicationsHealthEvaluation,
    DeployedServicePackageHealthEvaluation, DeployedServicePackagesHealthEvaluation,
    EventHealthEvaluation, HealthEvaluation, HealthEvaluationCommon, HealthEvaluationKind,
    HealthEvaluationRecord, HealthEvaluationWrapper, NodeHealthEvaluation,
    NodeTypeNodesHealthEvaluation, NodesHealthEvaluation, PartitionHealthEvaluation,
    PartitionsHealthEvaluation, ReplicaHealthEvaluation, ReplicasHealthEvaluation,
    ServiceHealthEvaluation, ServicesHealthEvaluation, SystemApplicationHealthEvaluation,
    UpgradeDomainDeltaNodesCheckHealthEvaluation, UpgradeDomainDeployedApplicationsHealthEvaluation,
    UpgradeDomainNodesHealthEvaluation,
};
pub use event::HealthEvent;
pub use threshold::{allowed_unhealthy, delta_threshold_violated, is_threshold_violated};
pub use tree::{wrap_all, UnhealthyPolicy, Walk};

/// Health state of an entity or of a single report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum HealthState {
    /// Unset; never reported by a healthy cluster
    Invalid,
    Ok,
    Warning,
    Error,
    Unknown,
}

impl HealthState {
    /// Warning and Error are unhealthy
    #[must_use]
    pub const fn is_unhealthy(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}
