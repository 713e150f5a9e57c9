//! Repair tasks: which entities a repair targets and how it affects them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    identifiers::NodeName,
    variant::{variant_family, wire_record},
};

/// How severely a repair affects a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString)]
pub enum ImpactLevel {
    Invalid,
    None,
    Restart,
    RemoveData,
    RemoveNode,
}

/// Expected impact of a repair on one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeImpact {
    pub node_name: NodeName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact_level: Option<ImpactLevel>,
}

impl NodeImpact {
    #[must_use]
    pub const fn new(node_name: NodeName, impact_level: ImpactLevel) -> Self {
        Self {
            node_name,
            impact_level: Some(impact_level),
        }
    }
}

wire_record! {
    /// The nodes a repair task acts on.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct NodeRepairTargetDescription {
        optional_ids node_names: Option<Vec<NodeName>> = "NodeNames",
    }
}

variant_family! {
    /// What a repair task targets, selected by `Kind`.
    pub enum RepairTargetDescription: RepairTargetKind {
        family = "RepairTargetDescription",
        field = "Kind",
        Node(NodeRepairTargetDescription),
    }
}

wire_record! {
    /// Per-node impact of a repair task.
    #[derive(Debug, Clone, PartialEq, Eq, Default)]
    pub struct NodeRepairImpactDescription {
        optional node_impact_list: Option<Vec<NodeImpact>> = "NodeImpactList",
    }
}

impl NodeRepairImpactDescription {
    /// The most severe impact on any listed node
    #[must_use]
    pub fn worst_impact(&self) -> Option<ImpactLevel> {
        self.node_impact_list
            .iter()
            .flatten()
            .filter_map(|impact| impact.impact_level)
            .max()
    }
}

variant_family! {
    /// How a repair task affects its targets, selected by `Kind`.
    pub enum RepairImpactDescription: RepairImpactKind {
        family = "RepairImpactDescription",
        field = "Kind",
        Node(NodeRepairImpactDescription),
    }
}
