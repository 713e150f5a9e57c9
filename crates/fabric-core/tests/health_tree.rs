//! Health-evaluation trees resolved from the wire.
//!
//! Tests cover:
//! - A full application-to-event chain resolves and materializes unchanged
//! - The resolver's depth limit applies to nested evaluations
//! - Walking and justifying states over a resolved tree

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use fabric_core::{
    health::{HealthEvaluation, HealthEvaluationKind, HealthState, UnhealthyPolicy},
    variant::{resolve_value, resolve_value_with, to_value},
    ResolutionError, ResolverConfig,
};
use serde_json::{json, Value};

const PARTITION: &str = "0d1f4e6a-7f49-4a18-8f9f-55f3c8c4e2a1";

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// One evaluation in Error with `extra` attributes and the given children.
fn level(kind: &str, extra: &Value, children: Vec<Value>) -> Value {
    let mut payload = json!({ "Kind": kind, "AggregatedHealthState": "Error" });
    if let Some(fields) = payload.as_object_mut() {
        if let Some(extra) = extra.as_object() {
            fields.extend(extra.clone());
        }
        if !children.is_empty() {
            let wrapped = children
                .into_iter()
                .map(|child| json!({ "HealthEvaluation": child }))
                .collect();
            fields.insert("UnhealthyEvaluations".to_string(), Value::Array(wrapped));
        }
    }
    payload
}

/// Applications > Application > Services > Service > Partitions > Partition
/// > Replicas > Replica > Event: nine levels.
fn application_chain() -> Value {
    let event = level(
        "Event",
        &json!({
            "ConsiderWarningAsError": false,
            "UnhealthyEvent": {
                "SourceId": "System.RA",
                "Property": "ReplicaOpenStatus",
                "HealthState": "Error",
                "SequenceNumber": "131998",
            },
        }),
        vec![],
    );
    let replica = level(
        "Replica",
        &json!({ "PartitionId": PARTITION, "ReplicaOrInstanceId": "131998000000000001" }),
        vec![event],
    );
    let replicas = level(
        "Replicas",
        &json!({ "MaxPercentUnhealthyReplicasPerPartition": 0, "TotalCount": 3 }),
        vec![replica],
    );
    let partition = level("Partition", &json!({ "PartitionId": PARTITION }), vec![replicas]);
    let partitions = level(
        "Partitions",
        &json!({ "MaxPercentUnhealthyPartitionsPerService": 0, "TotalCount": 1 }),
        vec![partition],
    );
    let service = level("Service", &json!({ "ServiceName": "fabric:/shop/cart" }), vec![partitions]);
    let services = level(
        "Services",
        &json!({ "ServiceTypeName": "CartType", "MaxPercentUnhealthyServices": 0, "TotalCount": 2 }),
        vec![service],
    );
    let application = level("Application", &json!({ "ApplicationName": "fabric:/shop" }), vec![services]);
    level(
        "Applications",
        &json!({ "MaxPercentUnhealthyApplications": 0, "TotalCount": 4 }),
        vec![application],
    )
}

// ═══════════════════════════════════════════════════════════════════════════
// RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_chain_resolves_and_materializes() -> Result<(), ResolutionError> {
    let payload = application_chain();
    let tree: HealthEvaluation = resolve_value(&payload)?;

    assert_eq!(tree.kind(), HealthEvaluationKind::Applications);
    assert_eq!(tree.depth(), 9);
    assert_eq!(to_value(&tree)?, payload);
    Ok(())
}

#[test]
fn test_depth_limit_counts_nested_evaluations() -> Result<(), ResolutionError> {
    let payload = application_chain();

    let exact = ResolverConfig::default().with_max_depth(9);
    let tree: HealthEvaluation = resolve_value_with(&payload, &exact)?;
    assert_eq!(tree.depth(), 9);

    let shallow = ResolverConfig::default().with_max_depth(8);
    let result = resolve_value_with::<HealthEvaluation>(&payload, &shallow);
    assert!(
        matches!(&result, Err(ResolutionError::DepthExceeded { max_depth: 8, field }) if field.contains("UnhealthyEvaluations[0]")),
        "{result:?}"
    );
    Ok(())
}

#[test]
fn test_bad_leaf_fails_whole_tree() {
    let mut payload = application_chain();
    // Corrupt the partition id on the innermost replica evaluation
    let replica = payload
        .pointer_mut(
            "/UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /UnhealthyEvaluations/0/HealthEvaluation\
             /PartitionId",
        )
        .map(|id| *id = json!("not-a-guid"));
    assert!(replica.is_some(), "fixture shape changed");

    let result = resolve_value::<HealthEvaluation>(&payload);
    assert!(
        matches!(&result, Err(ResolutionError::MalformedIdentifier { field, .. }) if field.ends_with("PartitionId")),
        "{result:?}"
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// NAVIGATION AND JUSTIFICATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_walk_visits_every_level_in_order() -> Result<(), ResolutionError> {
    let tree: HealthEvaluation = resolve_value(&application_chain())?;
    let visited: Vec<_> = tree.walk().map(|(level, node)| (level, node.kind())).collect();

    assert_eq!(
        visited,
        vec![
            (0, HealthEvaluationKind::Applications),
            (1, HealthEvaluationKind::Application),
            (2, HealthEvaluationKind::Services),
            (3, HealthEvaluationKind::Service),
            (4, HealthEvaluationKind::Partitions),
            (5, HealthEvaluationKind::Partition),
            (6, HealthEvaluationKind::Replicas),
            (7, HealthEvaluationKind::Replica),
            (8, HealthEvaluationKind::Event),
        ]
    );
    assert!(tree.walk().all(|(_, node)| node.aggregated_health_state() == HealthState::Error));
    Ok(())
}

#[test]
fn test_zero_percent_policies_justify_the_chain() -> Result<(), ResolutionError> {
    let tree: HealthEvaluation = resolve_value(&application_chain())?;

    assert!(tree.walk().all(|(_, node)| node.justifies_unhealthy_state()));
    assert_eq!(
        tree.threshold(),
        Some(UnhealthyPolicy::Percentage {
            max_percent: 0,
            total_count: 4
        })
    );
    Ok(())
}

#[test]
fn test_tolerant_policy_does_not_justify() -> Result<(), ResolutionError> {
    let payload = level(
        "Nodes",
        &json!({ "MaxPercentUnhealthyNodes": 50, "TotalCount": 3 }),
        vec![level("Node", &json!({ "NodeName": "_Node_0" }), vec![])],
    );
    let tree: HealthEvaluation = resolve_value(&payload)?;

    assert_eq!(tree.unhealthy_count(), 1);
    assert!(!tree.justifies_unhealthy_state());
    assert!(tree.children().all(HealthEvaluation::justifies_unhealthy_state));
    Ok(())
}

#[test]
fn test_unset_policy_is_zero_percent_of_zero() -> Result<(), ResolutionError> {
    let payload = level("Nodes", &json!({}), vec![level("Node", &json!({ "NodeName": "_Node_0" }), vec![])]);
    let tree: HealthEvaluation = resolve_value(&payload)?;

    assert_eq!(
        tree.threshold(),
        Some(UnhealthyPolicy::Percentage {
            max_percent: 0,
            total_count: 0
        })
    );
    assert!(tree.justifies_unhealthy_state());
    Ok(())
}

#[test]
fn test_delta_check_uses_baseline() -> Result<(), ResolutionError> {
    let unhealthy = (0..3)
        .map(|i| level("Node", &json!({ "NodeName": format!("_Node_{i}") }), vec![]))
        .collect();
    let payload = level(
        "DeltaNodesCheck",
        &json!({
            "BaselineErrorCount": 1,
            "BaselineTotalCount": 10,
            "MaxPercentDeltaUnhealthyNodes": 10,
            "TotalCount": 10,
        }),
        unhealthy,
    );
    let tree: HealthEvaluation = resolve_value(&payload)?;

    // 10% -> 30% is a 20-point rise against a 10-point allowance
    assert!(tree.justifies_unhealthy_state());
    assert!(matches!(tree.threshold(), Some(UnhealthyPolicy::Delta { .. })));
    Ok(())
}
