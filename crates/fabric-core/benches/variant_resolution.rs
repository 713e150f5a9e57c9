#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Benchmark discriminator resolution and materialization.
//!
//! Measures:
//! - Resolving flat variants of a small and a large family
//! - Resolving health-evaluation trees of growing fan-out
//! - Writing resolved variants back to JSON
//!
//! Run with: cargo bench --bench variant_resolution

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fabric_core::{
    health::HealthEvaluation,
    service::ServiceDescription,
    variant::{resolve_value, resolve_value_with, to_value},
    ResolverConfig,
};
use serde_json::{json, Value};

// ============================================================================
// FIXTURES
// ============================================================================

fn stateful_service() -> Value {
    json!({
        "ServiceKind": "Stateful",
        "ApplicationName": "fabric:/shop",
        "ServiceName": "fabric:/shop/cart",
        "ServiceTypeName": "CartType",
        "PartitionDescription": {
            "PartitionScheme": "UniformInt64Range",
            "Count": 4,
            "LowKey": "-9223372036854775808",
            "HighKey": "9223372036854775807",
        },
        "ServicePlacementPolicies": [
            { "Type": "RequireDomainDistribution", "DomainName": "fd:/" },
            { "Type": "NonPartiallyPlaceService" },
        ],
        "TargetReplicaSetSize": 3,
        "MinReplicaSetSize": 2,
        "HasPersistedState": true,
        "ReplicaRestartWaitDurationSeconds": "60",
    })
}

fn node_evaluation(index: usize) -> Value {
    json!({
        "HealthEvaluation": {
            "Kind": "Node",
            "AggregatedHealthState": "Error",
            "NodeName": format!("_Node_{index}"),
            "UnhealthyEvaluations": [{
                "HealthEvaluation": {
                    "Kind": "Event",
                    "AggregatedHealthState": "Error",
                    "UnhealthyEvent": {
                        "SourceId": "System.FM",
                        "Property": "State",
                        "HealthState": "Error",
                        "SequenceNumber": "42",
                    },
                },
            }],
        },
    })
}

/// A `Nodes` evaluation with `fan_out` unhealthy nodes, three levels deep
fn nodes_tree(fan_out: usize) -> Value {
    json!({
        "Kind": "Nodes",
        "AggregatedHealthState": "Error",
        "MaxPercentUnhealthyNodes": 0,
        "TotalCount": fan_out,
        "UnhealthyEvaluations": (0..fan_out).map(node_evaluation).collect::<Vec<_>>(),
    })
}

// ============================================================================
// RESOLUTION
// ============================================================================

fn bench_resolve_service_description(c: &mut Criterion) {
    let payload = stateful_service();

    c.bench_function("resolve_stateful_service_description", |b| {
        b.iter(|| black_box(resolve_value::<ServiceDescription>(black_box(&payload)).ok()));
    });
}

fn bench_resolve_unknown_discriminator(c: &mut Criterion) {
    let payload = json!({ "Kind": "NoSuchEvaluation", "AggregatedHealthState": "Ok" });

    c.bench_function("resolve_unknown_discriminator", |b| {
        b.iter(|| black_box(resolve_value::<HealthEvaluation>(black_box(&payload)).err()));
    });
}

fn bench_resolve_health_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_health_tree");

    for fan_out in [1_usize, 10, 100] {
        let payload = nodes_tree(fan_out);
        group.throughput(Throughput::Elements(fan_out as u64));
        group.bench_with_input(BenchmarkId::from_parameter(fan_out), &payload, |b, payload| {
            b.iter(|| black_box(resolve_value::<HealthEvaluation>(payload).ok()));
        });
    }

    group.finish();
}

fn bench_resolve_strict(c: &mut Criterion) {
    let payload = nodes_tree(10);
    let strict = ResolverConfig::strict();

    c.bench_function("resolve_health_tree_strict", |b| {
        b.iter(|| black_box(resolve_value_with::<HealthEvaluation>(&payload, &strict).ok()));
    });
}

// ============================================================================
// MATERIALIZATION
// ============================================================================

fn bench_materialize_health_tree(c: &mut Criterion) {
    let Ok(tree) = resolve_value::<HealthEvaluation>(&nodes_tree(100)) else {
        return;
    };

    c.bench_function("materialize_health_tree_100", |b| {
        b.iter(|| black_box(to_value(&tree).ok()));
    });
}

fn bench_walk_health_tree(c: &mut Criterion) {
    let Ok(tree) = resolve_value::<HealthEvaluation>(&nodes_tree(100)) else {
        return;
    };

    c.bench_function("walk_health_tree_100", |b| {
        b.iter(|| {
            black_box(
                tree.walk()
                    .filter(|(_, node)| node.justifies_unhealthy_state())
                    .count(),
            )
        });
    });
}

// ============================================================================
// CRITERION GROUPS
// ============================================================================

criterion_group!(
    benches,
    bench_resolve_service_description,
    bench_resolve_unknown_discriminator,
    bench_resolve_health_tree,
    bench_resolve_strict,
    bench_materialize_health_tree,
    bench_walk_health_tree
);

criterion_main!(benches);
