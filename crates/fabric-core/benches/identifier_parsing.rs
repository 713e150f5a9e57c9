#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

//! Benchmark identifier parsing performance.
//!
//! Identifiers are validated once at the wire boundary; these benchmarks
//! measure that cost and the flat-id conversions used for REST paths.
//!
//! Run with: cargo bench --bench identifier_parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fabric_core::identifiers::{HierarchicalName, PartitionId, ReplicaId};

// ============================================================================
// FIXTURES
// ============================================================================

/// Valid hierarchical names of growing depth
fn hierarchical_names() -> Vec<String> {
    vec![
        "fabric:/".to_string(),
        "fabric:/app".to_string(),
        "fabric:/shop/cart".to_string(),
        "fabric:/shop/cart/checkout".to_string(),
        "fabric:/tenant~a/shop/cart".to_string(),
        format!("fabric:/{}", vec!["segment"; 8].join("/")),
    ]
}

/// Names rejected for different reasons
fn invalid_names() -> Vec<String> {
    vec![
        String::new(),
        "http:/app".to_string(),
        "fabric:/app/".to_string(),
        "fabric:/a?b".to_string(),
        "fabric:/a#b".to_string(),
        "fabric:/a\\b".to_string(),
    ]
}

fn partition_ids() -> Vec<String> {
    vec![
        "0d1f4e6a-7f49-4a18-8f9f-55f3c8c4e2a1".to_string(),
        "0D1F4E6A-7F49-4A18-8F9F-55F3C8C4E2A1".to_string(),
        "0d1f4e6a7f494a188f9f55f3c8c4e2a1".to_string(),
        "{0d1f4e6a-7f49-4a18-8f9f-55f3c8c4e2a1}".to_string(),
    ]
}

// ============================================================================
// HIERARCHICAL NAMES
// ============================================================================

fn bench_hierarchical_name_parse(c: &mut Criterion) {
    let names = hierarchical_names();

    c.bench_function("hierarchical_name_parse_valid", |b| {
        b.iter(|| {
            for name in &names {
                black_box(HierarchicalName::parse(name.as_str()).ok());
            }
        });
    });
}

fn bench_hierarchical_name_parse_invalid(c: &mut Criterion) {
    let names = invalid_names();

    c.bench_function("hierarchical_name_parse_invalid", |b| {
        b.iter(|| {
            for name in &names {
                black_box(HierarchicalName::parse(name.as_str()).err());
            }
        });
    });
}

fn bench_flat_id_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_id_round_trip");

    for depth in [1_usize, 4, 16] {
        let raw = format!("fabric:/{}", vec!["seg~ment"; depth].join("/"));
        let Ok(name) = HierarchicalName::parse(raw) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(depth), &name, |b, name| {
            b.iter(|| {
                let flat = name.flat_id();
                black_box(HierarchicalName::from_flat_id(&flat).ok())
            });
        });
    }

    group.finish();
}

fn bench_parent_chain(c: &mut Criterion) {
    let Ok(name) = HierarchicalName::parse(format!("fabric:/{}", vec!["level"; 8].join("/"))) else {
        return;
    };

    c.bench_function("hierarchical_name_parent_chain", |b| {
        b.iter(|| {
            let mut current = Some(name.clone());
            let mut steps = 0_usize;
            while let Some(next) = current.and_then(|n| n.parent()) {
                steps += 1;
                current = Some(next);
            }
            black_box(steps)
        });
    });
}

// ============================================================================
// NUMERIC AND UUID IDENTIFIERS
// ============================================================================

fn bench_partition_id_parse(c: &mut Criterion) {
    let ids = partition_ids();

    c.bench_function("partition_id_parse", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(PartitionId::parse(id.as_str()).ok());
            }
        });
    });
}

fn bench_replica_id_parse(c: &mut Criterion) {
    let ids: Vec<String> = [0_i64, 1, -1, 131_998_000_000_000_001, i64::MAX, i64::MIN]
        .iter()
        .map(ToString::to_string)
        .collect();

    c.bench_function("replica_id_parse", |b| {
        b.iter(|| {
            for id in &ids {
                black_box(ReplicaId::parse(id.as_str()).ok());
            }
        });
    });
}

// ============================================================================
// CRITERION GROUPS
// ============================================================================

criterion_group!(
    benches,
    bench_hierarchical_name_parse,
    bench_hierarchical_name_parse_invalid,
    bench_flat_id_conversion,
    bench_parent_chain,
    bench_partition_id_parse,
    bench_replica_id_parse
);

criterion_main!(benches);
