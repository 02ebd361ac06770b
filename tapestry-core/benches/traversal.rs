//! Benchmark: path search and visibility over generated maps
//!
//! Maps are binary trees of `n` nodes; every fourth node is an accordion so
//! the ancestor walk in `is_visible` has real work to do.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use std::time::Duration;
use tapestry_core::{Caller, Dataset, Link, NodeId, TapestryState};

fn tree(n: u64) -> TapestryState {
    let nodes: Vec<_> = (1..=n)
        .map(|id| {
            json!({
                "id": id,
                "nodeType": if id == 1 { "root" } else { "child" },
                "mediaType": if id % 4 == 0 { "accordion" } else { "text" },
                "permissions": { "public": ["read"] },
            })
        })
        .collect();
    let links: Vec<_> = (2..=n)
        .map(|id| json!({ "source": id / 2, "target": id }))
        .collect();
    let dataset: Dataset = serde_json::from_value(json!({
        "rootId": 1,
        "nodes": nodes,
        "links": links,
    }))
    .expect("generated dataset");
    TapestryState::from_dataset(dataset)
}

fn bench_has_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("has_path");
    for &n in &[64_u64, 256, 1024] {
        let state = tree(n);
        let exclude = [Link::new(NodeId::new(1), NodeId::new(2))];
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::new("leaf_to_root", n), &state, |b, state| {
            b.iter(|| state.has_path(black_box(NodeId::new(n)), NodeId::new(1), &[]))
        });
        group.bench_with_input(BenchmarkId::new("cut_off", n), &state, |b, state| {
            b.iter(|| state.has_path(black_box(NodeId::new(2)), NodeId::new(3), &exclude))
        });
    }
    group.finish();
}

fn bench_visible_nodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_node_ids");
    let visitor = Caller::anonymous();
    for &n in &[64_u64, 256, 1024] {
        let state = tree(n);
        group.throughput(Throughput::Elements(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &state, |b, state| {
            b.iter(|| black_box(state.visible_node_ids(&visitor)))
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(30);
    targets = bench_has_path, bench_visible_nodes
}
criterion_main!(benches);
