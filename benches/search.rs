/// Spanning tree count and search benchmarks.
use criterion::{criterion_group, criterion_main, Criterion};
use stsearch::graph::Graph;
use stsearch::matrix::GraphMatrix;
use stsearch::search::{enumerate, SearchParams};
use test_fixtures::graph_fixture;

/// RNG seed for all benchmarks.
const RNG_SEED: u64 = 153434375;

fn count_benchmark(c: &mut Criterion) {
    let adjacency = Graph::rect_grid(6, 6).adjacency();
    c.bench_function("Kirchhoff count, 6x6 grid", move |b| {
        b.iter(|| {
            let matrix = GraphMatrix::from_adjacency(adjacency.clone()).unwrap();
            matrix.spanning_tree_count().unwrap().clone()
        })
    });
}

fn search_benchmark(c: &mut Criterion) {
    let graph = graph_fixture("grid3x3").graph().unwrap();
    let params = SearchParams::new(RNG_SEED, 50);
    c.bench_function("Spanning tree search, 3x3 grid, 50 trees", move |b| {
        b.iter(|| enumerate(&graph, &params))
    });
}

criterion_group!(benches, count_benchmark, search_benchmark);
criterion_main!(benches);
