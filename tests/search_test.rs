// Functional tests that verify spanning tree search invariants.
use itertools::Itertools;
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Once;
use stsearch::graph::{edges_connected, Edge, Graph};
use stsearch::search::{
    budget_from_count, enumerate, CycleCheck, SearchParams, SearchResult, SpanningTree,
};
use stsearch::stats::SearchEvent;
use test_fixtures::graph_fixture;

static INIT: Once = Once::new();

/// Loads a fixture's search graph, with test logging enabled.
fn fixture_graph(key: &str) -> Graph {
    INIT.call_once(|| {
        let env = env_logger::Env::default().default_filter_or("debug");
        let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
    });
    graph_fixture(key).graph().unwrap()
}

/// Every spanning tree of a small graph, by brute force.
fn all_spanning_trees(graph: &Graph) -> HashSet<SpanningTree> {
    let n = graph.num_nodes;
    graph
        .edges
        .iter()
        .cloned()
        .combinations(n - 1)
        .filter(|subset| edges_connected(n, subset))
        .map(SpanningTree::new)
        .collect()
}

/// Verifies that a search result is made of distinct spanning trees of
/// `graph`, and respects the budget.
fn assert_result_invariants(graph: &Graph, params: &SearchParams, result: &SearchResult) {
    let universe = all_spanning_trees(graph);
    assert!(result.trees.len() <= params.budget);
    for tree in result.trees.iter() {
        assert!(tree.is_spanning_tree_of(graph.num_nodes));
        assert!(tree.edges().all(|e| graph.edges.contains(e)));
        assert!(universe.contains(tree));
    }
    let distinct: HashSet<&SpanningTree> = result.trees.iter().collect();
    assert_eq!(distinct.len(), result.trees.len());
    assert_eq!(
        result.counts.get(SearchEvent::TreeFound),
        result.trees.len()
    );
}

#[rstest]
fn test_search_invariants(
    #[values("C4", "K4", "diamond")] key: &str,
    #[values(0, 1, 42, 12345)] seed: u64,
    #[values(CycleCheck::ChainWalk, CycleCheck::UnionFind)] cycle_check: CycleCheck,
) {
    let matrix = graph_fixture(key);
    let graph = matrix.graph().unwrap();
    let params = SearchParams {
        cycle_check: cycle_check,
        ..SearchParams::new(seed, budget_from_count(matrix.spanning_tree_count().unwrap()))
    };
    let result = enumerate(&graph, &params);
    assert_result_invariants(&graph, &params, &result);
    assert!(!result.trees.is_empty());
}

#[rstest]
fn test_small_budget(#[values(1, 2, 3)] budget: usize, #[values(7, 8)] seed: u64) {
    let graph = fixture_graph("K4");
    let params = SearchParams::new(seed, budget);
    let result = enumerate(&graph, &params);
    assert_result_invariants(&graph, &params, &result);
    assert_eq!(result.trees.len(), budget);
}

#[rstest]
fn test_same_seed_same_trees(#[values("K4", "grid3x3")] key: &str, #[values(3, 99)] seed: u64) {
    let graph = fixture_graph(key);
    let params = SearchParams::new(seed, 5);
    let first = enumerate(&graph, &params);
    let second = enumerate(&graph, &params);
    assert_eq!(first.trees, second.trees);
    assert_eq!(first.counts, second.counts);
}

#[test]
fn test_cycle_search_is_complete() {
    let graph = fixture_graph("C4");
    let result = enumerate(&graph, &SearchParams::new(17, 4));
    let found: HashSet<SpanningTree> = result.trees.into_iter().collect();
    assert_eq!(found, all_spanning_trees(&graph));
}

#[test]
fn test_grid_trees_are_valid() {
    let graph = fixture_graph("grid3x3");
    let params = SearchParams::new(2024, 10);
    let result = enumerate(&graph, &params);
    assert!(result.trees.len() <= 10);
    for tree in result.trees.iter() {
        assert!(tree.is_spanning_tree_of(9));
        assert!(tree.edges().all(|e| graph.edges.contains(e)));
    }
}

#[test]
fn test_single_edge_yields_itself() {
    let graph = fixture_graph("P2");
    let result = enumerate(&graph, &SearchParams::new(0, 1));
    assert_eq!(result.trees, vec![SpanningTree::new(vec![Edge(0, 1)])]);
}

#[test]
fn test_single_node_yields_empty_tree() {
    let graph = fixture_graph("K1");
    let result = enumerate(&graph, &SearchParams::default());
    assert_eq!(result.trees.len(), 1);
    assert!(result.trees[0].is_empty());
}

#[test]
fn test_disconnected_yields_nothing() {
    let matrix = graph_fixture("E2");
    let graph = matrix.graph().unwrap();
    let budget = budget_from_count(matrix.spanning_tree_count().unwrap());
    assert_eq!(budget, 0);
    let result = enumerate(&graph, &SearchParams::new(0, 10));
    assert!(result.trees.is_empty());
}
