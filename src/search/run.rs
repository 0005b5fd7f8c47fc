//! Runner for the spanning tree search.
//!
//! The decision tree is walked depth-first with an explicit work stack
//! rather than native recursion. Every frame owns its own copy of the
//! current edge set and fixed-edge set, so excluding an edge in one branch
//! never affects its sibling.
use super::{select_edge, EdgeChoice, SearchParams, SpanningTree};
use crate::graph::{edges_connected, Edge, Graph};
use crate::stats::{SearchCounts, SearchEvent};
use log::{debug, trace};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

/// A node of the decision tree.
struct Frame {
    /// The edges remaining on this branch.
    edges: Vec<Edge>,
    /// The edges committed to every tree found below this frame,
    /// in the order they were fixed.
    fixed: Vec<Edge>,
    /// Number of decisions taken to reach this frame.
    depth: usize,
}

/// The trees found by a search, with event statistics.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    /// Distinct spanning trees in discovery order.
    pub trees: Vec<SpanningTree>,
    pub counts: SearchCounts,
}

/// A seeded spanning tree search over a fixed graph.
pub struct SpanningTreeSearch<'g> {
    graph: &'g Graph,
    params: SearchParams,
    rng: SmallRng,
}

impl<'g> SpanningTreeSearch<'g> {
    pub fn new(graph: &'g Graph, params: SearchParams) -> SpanningTreeSearch<'g> {
        SpanningTreeSearch {
            graph: graph,
            params: params,
            rng: SeedableRng::seed_from_u64(params.rng_seed),
        }
    }

    /// Searches for up to `params.budget` distinct spanning trees.
    ///
    /// Branches that cannot be extended end silently (they are tallied in
    /// the returned counts). Disconnected graphs and a zero budget yield
    /// no trees; a single node yields the empty tree.
    pub fn enumerate(&mut self) -> SearchResult {
        let mut result = SearchResult::default();
        let n = self.graph.num_nodes;
        let budget = self.params.budget;
        if budget == 0 || n == 0 {
            return result;
        }
        if n == 1 {
            result.trees.push(SpanningTree::new(vec![]));
            result.counts.inc(SearchEvent::TreeFound);
            return result;
        }
        if !self.graph.is_connected() {
            debug!("Graph is disconnected; no spanning trees to search for");
            return result;
        }

        let ceiling = self.params.depth_ceiling(self.graph.edges.len());
        let mut seen = HashSet::<SpanningTree>::new();
        let mut stack = vec![Frame {
            edges: self.graph.edges.clone(),
            fixed: Vec::new(),
            depth: 0,
        }];
        while let Some(frame) = stack.pop() {
            result.counts.inc(SearchEvent::Visited);
            if frame.depth > ceiling {
                result.counts.inc(SearchEvent::DepthLimit);
                continue;
            }

            if frame.edges.len() == n - 1 && edges_connected(n, &frame.edges) {
                let tree = SpanningTree::new(frame.edges.iter().cloned());
                if seen.insert(tree.clone()) {
                    trace!("Found spanning tree #{} at depth {}", seen.len(), frame.depth);
                    result.trees.push(tree);
                    result.counts.inc(SearchEvent::TreeFound);
                    if result.trees.len() >= budget {
                        break;
                    }
                } else {
                    result.counts.inc(SearchEvent::Duplicate);
                }
                // Every edge of a tree is a bridge: nothing left to decide.
                continue;
            }

            if frame.edges.iter().all(|e| frame.fixed.contains(e)) {
                result.counts.inc(SearchEvent::NoCandidates);
                continue;
            }

            let choice = select_edge(
                &mut self.rng,
                n,
                &frame.edges,
                &frame.fixed,
                self.params.cycle_check,
            );
            match choice {
                EdgeChoice::Exhausted => result.counts.inc(SearchEvent::Exhausted),
                EdgeChoice::Accepted(edge) => {
                    let depth = frame.depth + 1;
                    let mut fixed = frame.fixed.clone();
                    fixed.push(edge);
                    let excluded: Vec<Edge> =
                        frame.edges.iter().filter(|&&e| e != edge).cloned().collect();
                    // Pushed in reverse: the fixing branch is explored first.
                    stack.push(Frame {
                        edges: excluded,
                        fixed: frame.fixed,
                        depth: depth,
                    });
                    stack.push(Frame {
                        edges: frame.edges,
                        fixed: fixed,
                        depth: depth,
                    });
                }
            }
        }
        debug!(
            "Search finished with {} of {} trees ({} frames visited)",
            result.trees.len(),
            budget,
            result.counts.get(SearchEvent::Visited)
        );
        result
    }
}

/// Searches `graph` for up to `params.budget` distinct spanning trees.
pub fn enumerate(graph: &Graph, params: &SearchParams) -> SearchResult {
    SpanningTreeSearch::new(graph, *params).enumerate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::CycleCheck;

    #[test]
    fn single_node_yields_empty_tree() {
        let graph = Graph::path(1);
        let result = enumerate(&graph, &SearchParams::new(0, 1));
        assert_eq!(result.trees, vec![SpanningTree::new(vec![])]);
    }

    #[test]
    fn disconnected_graph_yields_nothing() {
        let graph = Graph::from_edges(3, vec![Edge(0, 1)]);
        let result = enumerate(&graph, &SearchParams::new(0, 10));
        assert!(result.trees.is_empty());
        assert_eq!(result.counts.get(SearchEvent::Visited), 0);
    }

    #[test]
    fn zero_budget_yields_nothing() {
        let result = enumerate(&Graph::cycle(4), &SearchParams::new(0, 0));
        assert!(result.trees.is_empty());
    }

    #[test]
    fn tree_graph_yields_itself() {
        let graph = Graph::path(5);
        let result = enumerate(&graph, &SearchParams::new(3, 1));
        assert_eq!(result.trees, vec![SpanningTree::new(graph.edges.clone())]);
    }

    #[test]
    fn cycle_yields_every_tree() {
        // Every edge of a cycle is a valid choice until a tree is reached,
        // so no branch is ever abandoned.
        for seed in 0..5 {
            let result = enumerate(&Graph::cycle(5), &SearchParams::new(seed, 5));
            assert_eq!(result.trees.len(), 5);
            assert_eq!(result.counts.get(SearchEvent::Exhausted), 0);
        }
    }

    #[test]
    fn budget_stops_search() {
        let result = enumerate(&Graph::cycle(6), &SearchParams::new(11, 2));
        assert_eq!(result.trees.len(), 2);
    }

    #[test]
    fn depth_limit_prunes() {
        let params = SearchParams {
            max_depth: Some(0),
            ..SearchParams::new(5, 16)
        };
        let result = enumerate(&Graph::complete(4), &params);
        assert!(result.trees.is_empty());
        assert!(result.counts.get(SearchEvent::DepthLimit) > 0);
    }

    #[test]
    fn union_find_trees_are_valid() {
        let params = SearchParams {
            cycle_check: CycleCheck::UnionFind,
            ..SearchParams::new(9, 16)
        };
        let result = enumerate(&Graph::complete(4), &params);
        assert!(result.trees.iter().all(|t| t.is_spanning_tree_of(4)));
    }
}
