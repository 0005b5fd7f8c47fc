//! Randomized backtracking search for spanning trees.
//!
//! The search is a binary decision tree over edges. At each decision point
//! an edge is chosen at random from the edges that are not yet fixed; the
//! left branch fixes it (it must appear in every tree found below) and the
//! right branch excludes it (it is removed from the graph). Leaves whose
//! edge sets are spanning trees are recorded.
//!
//! The search is probabilistically, not exhaustively, complete: an edge
//! choice is retried a bounded number of times before a branch is abandoned,
//! so a run may find fewer trees than the budget allows.
use crate::graph::{edges_connected, Edge};
use ndarray::Array2;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};
use petgraph::unionfind::UnionFind;
use rand::Rng;
use std::collections::BTreeSet;

pub mod run;
pub use self::run::{enumerate, SearchResult, SpanningTreeSearch};

/// The search budget used when the number of spanning trees is unknown.
pub const DEFAULT_BUDGET: usize = 100;
/// The largest budget derived from a spanning tree count.
pub const MAX_BUDGET: usize = 1_000_000;
/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// How to decide whether fixing an edge closes a cycle among fixed edges.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CycleCheck {
    /// Walk the chain of fixed edges starting from the first one, following
    /// the unique edge whose first endpoint is the current edge's second
    /// endpoint. A cycle is reported only if the walk returns to the first
    /// edge. This under-detects cycles in edge lists that do not form a
    /// single directed chain (including every list of normalized edges
    /// with increasing endpoints).
    ChainWalk,
    /// General cycle detection with a union-find over the fixed edges.
    UnionFind,
}

impl Default for CycleCheck {
    fn default() -> CycleCheck {
        CycleCheck::ChainWalk
    }
}

/// Parameters of a spanning tree search.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchParams {
    /// The seed of the RNG used to choose edges.
    pub rng_seed: u64,
    /// The maximum number of distinct spanning trees to find.
    pub budget: usize,
    /// The maximum depth of the decision tree. If `None`, the larger of
    /// the budget and the number of edges is used.
    pub max_depth: Option<usize>,
    /// The cycle check applied to fixed edges.
    pub cycle_check: CycleCheck,
}

impl Default for SearchParams {
    fn default() -> SearchParams {
        SearchParams {
            rng_seed: DEFAULT_SEED,
            budget: DEFAULT_BUDGET,
            max_depth: None,
            cycle_check: CycleCheck::default(),
        }
    }
}

impl SearchParams {
    pub fn new(rng_seed: u64, budget: usize) -> SearchParams {
        SearchParams {
            rng_seed: rng_seed,
            budget: budget,
            ..SearchParams::default()
        }
    }

    /// The depth past which branches are cut off, for a graph with
    /// `num_edges` edges.
    pub fn depth_ceiling(&self, num_edges: usize) -> usize {
        self.max_depth
            .unwrap_or_else(|| std::cmp::max(self.budget, num_edges))
    }
}

/// Converts an exact spanning tree count into a search budget
/// (clamped to [MAX_BUDGET]).
pub fn budget_from_count(count: &BigInt) -> usize {
    if count.is_negative() {
        return 0;
    }
    count.to_usize().map_or(MAX_BUDGET, |c| c.min(MAX_BUDGET))
}

/// A spanning tree, identified by its (unordered) set of edges.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct SpanningTree {
    edges: BTreeSet<Edge>,
}

impl SpanningTree {
    pub fn new<I>(edges: I) -> SpanningTree
    where
        I: IntoIterator<Item = Edge>,
    {
        SpanningTree {
            edges: edges.into_iter().map(|e| Edge::new(e.0, e.1)).collect(),
        }
    }

    /// The tree's edges in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Returns `true` if the edges form a spanning tree of a graph with
    /// `num_nodes` nodes: exactly `num_nodes - 1` edges, all nodes connected.
    pub fn is_spanning_tree_of(&self, num_nodes: usize) -> bool {
        if num_nodes == 0 || self.edges.len() != num_nodes - 1 {
            return false;
        }
        if self.edges.iter().any(|e| e.1 >= num_nodes) {
            return false;
        }
        let edges: Vec<Edge> = self.edges.iter().cloned().collect();
        edges_connected(num_nodes, &edges)
    }

    /// Renders the tree as a 0/1 adjacency matrix on `num_nodes` nodes.
    pub fn adjacency(&self, num_nodes: usize) -> Array2<i64> {
        crate::graph::adjacency_from_edges(num_nodes, self.edges.iter())
    }
}

/// The outcome of a bounded attempt to choose an edge.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EdgeChoice {
    /// A valid edge was found.
    Accepted(Edge),
    /// No valid edge was found within the retry budget; the branch is
    /// abandoned.
    Exhausted,
}

/// Returns `true` if `fixed` followed by `candidate` contains a cycle
/// according to `check`.
pub fn creates_cycle(
    check: CycleCheck,
    num_nodes: usize,
    fixed: &[Edge],
    candidate: Edge,
) -> bool {
    let mut edges = Vec::<Edge>::with_capacity(fixed.len() + 1);
    edges.extend_from_slice(fixed);
    edges.push(candidate);
    match check {
        CycleCheck::ChainWalk => chain_walk_cycle(&edges),
        CycleCheck::UnionFind => union_find_cycle(num_nodes, &edges),
    }
}

/// Follows the chain of edges from `edges[0]`. The walk is bounded by the
/// number of edges, so a loop that never returns to the first edge ends
/// without reporting a cycle.
fn chain_walk_cycle(edges: &[Edge]) -> bool {
    let start = match edges.first() {
        Some(&edge) => edge,
        None => return false,
    };
    let mut current = start;
    for _ in 0..edges.len() {
        let end = current.1;
        let mut next = edges.iter().filter(move |e| e.0 == end);
        match (next.next(), next.next()) {
            (Some(&edge), None) => current = edge,
            _ => return false,
        }
        if current == start {
            return true;
        }
    }
    false
}

fn union_find_cycle(num_nodes: usize, edges: &[Edge]) -> bool {
    let mut uf = UnionFind::<usize>::new(num_nodes);
    edges.iter().any(|&Edge(a, b)| !uf.union(a, b))
}

/// Returns `true` if the graph on `num_nodes` nodes stays connected after
/// removing `candidate` from `edges`.
pub fn removal_keeps_connected(num_nodes: usize, edges: &[Edge], candidate: Edge) -> bool {
    let remaining: Vec<Edge> = edges.iter().filter(|&&e| e != candidate).cloned().collect();
    edges_connected(num_nodes, &remaining)
}

/// Chooses a random edge among `edges` that are not in `fixed` such that
/// removing it keeps the graph connected and fixing it does not close a
/// cycle of fixed edges. Up to `edges.len()` random draws are made.
pub fn select_edge<R: Rng>(
    rng: &mut R,
    num_nodes: usize,
    edges: &[Edge],
    fixed: &[Edge],
    check: CycleCheck,
) -> EdgeChoice {
    let candidates: Vec<Edge> = edges
        .iter()
        .filter(|e| !fixed.contains(e))
        .cloned()
        .collect();
    if candidates.is_empty() {
        return EdgeChoice::Exhausted;
    }
    for _ in 0..edges.len() {
        let edge = candidates[rng.gen_range(0..candidates.len())];
        if !creates_cycle(check, num_nodes, fixed, edge)
            && removal_keeps_connected(num_nodes, edges, edge)
        {
            return EdgeChoice::Accepted(edge);
        }
    }
    EdgeChoice::Exhausted
}
