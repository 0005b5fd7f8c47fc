//! A lightweight simple undirected graph.
use ndarray::Array2;
use petgraph::unionfind::UnionFind;
use serde::Serialize;

/// Edges are unordered pairs of node indices, stored with the smaller
/// index first.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize)]
pub struct Edge(pub usize, pub usize);

impl Edge {
    /// Returns the normalized edge between `a` and `b`.
    pub fn new(a: usize, b: usize) -> Edge {
        if a <= b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    /// Returns `true` if `node` is an endpoint of the edge.
    pub fn touches(&self, node: usize) -> bool {
        self.0 == node || self.1 == node
    }
}

/// A simple undirected graph.
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    /// The number of nodes. Nodes are represented implicitly as `0..num_nodes`.
    pub num_nodes: usize,
    /// The graph's edges, in the order they were discovered.
    /// This order is the search domain order used by [crate::search].
    pub edges: Vec<Edge>,
    /// The graph's adjacencies (list-of-lists format).
    pub neighbors: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds a graph on `num_nodes` nodes from a list of edges.
    /// Edges are normalized; their order is preserved.
    pub fn from_edges(num_nodes: usize, edges: Vec<Edge>) -> Graph {
        let edges: Vec<Edge> = edges.into_iter().map(|e| Edge::new(e.0, e.1)).collect();
        let mut neighbors = vec![Vec::<usize>::new(); num_nodes];
        for &Edge(a, b) in edges.iter() {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        Graph {
            num_nodes: num_nodes,
            edges: edges,
            neighbors: neighbors,
        }
    }

    /// A path on `n` nodes (`0 - 1 - ... - n-1`).
    pub fn path(n: usize) -> Graph {
        let edges = (1..n).map(|i| Edge(i - 1, i)).collect();
        Graph::from_edges(n, edges)
    }

    /// A cycle on `n ≥ 3` nodes.
    pub fn cycle(n: usize) -> Graph {
        assert!(n >= 3, "cycles need at least 3 nodes");
        let mut edges: Vec<Edge> = (1..n).map(|i| Edge(i - 1, i)).collect();
        edges.push(Edge(0, n - 1));
        Graph::from_edges(n, edges)
    }

    /// The complete graph on `n` nodes.
    pub fn complete(n: usize) -> Graph {
        let mut edges = Vec::<Edge>::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push(Edge(i, j));
            }
        }
        Graph::from_edges(n, edges)
    }

    /// A `w`x`h` rectangular grid graph with rook adjacency.
    /// Nodes are numbered in row-major order.
    pub fn rect_grid(w: usize, h: usize) -> Graph {
        let mut edges = Vec::<Edge>::new();
        for row in 0..h {
            for col in 0..w {
                let node = row * w + col;
                if col + 1 < w {
                    edges.push(Edge(node, node + 1));
                }
                if row + 1 < h {
                    edges.push(Edge(node, node + w));
                }
            }
        }
        Graph::from_edges(w * h, edges)
    }

    /// Returns `true` if every node is reachable from every other node.
    pub fn is_connected(&self) -> bool {
        edges_connected(self.num_nodes, &self.edges)
    }

    /// Renders the graph as a 0/1 adjacency matrix.
    pub fn adjacency(&self) -> Array2<i64> {
        adjacency_from_edges(self.num_nodes, self.edges.iter())
    }
}

/// Returns `true` if the graph on `num_nodes` nodes induced by `edges` is
/// connected. Isolated nodes count: a graph with an isolated node (and
/// more than one node) is disconnected.
pub fn edges_connected(num_nodes: usize, edges: &[Edge]) -> bool {
    if num_nodes <= 1 {
        return true;
    }
    if edges.len() < num_nodes - 1 {
        return false;
    }
    let mut uf = UnionFind::<usize>::new(num_nodes);
    let mut components = num_nodes;
    for &Edge(a, b) in edges.iter() {
        if uf.union(a, b) {
            components -= 1;
            if components == 1 {
                return true;
            }
        }
    }
    components == 1
}

/// Renders a set of edges on `num_nodes` nodes as a 0/1 adjacency matrix.
pub fn adjacency_from_edges<'a, I>(num_nodes: usize, edges: I) -> Array2<i64>
where
    I: Iterator<Item = &'a Edge>,
{
    let mut adj = Array2::<i64>::zeros((num_nodes, num_nodes));
    for &Edge(a, b) in edges {
        adj[[a, b]] = 1;
        adj[[b, a]] = 1;
    }
    adj
}
