//! Structural matrices of a simple undirected graph.
//!
//! A [GraphMatrix] is defined by exactly one ground-truth matrix (adjacency
//! or incidence). Everything else (the other representation, the degree
//! matrix, the Laplacian, the Laplacian adjugate, and the number of spanning
//! trees) is derived from it once and cached.
//!
//! Incidence matrices are node×edge: column `e` has a 1 in the rows of both
//! endpoints of edge `e`.
use crate::error::{MatrixError, Result};
use crate::graph::{adjacency_from_edges, Edge, Graph};
use crate::linalg::{adjugate, to_bigint};
use log::{debug, info};
use ndarray::Array2;
use num_bigint::BigInt;
use std::collections::HashSet;

/// The user-supplied matrix that defines the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GroundTruth {
    Adjacency(Array2<i64>),
    Incidence(Array2<i64>),
}

/// Matrices computed from the ground truth.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedMatrices {
    pub adjacency: Array2<i64>,
    pub incidence: Array2<i64>,
    /// Edges in incidence column order.
    pub edges: Vec<Edge>,
    pub degree: Array2<i64>,
    pub laplacian: Array2<i64>,
    pub laplacian_adjugate: Array2<BigInt>,
    /// Top-left entry of the Laplacian adjugate (Kirchhoff's theorem).
    pub spanning_tree_count: BigInt,
}

/// Lifecycle of a [GraphMatrix].
#[derive(Clone, Debug, PartialEq)]
pub enum MatrixState {
    Empty,
    GroundTruthSet(GroundTruth),
    Derived(GroundTruth, Box<DerivedMatrices>),
}

/// Result of a successful call to [GraphMatrix::derive_all].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Derivation {
    /// The remaining matrices were computed by this call.
    Computed,
    /// The remaining matrices were already cached; nothing was done.
    AlreadyComputed,
}

/// Stores a graph's defining matrix and the matrices derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphMatrix {
    state: MatrixState,
}

impl Default for GraphMatrix {
    fn default() -> GraphMatrix {
        GraphMatrix {
            state: MatrixState::Empty,
        }
    }
}

impl GraphMatrix {
    pub fn new() -> GraphMatrix {
        GraphMatrix::default()
    }

    /// Builds a fully derived [GraphMatrix] from an adjacency matrix.
    pub fn from_adjacency(adjacency: Array2<i64>) -> Result<GraphMatrix> {
        let mut matrix = GraphMatrix::new();
        matrix.set_adjacency(adjacency)?;
        matrix.derive_all()?;
        Ok(matrix)
    }

    /// Builds a fully derived [GraphMatrix] from a (node×edge) incidence matrix.
    pub fn from_incidence(incidence: Array2<i64>) -> Result<GraphMatrix> {
        let mut matrix = GraphMatrix::new();
        matrix.set_incidence(incidence)?;
        matrix.derive_all()?;
        Ok(matrix)
    }

    /// Sets the adjacency matrix as ground truth, discarding any previously
    /// derived matrices. No derivation happens until [GraphMatrix::derive_all].
    pub fn set_adjacency(&mut self, adjacency: Array2<i64>) -> Result<()> {
        validate_adjacency(&adjacency)?;
        self.state = MatrixState::GroundTruthSet(GroundTruth::Adjacency(adjacency));
        Ok(())
    }

    /// Sets the incidence matrix as ground truth, discarding any previously
    /// derived matrices. No derivation happens until [GraphMatrix::derive_all].
    pub fn set_incidence(&mut self, incidence: Array2<i64>) -> Result<()> {
        validate_incidence(&incidence)?;
        self.state = MatrixState::GroundTruthSet(GroundTruth::Incidence(incidence));
        Ok(())
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> &MatrixState {
        &self.state
    }

    /// Returns `true` once the remaining matrices have been derived.
    pub fn is_derived(&self) -> bool {
        matches!(self.state, MatrixState::Derived(..))
    }

    /// Computes the remaining matrices from the ground truth.
    ///
    /// Idempotent: once derived, further calls return
    /// [Derivation::AlreadyComputed] without recomputing anything.
    pub fn derive_all(&mut self) -> Result<Derivation> {
        let ground_truth = match &self.state {
            MatrixState::Empty => return Err(MatrixError::IncompleteDefinition),
            MatrixState::Derived(..) => {
                info!("Matrices already computed. Skipping.");
                return Ok(Derivation::AlreadyComputed);
            }
            MatrixState::GroundTruthSet(ground_truth) => ground_truth.clone(),
        };
        let derived = derive(&ground_truth);
        debug!(
            "Derived matrices for {} nodes and {} edges ({} spanning trees)",
            derived.adjacency.nrows(),
            derived.edges.len(),
            derived.spanning_tree_count
        );
        self.state = MatrixState::Derived(ground_truth, Box::new(derived));
        Ok(Derivation::Computed)
    }

    fn derived(&self) -> Result<&DerivedMatrices> {
        match &self.state {
            MatrixState::Derived(_, derived) => Ok(&**derived),
            _ => Err(MatrixError::IncompleteDefinition),
        }
    }

    /// The ground-truth matrix, if one has been set.
    pub fn ground_truth(&self) -> Option<&GroundTruth> {
        match &self.state {
            MatrixState::Empty => None,
            MatrixState::GroundTruthSet(ground_truth) => Some(ground_truth),
            MatrixState::Derived(ground_truth, _) => Some(ground_truth),
        }
    }

    pub fn adjacency(&self) -> Result<&Array2<i64>> {
        Ok(&self.derived()?.adjacency)
    }

    /// The node×edge incidence matrix.
    pub fn incidence(&self) -> Result<&Array2<i64>> {
        Ok(&self.derived()?.incidence)
    }

    pub fn degree(&self) -> Result<&Array2<i64>> {
        Ok(&self.derived()?.degree)
    }

    pub fn laplacian(&self) -> Result<&Array2<i64>> {
        Ok(&self.derived()?.laplacian)
    }

    pub fn laplacian_adjugate(&self) -> Result<&Array2<BigInt>> {
        Ok(&self.derived()?.laplacian_adjugate)
    }

    /// The edges, indexed by incidence column.
    pub fn edges(&self) -> Result<&[Edge]> {
        Ok(&self.derived()?.edges)
    }

    pub fn num_nodes(&self) -> Result<usize> {
        Ok(self.derived()?.adjacency.nrows())
    }

    /// The exact number of spanning trees (entry `[0, 0]` of the
    /// Laplacian adjugate).
    pub fn spanning_tree_count(&self) -> Result<&BigInt> {
        Ok(&self.derived()?.spanning_tree_count)
    }

    /// The graph view used by the spanning tree search. Edge order matches
    /// incidence column order.
    pub fn graph(&self) -> Result<Graph> {
        let derived = self.derived()?;
        Ok(Graph::from_edges(
            derived.adjacency.nrows(),
            derived.edges.clone(),
        ))
    }
}

/// Builds an integer matrix from a list of rows.
pub fn matrix_from_rows(rows: &[Vec<i64>]) -> Result<Array2<i64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, |row| row.len());
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(MatrixError::InvalidMatrix(format!(
            "row {} has {} entries (expected {})",
            idx,
            row.len(),
            n_cols
        )));
    }
    let flat: Vec<i64> = rows.iter().flat_map(|row| row.iter().cloned()).collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| MatrixError::InvalidMatrix(e.to_string()))
}

fn invalid<T>(msg: String) -> Result<T> {
    Err(MatrixError::InvalidMatrix(msg))
}

fn check_binary(m: &Array2<i64>, kind: &str) -> Result<()> {
    if let Some(((r, c), v)) = m.indexed_iter().find(|(_, &v)| v != 0 && v != 1) {
        return invalid(format!(
            "{} matrix entry ({}, {}) is {} (expected 0 or 1)",
            kind, r, c, v
        ));
    }
    Ok(())
}

/// Checks that `adjacency` is a nonempty square, symmetric 0/1 matrix with
/// a zero diagonal.
pub fn validate_adjacency(adjacency: &Array2<i64>) -> Result<()> {
    let (rows, cols) = adjacency.dim();
    if rows != cols {
        return invalid(format!("adjacency matrix is {}x{} (not square)", rows, cols));
    }
    if rows == 0 {
        return invalid("adjacency matrix is empty".to_string());
    }
    check_binary(adjacency, "adjacency")?;
    for i in 0..rows {
        if adjacency[[i, i]] != 0 {
            return invalid(format!("adjacency matrix has a self-loop at node {}", i));
        }
        for j in (i + 1)..rows {
            if adjacency[[i, j]] != adjacency[[j, i]] {
                return invalid(format!(
                    "adjacency matrix is not symmetric at ({}, {})",
                    i, j
                ));
            }
        }
    }
    Ok(())
}

/// Checks that `incidence` is a 0/1 node×edge matrix with at least one row,
/// exactly two 1-entries per column, and no repeated columns.
pub fn validate_incidence(incidence: &Array2<i64>) -> Result<()> {
    if incidence.nrows() == 0 {
        return invalid("incidence matrix has no rows".to_string());
    }
    check_binary(incidence, "incidence")?;
    let mut seen = HashSet::<Edge>::with_capacity(incidence.ncols());
    for (idx, column) in incidence.columns().into_iter().enumerate() {
        let sum: i64 = column.sum();
        if sum != 2 {
            return invalid(format!(
                "incidence column {} sums to {} (expected 2)",
                idx, sum
            ));
        }
        let edge = column_edge(column.iter());
        if !seen.insert(edge) {
            return invalid(format!(
                "incidence column {} repeats edge ({}, {})",
                idx, edge.0, edge.1
            ));
        }
    }
    Ok(())
}

/// Reads the edge encoded by a validated incidence column.
fn column_edge<'a, I>(column: I) -> Edge
where
    I: Iterator<Item = &'a i64>,
{
    let mut ends = column
        .enumerate()
        .filter(|(_, &v)| v == 1)
        .map(|(node, _)| node);
    let a = ends.next().unwrap_or(0);
    let b = ends.next().unwrap_or(a);
    Edge::new(a, b)
}

/// Adjacency from incidence: `A[i][j] = 1` iff `(M·Mᵗ)[i][j] > 0`, with the
/// diagonal zeroed.
pub fn incidence_to_adjacency(incidence: &Array2<i64>) -> Array2<i64> {
    let n = incidence.nrows();
    let product = incidence.dot(&incidence.t());
    let mut adj = product.mapv(|v| if v > 0 { 1 } else { 0 });
    for i in 0..n {
        adj[[i, i]] = 0;
    }
    adj
}

/// Incidence from adjacency. Edges are discovered in row-major order over
/// the upper triangle; the discovery order fixes the column indices.
pub fn adjacency_to_incidence(adjacency: &Array2<i64>) -> (Array2<i64>, Vec<Edge>) {
    let n = adjacency.nrows();
    let mut edges = Vec::<Edge>::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if adjacency[[i, j]] == 1 {
                edges.push(Edge(i, j));
            }
        }
    }
    (incidence_from_edges(n, &edges), edges)
}

fn incidence_from_edges(num_nodes: usize, edges: &[Edge]) -> Array2<i64> {
    let mut incidence = Array2::<i64>::zeros((num_nodes, edges.len()));
    for (idx, &Edge(a, b)) in edges.iter().enumerate() {
        incidence[[a, idx]] = 1;
        incidence[[b, idx]] = 1;
    }
    incidence
}

/// The diagonal matrix of node degrees (adjacency row sums).
pub fn degree_matrix(adjacency: &Array2<i64>) -> Array2<i64> {
    Array2::from_diag(&adjacency.sum_axis(ndarray::Axis(1)))
}

/// `L = D - A`.
pub fn laplacian_matrix(adjacency: &Array2<i64>, degree: &Array2<i64>) -> Array2<i64> {
    degree - adjacency
}

fn derive(ground_truth: &GroundTruth) -> DerivedMatrices {
    let (adjacency, incidence, edges) = match ground_truth {
        GroundTruth::Adjacency(adjacency) => {
            let (incidence, edges) = adjacency_to_incidence(adjacency);
            (adjacency.clone(), incidence, edges)
        }
        GroundTruth::Incidence(incidence) => {
            let edges: Vec<Edge> = incidence
                .columns()
                .into_iter()
                .map(|column| column_edge(column.iter()))
                .collect();
            let adjacency = incidence_to_adjacency(incidence);
            debug_assert_eq!(
                adjacency,
                adjacency_from_edges(incidence.nrows(), edges.iter())
            );
            (adjacency, incidence.clone(), edges)
        }
    };
    let degree = degree_matrix(&adjacency);
    let laplacian = laplacian_matrix(&adjacency, &degree);
    let laplacian_adjugate = adjugate(&to_bigint(&laplacian));
    let spanning_tree_count = laplacian_adjugate[[0, 0]].clone();
    DerivedMatrices {
        adjacency: adjacency,
        incidence: incidence,
        edges: edges,
        degree: degree,
        laplacian: laplacian,
        laplacian_adjugate: laplacian_adjugate,
        spanning_tree_count: spanning_tree_count,
    }
}
