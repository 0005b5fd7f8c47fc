use crate::search::SpanningTree;
use crate::stats::{SearchCounts, SearchEvent};
use ndarray::Array2;
use num_bigint::BigInt;
use serde_json::{json, Value};
use std::io::{Result, Write};

/// A standard interface for writing search results.
pub trait TreeWriter {
    /// Writes data about the input graph: its adjacency matrix and exact
    /// spanning tree count.
    fn init(&mut self, adjacency: &Array2<i64>, count: &BigInt) -> Result<()>;

    /// Writes the `index`th spanning tree found (0-indexed).
    fn tree(&mut self, index: usize, tree: &SpanningTree) -> Result<()>;

    /// Writes search statistics and flushes the output.
    fn close(&mut self, counts: &SearchCounts) -> Result<()>;
}

/// Writes results in JSONL (JSON Lines) format: one `init` line, one
/// `tree` line per spanning tree, and one `counts` line.
pub struct JSONLWriter<W: Write> {
    out: W,
    /// Determines whether each tree's adjacency matrix is written
    /// alongside its edge list.
    adjacency: bool,
    /// Number of nodes in the graph (known after `init`).
    num_nodes: usize,
}

/// Writes trees in TSV (tab-separated values) format.
///
/// Rows contain the following columns:
///   * `index` - The discovery index of the tree.
///   * `edges` - The tree's edges as a space-separated list of `a-b` pairs.
pub struct TSVWriter<W: Write> {
    out: W,
}

/// Converts an integer matrix to a list of rows.
pub fn matrix_rows(m: &Array2<i64>) -> Vec<Vec<i64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}

impl<W: Write> JSONLWriter<W> {
    pub fn new(out: W, adjacency: bool) -> JSONLWriter<W> {
        JSONLWriter {
            out: out,
            adjacency: adjacency,
            num_nodes: 0,
        }
    }

    /// Consumes the writer, returning the underlying output.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, value: Value) -> Result<()> {
        writeln!(self.out, "{}", value)
    }
}

impl<W: Write> TSVWriter<W> {
    pub fn new(out: W) -> TSVWriter<W> {
        TSVWriter { out: out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TreeWriter for JSONLWriter<W> {
    fn init(&mut self, adjacency: &Array2<i64>, count: &BigInt) -> Result<()> {
        self.num_nodes = adjacency.nrows();
        // Counts can exceed any JSON-safe integer; they're written as strings.
        let init = json!({
            "num_nodes": self.num_nodes,
            "spanning_tree_count": count.to_string(),
            "adjacency": matrix_rows(adjacency),
        });
        self.line(json!({ "init": init }))
    }

    fn tree(&mut self, index: usize, tree: &SpanningTree) -> Result<()> {
        let mut stats = json!({
            "index": index,
            "edges": tree.edges().collect::<Vec<_>>(),
        });
        if self.adjacency {
            if let Some(obj) = stats.as_object_mut() {
                obj.insert(
                    "adjacency".to_string(),
                    json!(matrix_rows(&tree.adjacency(self.num_nodes))),
                );
            }
        }
        self.line(json!({ "tree": stats }))
    }

    fn close(&mut self, counts: &SearchCounts) -> Result<()> {
        self.line(json!({ "counts": counts }))?;
        self.out.flush()
    }
}

impl<W: Write> TreeWriter for TSVWriter<W> {
    fn init(&mut self, _adjacency: &Array2<i64>, count: &BigInt) -> Result<()> {
        writeln!(self.out, "# spanning trees: {}", count)?;
        // TSV column header.
        writeln!(self.out, "index\tedges")
    }

    fn tree(&mut self, index: usize, tree: &SpanningTree) -> Result<()> {
        let edges: Vec<String> = tree.edges().map(|e| format!("{}-{}", e.0, e.1)).collect();
        writeln!(self.out, "{}\t{}", index, edges.join(" "))
    }

    fn close(&mut self, counts: &SearchCounts) -> Result<()> {
        writeln!(
            self.out,
            "# found: {}, dead ends: {}",
            counts.get(SearchEvent::TreeFound),
            counts.dead_ends()
        )?;
        self.out.flush()
    }
}
