//! Utility functions for loading graph matrices.
use crate::matrix::{matrix_from_rows, GraphMatrix};
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use serde_json::Value;
use std::fs;

/// Which ground-truth representation a matrix file holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MatrixKind {
    Adjacency,
    /// Node×edge incidence.
    Incidence,
}

/// Parses a matrix from JSON. Two layouts are accepted: a bare list of
/// rows (`[[0, 1], [1, 0]]`), or an object with the rows under `matrix`
/// (`{"matrix": [[0, 1], [1, 0]]}`); other keys in the object are ignored.
pub fn matrix_from_json(raw: &str) -> Result<Array2<i64>> {
    let data: Value = serde_json::from_str(raw).context("Could not parse matrix JSON")?;
    let raw_rows = match &data {
        Value::Array(rows) => rows,
        Value::Object(obj) => obj
            .get("matrix")
            .and_then(|m| m.as_array())
            .context("Could not find `matrix`")?,
        _ => bail!("Expected a list of rows or an object with `matrix`"),
    };

    let mut rows = Vec::<Vec<i64>>::with_capacity(raw_rows.len());
    for (r, raw_row) in raw_rows.iter().enumerate() {
        let entries = raw_row
            .as_array()
            .with_context(|| format!("Row {} is not a list", r))?;
        let row = entries
            .iter()
            .enumerate()
            .map(|(c, v)| {
                v.as_i64()
                    .with_context(|| format!("Entry ({}, {}) is not an integer", r, c))
            })
            .collect::<Result<Vec<i64>>>()?;
        rows.push(row);
    }
    Ok(matrix_from_rows(&rows)?)
}

/// Loads a matrix from a JSON file (see [matrix_from_json]).
pub fn load_matrix(path: &str) -> Result<Array2<i64>> {
    // TODO: should load from a generic buffer.
    let raw = fs::read_to_string(path).with_context(|| format!("Could not load {}", path))?;
    matrix_from_json(&raw).with_context(|| format!("Invalid matrix in {}", path))
}

/// Loads a matrix file of the given kind and derives the remaining matrices.
pub fn graph_matrix_from_file(path: &str, kind: MatrixKind) -> Result<GraphMatrix> {
    let matrix = load_matrix(path)?;
    let mut graph_matrix = GraphMatrix::new();
    let set = match kind {
        MatrixKind::Adjacency => graph_matrix.set_adjacency(matrix),
        MatrixKind::Incidence => graph_matrix.set_incidence(matrix),
    };
    set.with_context(|| format!("Input in {} is not a valid {:?} matrix", path, kind))?;
    graph_matrix.derive_all()?;
    Ok(graph_matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn bare_rows() {
        assert_eq!(
            matrix_from_json("[[0, 1], [1, 0]]").unwrap(),
            arr2(&[[0, 1], [1, 0]])
        );
    }

    #[test]
    fn object_with_matrix() {
        let raw = r#"{"name": "edge", "matrix": [[1], [1]]}"#;
        assert_eq!(matrix_from_json(raw).unwrap(), arr2(&[[1], [1]]));
    }

    #[test]
    fn missing_matrix_key() {
        let err = matrix_from_json(r#"{"rows": []}"#).unwrap_err();
        assert!(err.to_string().contains("Could not find `matrix`"));
    }

    #[test]
    fn non_integer_entry() {
        let err = matrix_from_json("[[0, 0.5], [1, 0]]").unwrap_err();
        assert!(err.to_string().contains("Entry (0, 1)"));
    }

    #[test]
    fn ragged_rows() {
        let err = matrix_from_json("[[0, 1], [1]]").unwrap_err();
        assert!(format!("{:#}", err).contains("row 1 has 1 entries"));
    }

    #[test]
    fn missing_file() {
        assert!(load_matrix("/nonexistent/graph.json").is_err());
    }
}
