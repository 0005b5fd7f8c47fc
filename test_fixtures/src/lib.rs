/// Graph matrix fixtures for integration tests and benchmarks.
use stsearch::init::{graph_matrix_from_file, MatrixKind};
use stsearch::matrix::GraphMatrix;
use std::path::PathBuf;

/// The location of the graph JSON data w.r.t. the project manifest.
const GRAPH_FIXTURES_DIR: &str = "graphs";

/// Loads a graph matrix fixture (ground truth set, everything derived).
///
/// Keys (with exact spanning tree counts):
///   * `K1` - a single node (1).
///   * `P2` - a single edge (1).
///   * `E2` - two isolated nodes (0).
///   * `C4` - the 4-cycle (4).
///   * `K4` - the complete graph on 4 nodes (16).
///   * `diamond` - K4 minus one edge, given as an incidence matrix (8).
///   * `grid3x3` - the 3x3 rook grid (192).
///   * `petersen` - the Petersen graph (2000).
pub fn graph_fixture(key: &str) -> GraphMatrix {
    let (filename, kind) = match key {
        "K1" => ("K1.json", MatrixKind::Adjacency),
        "P2" => ("P2.json", MatrixKind::Adjacency),
        "E2" => ("E2.json", MatrixKind::Adjacency),
        "C4" => ("C4.json", MatrixKind::Adjacency),
        "K4" => ("K4.json", MatrixKind::Adjacency),
        "diamond" => ("diamond_incidence.json", MatrixKind::Incidence),
        "grid3x3" => ("grid3x3.json", MatrixKind::Adjacency),
        "petersen" => ("petersen.json", MatrixKind::Adjacency),
        bad => panic!("Unknown graph fixture '{}'", bad),
    };

    // stable dir: see https://stackoverflow.com/a/30004252
    let mut full_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    full_path.push(GRAPH_FIXTURES_DIR);
    full_path.push(filename);
    let path_str = full_path.into_os_string().into_string().unwrap();
    return graph_matrix_from_file(&path_str, kind).unwrap();
}
