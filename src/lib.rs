//! Library definition for stsearch.
pub mod error;
pub mod graph;
pub mod init;
pub mod linalg;
pub mod matrix;
pub mod search;
pub mod stats;
