//! Statistics and output for spanning tree searches.

/// Search event statistics.
mod events;
/// I/O for search results.
mod writers;

pub use crate::stats::events::{SearchCounts, SearchEvent};
pub use crate::stats::writers::{matrix_rows, JSONLWriter, TSVWriter, TreeWriter};
