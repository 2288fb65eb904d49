//! Document similarity lookup.
//!
//! Maps a document row id to the labels of its nearest documents using an
//! id table and a prebuilt vector index.

pub mod corpus;
pub mod id_table;
pub mod types;

// Re-export commonly used types
pub use corpus::Corpus;
pub use id_table::IdTable;
pub use types::{LookupReport, RankedNeighbor, TargetDoc};
pub use neighbors_index::Metric;
