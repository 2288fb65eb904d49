//! Read-only nearest-neighbor index access.
//!
//! Provides the `VectorIndex` capability trait, an exact flat index, and a
//! codec for the faiss `IndexFlat` on-disk layout.

pub mod faiss;
pub mod flat;
pub mod types;
pub mod vector_index;

pub use faiss::{read_index, write_index};
pub use flat::FlatIndex;
pub use types::{Metric, Neighbor, SearchBatch};
pub use vector_index::VectorIndex;
