//! Vector index abstraction.
//!
//! Defines the read-only capability the lookup needs from an index.

use crate::types::{Metric, SearchBatch};
use neighbors_core::AppResult;

/// Trait for vector index backends.
///
/// Implementations must support:
/// - Reconstructing the stored vector at a row id
/// - Searching for the top-k nearest rows of a batch of queries
///
/// Row ids are stable integers in `[0, len())`.
pub trait VectorIndex: Send + Sync {
    /// Dimension of every stored vector.
    fn dim(&self) -> usize;

    /// Number of stored rows.
    fn len(&self) -> usize;

    /// Whether the index holds no rows.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Metric the index ranks by.
    fn metric(&self) -> Metric;

    /// Whether search is exhaustive, so a stored vector always finds itself.
    fn is_exact(&self) -> bool;

    /// Return the vector stored at `row`.
    fn reconstruct(&self, row: usize) -> AppResult<Vec<f32>>;

    /// Search the `k` nearest rows for each query in a row-major batch of
    /// `n * dim()` floats.
    ///
    /// Returns hits ordered nearest first per query.
    fn search(&self, queries: &[f32], k: usize) -> AppResult<SearchBatch>;
}
