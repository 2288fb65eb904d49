//! Exact flat index.
//!
//! Stores every vector uncompressed and answers queries by scoring all rows.

use crate::types::{Metric, SearchBatch, MISSING_LABEL};
use crate::vector_index::VectorIndex;
use neighbors_core::{AppError, AppResult};

/// Row-major flat index over `len * dim` floats.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    dim: usize,
    metric: Metric,
    codes: Vec<f32>,
}

impl FlatIndex {
    /// Build an index from concatenated rows of length `dim`.
    pub fn from_codes(dim: usize, metric: Metric, codes: Vec<f32>) -> AppResult<Self> {
        if dim == 0 {
            return Err(AppError::Format(
                "Index dimension must be positive".to_string(),
            ));
        }
        if codes.len() % dim != 0 {
            return Err(AppError::Format(format!(
                "{} floats do not form rows of dimension {}",
                codes.len(),
                dim
            )));
        }
        Ok(Self { dim, metric, codes })
    }

    /// Concatenated stored vectors.
    pub fn codes(&self) -> &[f32] {
        &self.codes
    }

    fn row(&self, row: usize) -> &[f32] {
        let start = row * self.dim;
        &self.codes[start..start + self.dim]
    }

    /// Rank all rows against one query and keep the `k` nearest.
    fn top_k(&self, query: &[f32], k: usize) -> Vec<(f32, usize)> {
        let metric = self.metric;
        let mut scored: Vec<(f32, usize)> = (0..self.len())
            .map(|row| (metric.score(query, self.row(row)), row))
            .collect();

        // Ties resolve to the lower row id.
        let nearer = |a: &(f32, usize), b: &(f32, usize)| {
            metric.compare(a.0, b.0).then(a.1.cmp(&b.1))
        };

        if k < scored.len() {
            scored.select_nth_unstable_by(k - 1, nearer);
            scored.truncate(k);
        }
        scored.sort_unstable_by(nearer);
        scored
    }
}

impl VectorIndex for FlatIndex {
    fn dim(&self) -> usize {
        self.dim
    }

    fn len(&self) -> usize {
        self.codes.len() / self.dim
    }

    fn metric(&self) -> Metric {
        self.metric
    }

    fn is_exact(&self) -> bool {
        true
    }

    fn reconstruct(&self, row: usize) -> AppResult<Vec<f32>> {
        if row >= self.len() {
            return Err(AppError::OutOfRange(format!(
                "row {} is outside the index ({} rows)",
                row,
                self.len()
            )));
        }
        Ok(self.row(row).to_vec())
    }

    fn search(&self, queries: &[f32], k: usize) -> AppResult<SearchBatch> {
        if queries.is_empty() || queries.len() % self.dim != 0 {
            return Err(AppError::Format(format!(
                "Query batch of {} floats does not match index dimension {}",
                queries.len(),
                self.dim
            )));
        }

        let n = queries.len() / self.dim;
        // Results are padded to `k` per query, so the full width must fit.
        let too_wide = || {
            AppError::Argument(format!(
                "top-{} for {} queries is too large to allocate",
                k, n
            ))
        };
        let width = n.checked_mul(k).ok_or_else(too_wide)?;
        let mut distances = Vec::new();
        let mut labels = Vec::new();
        distances.try_reserve_exact(width).map_err(|_| too_wide())?;
        labels.try_reserve_exact(width).map_err(|_| too_wide())?;

        if k > 0 {
            for query in queries.chunks_exact(self.dim) {
                let hits = self.top_k(query, k);
                let found = hits.len();
                for (distance, row) in hits {
                    distances.push(distance);
                    labels.push(row as i64);
                }
                for _ in found..k {
                    distances.push(self.metric.worst());
                    labels.push(MISSING_LABEL);
                }
            }
        }

        tracing::trace!("Searched {} queries for top-{} over {} rows", n, k, self.len());
        Ok(SearchBatch {
            k,
            distances,
            labels,
        })
    }
}
