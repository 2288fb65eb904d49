//! Index type definitions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label used for padding slots when fewer than `k` rows exist.
pub const MISSING_LABEL: i64 = -1;

/// Distance metric a serialized index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Squared euclidean distance, smaller is nearer
    L2,
    /// Dot product, larger is nearer
    InnerProduct,
}

impl Metric {
    /// Numeric code stored in faiss headers.
    pub fn code(self) -> i32 {
        match self {
            Metric::InnerProduct => 0,
            Metric::L2 => 1,
        }
    }

    /// Inverse of [`Metric::code`].
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Metric::InnerProduct),
            1 => Some(Metric::L2),
            _ => None,
        }
    }

    /// Score between two equal-length vectors under this metric.
    pub fn score(self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Metric::L2 => a
                .iter()
                .zip(b)
                .map(|(x, y)| {
                    let d = x - y;
                    d * d
                })
                .sum(),
            Metric::InnerProduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
        }
    }

    /// Ordering that puts nearer scores first.
    pub fn compare(self, a: f32, b: f32) -> Ordering {
        match self {
            Metric::L2 => a.total_cmp(&b),
            Metric::InnerProduct => b.total_cmp(&a),
        }
    }

    /// Score written into padding slots.
    pub fn worst(self) -> f32 {
        match self {
            Metric::L2 => f32::INFINITY,
            Metric::InnerProduct => f32::NEG_INFINITY,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Row id in the index
    pub row: usize,
    /// Distance (L2) or similarity (inner product) to the query
    pub distance: f32,
}

/// Result of a batched search, laid out like faiss output.
///
/// `distances` and `labels` hold `k` entries per query, row-major.
/// Slots past the number of stored rows carry `MISSING_LABEL`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBatch {
    pub k: usize,
    pub distances: Vec<f32>,
    pub labels: Vec<i64>,
}

impl SearchBatch {
    /// Number of queries in the batch.
    pub fn queries(&self) -> usize {
        if self.k == 0 {
            0
        } else {
            self.labels.len() / self.k
        }
    }

    /// Real hits for query `q`, nearest first.
    pub fn neighbors(&self, q: usize) -> impl Iterator<Item = Neighbor> + '_ {
        let start = q * self.k;
        let end = (start + self.k).min(self.labels.len());
        let start = start.min(end);

        self.labels[start..end]
            .iter()
            .zip(&self.distances[start..end])
            .filter(|(label, _)| **label >= 0)
            .map(|(label, distance)| Neighbor {
                row: *label as usize,
                distance: *distance,
            })
    }
}
