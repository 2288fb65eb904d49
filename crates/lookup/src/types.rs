//! Lookup result types.

use neighbors_index::Metric;
use serde::{Deserialize, Serialize};

/// The document a lookup was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDoc {
    pub row: usize,
    pub label: String,
}

/// One ranked neighbor with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedNeighbor {
    /// 1-based rank, nearest first
    pub rank: usize,
    pub row: usize,
    /// Squared L2 distance or inner-product similarity, per `metric`
    pub distance: f32,
    pub label: String,
}

/// Complete answer to a lookup, nearest neighbor first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    pub target: TargetDoc,
    pub metric: Metric,
    /// Whether the index searched exhaustively
    pub exact: bool,
    /// Neighbors requested
    pub top_k: usize,
    pub neighbors: Vec<RankedNeighbor>,
}

impl LookupReport {
    /// Labels of the neighbors in rank order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.neighbors.iter().map(|n| n.label.as_str())
    }

    /// Whether the target row is among its own neighbors.
    pub fn contains_self(&self) -> bool {
        self.neighbors.iter().any(|n| n.row == self.target.row)
    }
}
