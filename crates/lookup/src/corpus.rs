//! A labelled corpus: id table plus vector index.

use crate::id_table::IdTable;
use crate::types::{LookupReport, RankedNeighbor, TargetDoc};
use neighbors_core::{AppError, AppResult};
use neighbors_index::{read_index, VectorIndex};
use std::path::Path;

/// Id table paired with the index built over the same documents.
///
/// Construction guarantees every index row has a label.
pub struct Corpus {
    ids: IdTable,
    index: Box<dyn VectorIndex>,
}

impl std::fmt::Debug for Corpus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corpus")
            .field("labels", &self.ids.len())
            .field("rows", &self.index.len())
            .field("dim", &self.index.dim())
            .field("metric", &self.index.metric())
            .finish()
    }
}

impl Corpus {
    /// Load the id table, then the index, and check they agree.
    pub fn open(id_table_path: &Path, index_path: &Path) -> AppResult<Self> {
        let ids = IdTable::load(id_table_path)?;
        let index = read_index(index_path)?;

        tracing::debug!(
            "Opened corpus: {} labels, {} vectors of dimension {} ({:?})",
            ids.len(),
            index.len(),
            index.dim(),
            index.metric()
        );

        Self::new(ids, index)
    }

    /// Pair an id table with an index.
    ///
    /// Fails when the index has rows the table cannot label.
    pub fn new(ids: IdTable, index: Box<dyn VectorIndex>) -> AppResult<Self> {
        if ids.len() < index.len() {
            return Err(AppError::OutOfRange(format!(
                "id table has {} lines but the index has {} rows",
                ids.len(),
                index.len()
            )));
        }
        if ids.len() > index.len() {
            tracing::debug!(
                "Id table has {} extra lines without vectors",
                ids.len() - index.len()
            );
        }
        Ok(Self { ids, index })
    }

    /// Number of documents that can be queried.
    pub fn len(&self) -> usize {
        self.ids.len().min(self.index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Find the `top_k` nearest documents to document `doc_num`.
    ///
    /// All bounds are checked before searching, so a failed lookup
    /// produces no partial result.
    pub fn lookup(&self, doc_num: usize, top_k: usize) -> AppResult<LookupReport> {
        let _span = tracing::debug_span!("lookup", doc_num, top_k).entered();

        if doc_num >= self.len() {
            return Err(AppError::OutOfRange(format!(
                "document {} does not exist (valid range is 0..{})",
                doc_num,
                self.len()
            )));
        }

        let target = TargetDoc {
            row: doc_num,
            label: self.ids.get(doc_num)?.to_string(),
        };

        // Rows beyond the index would only be padding.
        let query = self.index.reconstruct(doc_num)?;
        let batch = self.index.search(&query, top_k.min(self.index.len()))?;

        let neighbors = batch
            .neighbors(0)
            .enumerate()
            .map(|(i, hit)| -> AppResult<RankedNeighbor> {
                Ok(RankedNeighbor {
                    rank: i + 1,
                    row: hit.row,
                    distance: hit.distance,
                    label: self.ids.get(hit.row)?.to_string(),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let report = LookupReport {
            target,
            metric: self.index.metric(),
            exact: self.index.is_exact(),
            top_k,
            neighbors,
        };

        if report.exact && !report.contains_self() {
            tracing::debug!(
                "Document {} not among its own neighbors (duplicate vectors?)",
                doc_num
            );
        }
        tracing::debug!("Found {} neighbors", report.neighbors.len());

        Ok(report)
    }
}
