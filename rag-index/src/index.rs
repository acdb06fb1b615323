//! Exact in-process vector index.
//!
//! Immutable after [`VectorIndex::build`] or [`VectorIndex::load`]; searches
//! take `&self` so an `Arc<VectorIndex>` can serve concurrent requests
//! without locking.

use tracing::{debug, warn};

use crate::distance::{DistanceMetric, magnitude};
use crate::errors::{IndexError, Result};
use crate::record::{IndexEntry, ScoredDocument};

#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    dimension: usize,
    metric: DistanceMetric,
    entries: Vec<IndexEntry>,
    magnitudes: Vec<f32>,
}

impl VectorIndex {
    /// Builds the index in one pass over `entries`, keeping their order.
    ///
    /// # Errors
    /// - [`IndexError::Config`] if `dimension` is zero
    /// - [`IndexError::DimensionMismatch`] for any vector of another length
    pub fn build(entries: Vec<IndexEntry>, dimension: usize, metric: DistanceMetric) -> Result<Self> {
        if dimension == 0 {
            return Err(IndexError::Config("index dimension must be > 0".into()));
        }
        let mut magnitudes = Vec::with_capacity(entries.len());
        for entry in &entries {
            if entry.vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    got: entry.vector.len(),
                    want: dimension,
                });
            }
            magnitudes.push(magnitude(&entry.vector));
        }

        debug!(entries = entries.len(), dimension, %metric, "vector index built");
        Ok(Self {
            dimension,
            metric,
            entries,
            magnitudes,
        })
    }

    /// Up to `k` nearest entries, ascending by distance; ties keep insertion
    /// order. A query of the wrong length matches nothing.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredDocument> {
        if k == 0 || self.entries.is_empty() {
            return Vec::new();
        }
        if query.len() != self.dimension {
            warn!(
                got = query.len(),
                want = self.dimension,
                "query vector has wrong dimension"
            );
            return Vec::new();
        }

        let q_mag = magnitude(query);
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .zip(&self.magnitudes)
            .enumerate()
            .map(|(i, (e, &mag))| (i, self.metric.distance(query, q_mag, &e.vector, mag)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(i, distance)| ScoredDocument {
                document: self.entries[i].document.clone(),
                distance,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}
