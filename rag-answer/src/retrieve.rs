//! Query embedding + nearest-neighbour lookup.

use std::sync::Arc;

use rag_index::{EmbeddingsProvider, ScoredDocument, VectorIndex};
use tracing::debug;

use crate::error::PipelineError;

/// Pure composition of an embedder and an index; holds no other state.
#[derive(Clone)]
pub struct Retriever {
    embedder: Arc<dyn EmbeddingsProvider>,
    index: Arc<VectorIndex>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingsProvider>, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Top-`k` documents for `query`, most similar first.
    ///
    /// # Errors
    /// [`PipelineError::ModelUnavailable`] if the query cannot be embedded.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>, PipelineError> {
        let qv = self.embedder.embed(query).await?;
        let hits = self.index.search(&qv, k);
        debug!(
            k,
            hits = hits.len(),
            best = hits.first().map(|h| h.distance),
            "retrieval done"
        );
        Ok(hits)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_index::{
        Chunker, ChunkerConfig, Corpus, DistanceMetric, HashingEmbedder, IndexBootstrap,
        NoopProgress,
    };

    #[tokio::test]
    async fn finds_the_passage_sharing_terms_with_the_query() {
        let corpus = Corpus::from_text(
            "Our office is in Springfield.\n\nFibre 500 costs $45/mo.\n\nSupport is open 24/7.",
        );
        let chunker = Chunker::new(ChunkerConfig {
            chunk_size: 40,
            chunk_overlap: 5,
        })
        .unwrap();
        let embedder = Arc::new(HashingEmbedder::new(512).unwrap());
        let index = IndexBootstrap::new("unused.json", DistanceMetric::Cosine, 2)
            .build(&corpus, &chunker, embedder.as_ref(), &NoopProgress)
            .await
            .unwrap();

        let retriever = Retriever::new(embedder, Arc::new(index));
        let hits = retriever.retrieve("When is support open?", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits[0].document.content.contains("Support is open"));
    }
}
