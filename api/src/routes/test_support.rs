use std::sync::Arc;

use axum::response::Response;
use rag_answer::{AnswerConfig, AnswerMode, Classifier, PipelineParts, RagPipeline, Retriever};
use rag_index::{
    Chunker, ChunkerConfig, Corpus, DistanceMetric, EmbeddingsProvider, HashingEmbedder,
    IndexBootstrap, NoopProgress,
};

pub async fn extractive_pipeline() -> Arc<RagPipeline> {
    Arc::new(extractive_rag().await)
}

/// Extractive pipeline over a two-plan price list; needs no model.
pub async fn extractive_rag() -> RagPipeline {
    let corpus = Corpus::from_text("Plan A costs $10/mo. Plan B costs $20/mo.");
    let chunker = Chunker::new(ChunkerConfig {
        chunk_size: 30,
        chunk_overlap: 5,
    })
    .unwrap();
    let embedder: Arc<dyn EmbeddingsProvider> = Arc::new(HashingEmbedder::new(4096).unwrap());
    let index = IndexBootstrap::new("unused.json", DistanceMetric::Cosine, 2)
        .build(&corpus, &chunker, embedder.as_ref(), &NoopProgress)
        .await
        .unwrap();

    let cfg = AnswerConfig {
        mode: AnswerMode::Extractive,
        max_distance: 0.7,
        ..AnswerConfig::default()
    };
    let parts = PipelineParts {
        corpus,
        retriever: Some(Retriever::new(embedder, Arc::new(index))),
        generator: None,
        classifier: Classifier::default(),
        report: None,
    };
    RagPipeline::from_parts(cfg, parts).unwrap()
}

pub async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
