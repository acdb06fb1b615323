//! Embedding executor with bounded concurrency and dimension checks.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use crate::embed::EmbeddingsProvider;
use crate::errors::{IndexError, Result};
use crate::progress::Progress;
use crate::record::{Document, IndexEntry};

/// Embeds every document, at most `concurrency` calls in flight.
///
/// Output order matches `docs` regardless of completion order.
///
/// # Errors
/// Stops at the first provider error, or with
/// [`IndexError::DimensionMismatch`] when a vector has the wrong length.
pub async fn embed_documents(
    docs: Vec<Document>,
    provider: &dyn EmbeddingsProvider,
    concurrency: usize,
    progress: &dyn Progress,
) -> Result<Vec<IndexEntry>> {
    let want = provider.dim();
    info!(total = docs.len(), concurrency, "embedding documents");
    progress.set_total(docs.len() as u64);

    let mut entries: Vec<(usize, IndexEntry)> = stream::iter(docs.into_iter().enumerate())
        .map(move |(i, document)| async move {
            let vector = provider.embed(&document.content).await?;
            if vector.len() != want {
                return Err(IndexError::DimensionMismatch {
                    got: vector.len(),
                    want,
                });
            }
            progress.step("embedding");
            Ok::<_, IndexError>((i, IndexEntry { document, vector }))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    entries.sort_by_key(|(i, _)| *i);
    debug!(embedded = entries.len(), "embeddings filled");

    Ok(entries.into_iter().map(|(_, entry)| entry).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use std::{future::Future, pin::Pin};

    use super::*;
    use crate::progress::NoopProgress;

    /// Finishes later calls first to shuffle completion order.
    struct SlowFirst {
        calls: AtomicUsize,
    }

    impl EmbeddingsProvider for SlowFirst {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20u64.saturating_sub(n as u64 * 5))).await;
                Ok(vec![text.len() as f32, 1.0])
            })
        }
        fn dim(&self) -> usize {
            2
        }
        fn model_id(&self) -> String {
            "slow-first".into()
        }
    }

    struct WrongDim;

    impl EmbeddingsProvider for WrongDim {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
            Box::pin(async { Ok(vec![0.0; 3]) })
        }
        fn dim(&self) -> usize {
            2
        }
        fn model_id(&self) -> String {
            "wrong".into()
        }
    }

    #[tokio::test]
    async fn keeps_document_order() {
        let docs: Vec<Document> = ["a", "bb", "ccc", "dddd"]
            .iter()
            .enumerate()
            .map(|(i, t)| Document::new(*t, i * 10))
            .collect();
        let provider = SlowFirst {
            calls: AtomicUsize::new(0),
        };

        let entries = embed_documents(docs, &provider, 4, &NoopProgress).await.unwrap();
        let lens: Vec<f32> = entries.iter().map(|e| e.vector[0]).collect();
        assert_eq!(lens, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(entries[3].document.source_offset, 30);
    }

    #[tokio::test]
    async fn rejects_wrong_dimension() {
        let docs = vec![Document::new("x", 0)];
        let err = embed_documents(docs, &WrongDim, 2, &NoopProgress).await.unwrap_err();
        assert!(matches!(err, IndexError::DimensionMismatch { got: 3, want: 2 }));
    }

    #[tokio::test]
    async fn runs_inside_a_spawned_task() {
        let docs = vec![Document::new("spawned", 0), Document::new("task", 8)];
        let provider = std::sync::Arc::new(SlowFirst {
            calls: AtomicUsize::new(0),
        });
        let handle = tokio::spawn(async move {
            embed_documents(docs, provider.as_ref(), 2, &NoopProgress).await
        });
        let entries = handle.await.unwrap().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].document.content, "task");
    }
}
