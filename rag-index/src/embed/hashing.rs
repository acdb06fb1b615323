//! Local embedder based on feature hashing.
//!
//! Tokens are lower-cased alphanumeric runs with common English stop words
//! removed. Each token and each pair of adjacent tokens is hashed with blake3
//! into one of `dim` buckets with a hash-derived sign, then the vector is
//! L2-normalised. No model weights, no network, never fails.

use std::{future::Future, pin::Pin};

use crate::embed::EmbeddingsProvider;
use crate::errors::{IndexError, Result};

pub const DEFAULT_DIM: usize = 384;

const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by", "can",
    "could", "did", "do", "does", "for", "from", "had", "has", "have", "how", "i", "if", "in",
    "is", "it", "its", "me", "much", "my", "of", "on", "or", "our", "please", "should", "so",
    "that", "the", "their", "them", "there", "these", "they", "this", "those", "to", "us", "was",
    "we", "were", "what", "when", "where", "which", "who", "will", "with", "would", "you",
    "your",
];

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// # Errors
    /// [`IndexError::Config`] if `dim` is zero.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(IndexError::Config("embedding dimension must be > 0".into()));
        }
        Ok(Self { dim })
    }

    /// Synchronous core of [`EmbeddingsProvider::embed`].
    pub fn embed_sync(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut v = vec![0.0f32; self.dim];

        for token in &tokens {
            self.accumulate(&mut v, token);
        }
        for pair in tokens.windows(2) {
            self.accumulate(&mut v, &format!("{} {}", pair[0], pair[1]));
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }

    fn accumulate(&self, v: &mut [f32], feature: &str) {
        let hash = blake3::hash(feature.as_bytes());
        let b = hash.as_bytes();
        let bucket = u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]);
        let sign = if b[8] & 1 == 0 { 1.0 } else { -1.0 };
        v[(bucket % self.dim as u64) as usize] += sign;
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}

impl EmbeddingsProvider for HashingEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.embed_sync(text)) })
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn model_id(&self) -> String {
        format!("hashing-v1/{}", self.dim)
    }
}
