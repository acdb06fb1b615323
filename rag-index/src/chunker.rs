//! Overlapping character-window chunking.
//!
//! Windows hold at most `chunk_size` characters. When a window does not reach
//! the end of the corpus, the cut is moved back to the latest natural boundary
//! inside `(start + chunk_overlap, start + chunk_size]`, trying in order:
//!
//! 1. paragraph break (`"\n\n"`)
//! 2. line break
//! 3. sentence end (`.`, `!` or `?` followed by whitespace)
//! 4. any whitespace
//! 5. hard cut at `start + chunk_size`
//!
//! The next window starts exactly `chunk_overlap` characters before the cut,
//! so consecutive chunks share `chunk_overlap` characters and no text is lost.

use crate::errors::{IndexError, Result};
use crate::record::Document;

/// Window sizing in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl ChunkerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(IndexError::Config("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(IndexError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Chunker {
    cfg: ChunkerConfig,
}

impl Chunker {
    /// # Errors
    /// [`IndexError::Config`] when the sizes are inconsistent.
    pub fn new(cfg: ChunkerConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> ChunkerConfig {
        self.cfg
    }

    /// Splits `text` into ordered, overlapping documents. Empty text yields none.
    pub fn chunk(&self, text: &str) -> Vec<Document> {
        let chars: Vec<char> = text.chars().collect();
        let n = chars.len();
        let ChunkerConfig {
            chunk_size,
            chunk_overlap,
        } = self.cfg;

        let mut out = Vec::with_capacity(n / (chunk_size - chunk_overlap) + 1);
        let mut start = 0usize;

        while start < n {
            let window_end = (start + chunk_size).min(n);
            if window_end == n {
                out.push(slice(&chars, start, n));
                break;
            }

            let cut = find_cut(&chars, start + chunk_overlap + 1, window_end);
            out.push(slice(&chars, start, cut));
            start = cut - chunk_overlap;
        }

        out
    }
}

fn slice(chars: &[char], start: usize, end: usize) -> Document {
    Document::new(chars[start..end].iter().collect::<String>(), start)
}

type BoundaryTest = fn(&[char], usize) -> bool;

/// Latest cut position in `lo..=hi` for the strongest boundary kind present.
/// Requires `1 <= lo <= hi < chars.len()`.
fn find_cut(chars: &[char], lo: usize, hi: usize) -> usize {
    const TIERS: [BoundaryTest; 4] = [
        is_paragraph_break,
        is_line_break,
        is_sentence_end,
        is_whitespace,
    ];

    TIERS
        .iter()
        .find_map(|test| (lo..=hi).rev().find(|&c| test(chars, c)))
        .unwrap_or(hi)
}

fn is_paragraph_break(chars: &[char], c: usize) -> bool {
    c >= 2 && chars[c - 1] == '\n' && chars[c - 2] == '\n'
}

fn is_line_break(chars: &[char], c: usize) -> bool {
    chars[c - 1] == '\n'
}

fn is_sentence_end(chars: &[char], c: usize) -> bool {
    matches!(chars[c - 1], '.' | '!' | '?') && chars.get(c).is_some_and(|ch| ch.is_whitespace())
}

fn is_whitespace(chars: &[char], c: usize) -> bool {
    chars[c - 1].is_whitespace()
}

/// Rebuilds the source text from chunks by dropping each chunk's overlap with
/// the previous one.
pub fn reconstruct(chunks: &[Document]) -> String {
    let mut out = String::new();
    let mut covered = 0usize;
    for doc in chunks {
        let skip = covered.saturating_sub(doc.source_offset);
        out.extend(doc.content.chars().skip(skip));
        covered = covered.max(doc.end_offset());
    }
    out
}
