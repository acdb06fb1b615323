//! Data model shared by the chunker, the index and the answer pipeline.

use serde::{Deserialize, Serialize};

/// A slice of corpus text, the unit of retrieval.
///
/// `source_offset` counts characters (not bytes) from the start of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub source_offset: usize,
}

impl Document {
    pub fn new(content: impl Into<String>, source_offset: usize) -> Self {
        Self {
            content: content.into(),
            source_offset,
        }
    }

    /// Offset one past the last character of this document.
    pub fn end_offset(&self) -> usize {
        self.source_offset + self.content.chars().count()
    }
}

/// A document together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub document: Document,
    pub vector: Vec<f32>,
}

/// Search hit: lower `distance` means more similar.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub distance: f32,
}

/// Clamp `s` to at most `max_chars` characters, appending `…` when cut.
pub fn clamp_preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", s[..cut].trim_end()),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_offset_counts_chars() {
        let d = Document::new("héllo", 3);
        assert_eq!(d.end_offset(), 8);
    }

    #[test]
    fn preview_is_clamped_on_char_boundary() {
        assert_eq!(clamp_preview("ééééé", 3), "ééé…");
        assert_eq!(clamp_preview("short", 10), "short");
    }
}
