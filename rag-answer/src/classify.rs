//! Request classification ahead of retrieval.
//!
//! Short conversational messages ("hi", "thanks", "ok") are answered from a
//! data-driven table of [`Intent`]s and never reach the index or the model.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::PipelineError;

/// A canned reply and the phrases that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Intent {
    pub name: String,
    pub phrases: Vec<String>,
    pub reply: String,
}

impl Intent {
    fn new(name: &str, phrases: &[&str], reply: &str) -> Self {
        Self {
            name: name.to_string(),
            phrases: phrases.iter().map(|p| normalize(p)).collect(),
            reply: reply.to_string(),
        }
    }
}

/// Result of [`Classifier::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// Blank input.
    Empty,
    /// Matches a canned intent.
    Canned(&'a Intent),
    /// Needs retrieval.
    Substantive,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    intents: Vec<Intent>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(default_intents())
    }
}

impl Classifier {
    pub fn new(intents: Vec<Intent>) -> Self {
        let intents = intents
            .into_iter()
            .map(|i| Intent {
                phrases: i.phrases.iter().map(|p| normalize(p)).collect(),
                ..i
            })
            .collect();
        Self { intents }
    }

    /// Built-in intents merged with a JSON array of [`Intent`]s from `path`.
    /// An intent whose name already exists replaces the built-in one.
    ///
    /// # Errors
    /// [`PipelineError::Config`] if the file cannot be read or parsed.
    pub fn with_overrides(path: &Path) -> Result<Self, PipelineError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("cannot read intents {}: {e}", path.display()))
        })?;
        let extra: Vec<Intent> = serde_json::from_str(&raw).map_err(|e| {
            PipelineError::Config(format!("cannot parse intents {}: {e}", path.display()))
        })?;

        let mut intents = default_intents();
        for intent in extra {
            match intents.iter_mut().find(|i| i.name == intent.name) {
                Some(slot) => *slot = intent,
                None => intents.push(intent),
            }
        }
        info!(path = %path.display(), intents = intents.len(), "intents loaded");
        Ok(Self::new(intents))
    }

    pub fn classify(&self, query: &str) -> Classification<'_> {
        let norm = normalize(query);
        if norm.is_empty() {
            return Classification::Empty;
        }
        self.intents
            .iter()
            .find(|i| i.phrases.iter().any(|p| *p == norm))
            .map_or(Classification::Substantive, Classification::Canned)
    }
}

/// Lower-case, trim surrounding punctuation and whitespace, collapse inner
/// whitespace.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase()
}

fn default_intents() -> Vec<Intent> {
    vec![
        Intent::new(
            "greeting",
            &[
                "hi", "hello", "hey", "hiya", "good morning", "good afternoon", "good evening",
            ],
            "Hello! Ask me anything about this website and I'll do my best to help.",
        ),
        Intent::new(
            "thanks",
            &["thanks", "thank you", "thx", "thanks a lot", "many thanks"],
            "You're welcome! Is there anything else you'd like to know?",
        ),
        Intent::new(
            "farewell",
            &["bye", "goodbye", "see you", "see ya"],
            "Goodbye! Come back any time you have a question.",
        ),
        Intent::new(
            "acknowledgement",
            &["yes", "no", "ok", "okay", "sure", "yep", "nope", "cool"],
            "Alright. What else would you like to know about the website?",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization() {
        assert_eq!(normalize("  Hello!!  "), "hello");
        assert_eq!(normalize("Good \t  MORNING."), "good morning");
        assert_eq!(normalize(" ?! "), "");
    }

    #[test]
    fn classifies_blank_greeting_and_questions() {
        let c = Classifier::default();
        assert_eq!(c.classify("   "), Classification::Empty);
        assert_eq!(c.classify(""), Classification::Empty);
        assert!(matches!(c.classify("Hi!"), Classification::Canned(i) if i.name == "greeting"));
        assert!(matches!(c.classify("thank you"), Classification::Canned(i) if i.name == "thanks"));
        assert_eq!(c.classify("hi, what plans do you offer?"), Classification::Substantive);
    }

    #[test]
    fn overrides_replace_and_extend_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intents.json");
        std::fs::write(
            &path,
            r#"[
                {"name": "greeting", "phrases": ["Howdy"], "reply": "Howdy partner!"},
                {"name": "hours", "phrases": ["opening hours"], "reply": "We are open 9-5."}
            ]"#,
        )
        .unwrap();

        let c = Classifier::with_overrides(&path).unwrap();
        assert!(matches!(c.classify("howdy"), Classification::Canned(i) if i.reply == "Howdy partner!"));
        assert_eq!(c.classify("hello"), Classification::Substantive);
        assert!(matches!(c.classify("Opening hours?"), Classification::Canned(i) if i.name == "hours"));
    }

    #[test]
    fn bad_intents_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intents.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Classifier::with_overrides(&path),
            Err(PipelineError::Config(_))
        ));
    }
}
