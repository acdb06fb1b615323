//! Prompt builder: persona, grounding rules, ranked context, question.

use rag_index::ScoredDocument;

/// Default persona for website answers.
pub const DEFAULT_PERSONA: &str = "You are a helpful assistant for this website. \
Answer visitors' questions in a friendly, concise way.";

/// Grounding rules rendered into every prompt.
pub const GROUNDING_RULES: &str = "\
Rules:
- Answer ONLY with information found in the context below.
- If the context does not contain the answer, say explicitly that this information is not available on the website.
- Never invent facts, prices, dates or contact details.";

const SEPARATOR: &str = "\n-----\n";

/// Renders the instruction string handed to the language model.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    persona: String,
    max_context_chars: usize,
}

impl PromptAssembler {
    pub fn new(persona: impl Into<String>, max_context_chars: usize) -> Self {
        Self {
            persona: persona.into(),
            max_context_chars,
        }
    }

    /// Prompt over retrieved documents, kept in ranking order.
    ///
    /// # Example
    /// ```
    /// use rag_answer::PromptAssembler;
    /// let p = PromptAssembler::new("You help.", 2000).assemble("Any plans?", &[]);
    /// assert!(p.contains("Question:"));
    /// ```
    pub fn assemble(&self, question: &str, docs: &[ScoredDocument]) -> String {
        let blocks: Vec<&str> = docs.iter().map(|d| d.document.content.trim()).collect();
        self.render(question, &blocks, self.max_context_chars)
    }

    /// Prompt with the whole corpus as one context block. Never clipped.
    pub fn assemble_full_corpus(&self, question: &str, corpus: &str) -> String {
        self.render(question, &[corpus.trim()], usize::MAX)
    }

    fn render(&self, question: &str, blocks: &[&str], budget: usize) -> String {
        let mut out = String::new();
        out.push_str(self.persona.trim());
        out.push_str("\n\n");
        out.push_str(GROUNDING_RULES);
        out.push_str("\n\nContext:");

        let mut budget = budget;
        for (i, text) in blocks.iter().enumerate() {
            let header = format!("[{}]\n", i + 1);
            let header_len = header.chars().count();
            if header_len >= budget {
                break;
            }
            out.push_str(if i == 0 { "\n" } else { SEPARATOR });
            out.push_str(&header);
            budget -= header_len;

            let len = text.chars().count();
            if len > budget {
                out.push_str(safe_truncate(text, budget));
                out.push('…');
                break;
            }
            out.push_str(text);
            budget -= len;
        }
        if blocks.is_empty() {
            out.push_str("\n(no context)");
        }

        out.push_str("\n\nQuestion:\n");
        out.push_str(question.trim());
        out.push_str("\n\nAnswer:");
        out
    }
}

/// First `max` characters of `s`, cut on a char boundary.
fn safe_truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
