//! The word source seam and helpers for sources backed by a language model.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::Result;

/// Produces words conceptually related to a given word.
///
/// Implementations should try to leave out anything in `existing_words` (case-insensitively),
/// but callers re-filter anyway. Any transport or parsing problem must be an error, never a
/// partial list.
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
pub trait WordSource: Send + Sync {
    async fn generate_related(&self, word: &str, existing_words: &[String]) -> Result<Vec<String>>;
}

/// Trim, drop blanks, and drop anything already in `existing` or earlier in `candidates`,
/// comparing case-insensitively. Keeps the first spelling seen and the original order.
pub fn filter_unique_words(candidates: &[String], existing: &[String]) -> Vec<String> {
    let mut seen: HashSet<String> = existing.iter().map(|w| w.trim().to_lowercase()).collect();
    candidates
        .iter()
        .filter_map(|w| {
            let word = w.trim();
            if word.is_empty() || !seen.insert(word.to_lowercase()) {
                None
            } else {
                Some(word.to_string())
            }
        })
        .collect()
}

/// Instruction text asking a model for related words.
pub fn related_words_prompt(word: &str, existing_words: &[String]) -> String {
    format!(
        "Generate between 5 and 10 diverse but conceptually related words for the term \"{}\". \
         Do not include any of the following words in your response: {}.",
        word,
        existing_words.join(", ")
    )
}

/// JSON schema for the expected response: `{ "words": [string] }`.
pub fn related_words_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "words": {
                "type": "array",
                "items": { "type": "string", "description": "A related word" }
            }
        },
        "required": ["words"]
    })
}

#[derive(Debug, Deserialize)]
struct RelatedWords {
    words: Vec<String>,
}

/// Parse a model response matching [`related_words_schema`].
pub fn parse_related_words(response: &str) -> Result<Vec<String>> {
    let parsed: RelatedWords = serde_json::from_str(response.trim())?;
    Ok(parsed.words)
}
