//! Text normalization shared by indexing and querying
//!
//! `normalize` lower-cases, splits into word tokens, reduces each token to
//! its noun base form and rejoins with single spaces. Patterns and
//! utterances go through the same path so surface variation (case,
//! punctuation, plurals) does not prevent a match.

mod lemmatizer;
mod stop_words;

pub use lemmatizer::lemmatize;
pub use stop_words::is_stop_word;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Split text into lower-cased word tokens; punctuation separates tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Canonical form of `text`; empty input yields an empty string
pub fn normalize(text: &str) -> String {
    tokenize(text)
        .iter()
        .map(|token| lemmatize(token))
        .collect::<Vec<_>>()
        .join(" ")
}
