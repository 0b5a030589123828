//! Noun-form lemmatizer
//!
//! Reduces plural nouns to their base form using an irregular-noun
//! exception table and guarded suffix rules. Rules are applied until the
//! token stops changing, so `lemmatize(lemmatize(w)) == lemmatize(w)`.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Irregular plurals. Every value is a fixed point of [`step`].
static EXCEPTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("lice", "louse"),
        ("oxen", "ox"),
        ("people", "people"),
        ("wolves", "wolf"),
        ("knives", "knife"),
        ("lives", "life"),
        ("wives", "wife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("thieves", "thief"),
        ("selves", "self"),
        ("goes", "go"),
        ("heroes", "hero"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("echoes", "echo"),
        ("buses", "bus"),
        ("biases", "bias"),
        ("aliases", "alias"),
        ("ourselves", "ourselves"),
        ("yourselves", "yourselves"),
        ("themselves", "themselves"),
    ]
    .into_iter()
    .collect()
});

/// Words ending in `s` that are not plurals
static PROTECTED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "always", "perhaps", "was", "has", "does", "is", "this", "his", "hers", "its", "ours",
        "yours", "theirs", "us", "yes", "thus", "news", "series", "species", "physics",
        "mathematics", "whereas", "besides", "sometimes", "afterwards", "towards", "nowadays",
        "less", "unless", "across", "bias", "alias", "atlas", "canvas", "christmas",
    ]
    .into_iter()
    .collect()
});

/// Suffixes that mark a word as not a regular plural
const NON_PLURAL_ENDINGS: &[&str] = &["ss", "us", "is", "ous"];

/// `es` plurals that drop the whole `es`
const ES_ENDINGS: &[&str] = &["sses", "xes", "zes", "ches", "shes"];

/// Plurals of `-us` nouns that drop the whole `es`
const US_ES_ENDINGS: &[&str] = &["tuses", "nuses", "puses", "iruses"];

/// Minimum characters before any suffix rule applies
const MIN_RULE_LENGTH: usize = 4;

/// Reduce a lower-cased token to its noun base form
pub fn lemmatize(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = step(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One reduction: an exception lookup or a single suffix rule
fn step(word: &str) -> String {
    if let Some(base) = EXCEPTIONS.get(word) {
        return (*base).to_string();
    }
    if PROTECTED.contains(word) || word.chars().count() < MIN_RULE_LENGTH {
        return word.to_string();
    }
    if !word.ends_with('s') || NON_PLURAL_ENDINGS.iter().any(|e| word.ends_with(e)) {
        return word.to_string();
    }

    if word.ends_with("ies") && word.chars().count() > MIN_RULE_LENGTH {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ES_ENDINGS
        .iter()
        .chain(US_ES_ENDINGS)
        .any(|e| word.ends_with(e))
    {
        return word[..word.len() - 2].to_string();
    }
    word[..word.len() - 1].to_string()
}
