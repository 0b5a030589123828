//! Personality-driven tone adjustment
//!
//! Mood styling is applied first, then verbosity truncation, so brevity
//! holds regardless of mood.

use crate::types::{Mood, Personality};

/// Replies with more words than this are cut when verbosity is low
pub const MAX_TERSE_WORDS: usize = 10;

/// Verbosity below which replies are truncated
pub const TERSE_VERBOSITY: f32 = 0.5;

/// Appended to truncated replies
pub const ELLIPSIS: &str = "...";

/// Adjust a selected reply to the personality's mood and verbosity
pub fn adjust(text: &str, personality: &Personality) -> String {
    let styled = match personality.mood {
        Mood::Happy => cheerful(text),
        Mood::Serious => capitalize_first(text),
        Mood::Neutral => text.to_string(),
    };

    if personality.verbosity < TERSE_VERBOSITY {
        truncate_words(&styled, MAX_TERSE_WORDS)
    } else {
        styled
    }
}

/// Sentence-final periods become `!`, question marks become `?!`
fn cheerful(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '.' => {
                let prev_is_dot = i > 0 && chars[i - 1] == '.';
                let next = chars.get(i + 1);
                let sentence_end = next.map_or(true, |n| n.is_whitespace());
                if sentence_end && !prev_is_dot {
                    out.push('!');
                } else {
                    out.push('.');
                }
            }
            '?' => out.push_str("?!"),
            _ => out.push(c),
        }
    }
    out
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Keep the first `max` whitespace-delimited words plus an ellipsis
fn truncate_words(text: &str, max: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > max {
        format!("{}{}", words[..max].join(" "), ELLIPSIS)
    } else {
        text.to_string()
    }
}
