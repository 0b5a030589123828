//! Property-based tests for aurora
//!
//! These tests verify invariants that must hold for all inputs:
//! - Normalization is idempotent
//! - Exact patterns always match their intent
//! - Replies are never empty
//! - Low verbosity bounds reply length
//!
//! Run with: cargo test --test property_tests

use proptest::prelude::*;

// ============================================================================
// NORMALIZATION TESTS
// ============================================================================

mod normalize_tests {
    use super::*;
    use aurora::text::{lemmatize, normalize};

    proptest! {
        /// Invariant: normalize never panics on any string input
        #[test]
        fn never_panics(s in ".*") {
            let _ = normalize(&s);
        }

        /// Invariant: Normalization is idempotent
        #[test]
        fn idempotent(s in "\\PC{0,100}") {
            let once = normalize(&s);
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Invariant: Lemmatization is idempotent
        #[test]
        fn lemmatize_idempotent(s in "[a-z]{1,20}") {
            let once = lemmatize(&s);
            prop_assert_eq!(lemmatize(&once), once);
        }

        /// Invariant: No leading/trailing or repeated spaces
        #[test]
        fn single_spaced(s in "\\PC{0,100}") {
            let normalized = normalize(&s);
            prop_assert_eq!(normalized.trim(), normalized.as_str());
            prop_assert!(!normalized.contains("  "));
        }

        /// Invariant: Output has no upper-case ASCII
        #[test]
        fn lowercase_output(s in "\\PC{1,50}") {
            let normalized = normalize(&s);
            prop_assert!(normalized.chars().all(|c| !c.is_ascii_uppercase()));
        }
    }
}

// ============================================================================
// MATCHING TESTS
// ============================================================================

mod matching_tests {
    use super::*;
    use aurora::knowledge::default_knowledge_base;
    use aurora::matching::CorpusIndex;
    use aurora::types::{Intent, DEFAULT_MATCH_THRESHOLD};

    proptest! {
        /// Invariant: a pattern with indexable terms matches its own intent at 1.0
        #[test]
        fn exact_pattern_matches_own_intent(words in prop::collection::vec("[a-z]{3,10}", 1..5)) {
            let pattern = words.join(" ");
            let intents = vec![
                Intent::new("target", [pattern.clone()], ["ok"]),
                Intent::new("other", ["completely unrelated zebra"], ["no"]),
            ];
            let index = CorpusIndex::build(&intents).unwrap();
            if !index.encode(&pattern).is_zero() {
                let result = index.match_utterance(&pattern, DEFAULT_MATCH_THRESHOLD);
                prop_assert!(result.is_some());
                let result = result.unwrap();
                prop_assert!((result.score - 1.0).abs() < 1e-4);
                // Identical vectors tie; the earlier row wins
                prop_assert_eq!(result.tag.as_str(), "target");
            }
        }

        /// Invariant: digits-only input never shares vocabulary with the defaults
        #[test]
        fn unrelated_input_never_matches(s in "[0-9]{2,12}( [0-9]{2,12}){0,3}") {
            let index = CorpusIndex::build(&default_knowledge_base().intents).unwrap();
            prop_assert!(index.match_utterance(&s, DEFAULT_MATCH_THRESHOLD).is_none());
        }
    }
}

// ============================================================================
// RESPONSE TESTS
// ============================================================================

mod response_tests {
    use super::*;
    use aurora::knowledge::{default_knowledge_base, KnowledgeBase};
    use aurora::response::adjust;
    use aurora::session::Session;
    use aurora::types::{Mood, Personality, SessionConfig};

    fn mood() -> impl Strategy<Value = Mood> {
        prop_oneof![Just(Mood::Neutral), Just(Mood::Happy), Just(Mood::Serious)]
    }

    proptest! {
        /// Invariant: respond never returns an empty string for non-empty input
        #[test]
        fn reply_never_empty(s in "\\PC{1,60}", empty_kb in any::<bool>(), m in mood()) {
            let kb = if empty_kb { KnowledgeBase::default() } else { default_knowledge_base() };
            let personality = Personality::new("Aurora", m, 0.8, 0.3);
            let config = SessionConfig { seed: Some(1), ..Default::default() };
            let mut session = Session::new(kb, personality, config);
            prop_assert!(!session.respond(&s).is_empty());
        }

        /// Invariant: verbosity 0.3 caps replies at 10 words plus an ellipsis
        #[test]
        fn terse_truncation(words in prop::collection::vec("[a-zA-Z]{1,8}", 1..30)) {
            let text = words.join(" ");
            let personality = Personality::new("Aurora", Mood::Neutral, 0.8, 0.3);
            let adjusted = adjust(&text, &personality);
            if words.len() > 10 {
                prop_assert_eq!(adjusted.split_whitespace().count(), 10);
                prop_assert!(adjusted.ends_with("..."));
                prop_assert_eq!(adjusted.trim_end_matches("..."), words[..10].join(" "));
            } else {
                prop_assert_eq!(adjusted, text);
            }
        }

        /// Invariant: serious mood is idempotent
        #[test]
        fn serious_idempotent(s in "\\PC{0,60}") {
            let personality = Personality::new("Aurora", Mood::Serious, 0.8, 0.9);
            let once = adjust(&s, &personality);
            prop_assert_eq!(adjust(&once, &personality), once);
        }
    }
}
