//! Context-dependent follow-up rules
//!
//! A rule fires when the previous turn matched its intent and the new
//! utterance contains one of its keywords. Rules live in a lookup table
//! keyed by intent tag, so adding one is a single `with_rule` call.

use std::collections::HashMap;

use tracing::debug;

use crate::types::ConversationContext;

/// Reply for timezone questions after a time answer
pub const NO_TIMEZONE_SUPPORT: &str = "I currently don't have timezone conversion capabilities.";

/// One `(keywords) -> response` entry under an intent tag
#[derive(Debug, Clone)]
pub struct FollowUpRule {
    /// Lower-cased keywords, matched as substrings of the utterance
    pub keywords: Vec<String>,
    pub response: String,
}

/// Follow-up rules keyed by the tag of the previous match
#[derive(Debug, Clone, Default)]
pub struct FollowUpTable {
    rules: HashMap<String, Vec<FollowUpRule>>,
}

impl FollowUpTable {
    /// Table with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add a rule under `tag`; rules for a tag are tried in insertion order
    pub fn with_rule(
        mut self,
        tag: impl Into<String>,
        keywords: impl IntoIterator<Item = impl Into<String>>,
        response: impl Into<String>,
    ) -> Self {
        let rule = FollowUpRule {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            response: response.into(),
        };
        self.rules.entry(tag.into()).or_default().push(rule);
        self
    }

    /// Whether a match on `tag` should arm a follow-up
    pub fn has_rules_for(&self, tag: &str) -> bool {
        self.rules.get(tag).is_some_and(|rules| !rules.is_empty())
    }

    /// Response of the first rule for `last_intent` whose keyword occurs in `utterance`
    pub fn lookup(&self, utterance: &str, last_intent: Option<&str>) -> Option<&str> {
        let rules = self.rules.get(last_intent?)?;
        let lowered = utterance.to_lowercase();
        rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.response.as_str())
    }

    /// Resolve a pending follow-up; the marker is cleared either way
    pub fn handle_follow_up(
        &self,
        utterance: &str,
        context: &mut ConversationContext,
    ) -> Option<String> {
        let response = self
            .lookup(utterance, context.last_intent.as_deref())
            .map(str::to_string);
        debug!(
            last_intent = ?context.last_intent,
            hit = response.is_some(),
            "Resolved follow-up"
        );
        context.follow_up = None;
        response
    }
}

/// The built-in rules: timezone questions after a time answer
pub fn default_follow_ups() -> FollowUpTable {
    FollowUpTable::empty().with_rule(
        "time",
        ["difference", "zone", "timezone"],
        NO_TIMEZONE_SUPPORT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(last: Option<&str>) -> ConversationContext {
        ConversationContext {
            last_intent: last.map(String::from),
            follow_up: last.map(String::from),
        }
    }

    #[test]
    fn test_time_difference_rule() {
        let table = default_follow_ups();
        let mut ctx = context(Some("time"));
        let reply = table.handle_follow_up("what about the time difference", &mut ctx);
        assert_eq!(reply.as_deref(), Some(NO_TIMEZONE_SUPPORT));
        assert!(ctx.follow_up.is_none());
        assert_eq!(ctx.last_intent.as_deref(), Some("time"));
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let table = default_follow_ups();
        assert!(table.lookup("Which TimeZone?", Some("time")).is_some());
    }

    #[test]
    fn test_miss_clears_marker() {
        let table = default_follow_ups();
        let mut ctx = context(Some("time"));
        assert!(table.handle_follow_up("tell me a joke", &mut ctx).is_none());
        assert!(ctx.follow_up.is_none());

        let mut ctx = context(Some("greeting"));
        assert!(table.handle_follow_up("time zone", &mut ctx).is_none());
        assert!(ctx.follow_up.is_none());

        let mut ctx = context(None);
        assert!(table.handle_follow_up("time zone", &mut ctx).is_none());
    }

    #[test]
    fn test_custom_rules_in_order() {
        let table = FollowUpTable::empty()
            .with_rule("weather", ["rain"], "Bring an umbrella.")
            .with_rule("weather", ["rain", "snow"], "Dress warmly.");
        assert!(table.has_rules_for("weather"));
        assert!(!table.has_rules_for("time"));
        assert_eq!(
            table.lookup("will it rain", Some("weather")),
            Some("Bring an umbrella.")
        );
        assert_eq!(
            table.lookup("will it snow", Some("weather")),
            Some("Dress warmly.")
        );
    }
}
