//! Response selection
//!
//! Provides:
//! - Reply template choice (uniform random or first, seedable)
//! - Placeholder rendering (`{time}`, `{date}`, `{name}`)
//! - Fixed fallback pool for unmatched input
//! - Tone adjustment and follow-up rules (submodules)

pub mod follow_up;
pub mod tone;

pub use follow_up::{default_follow_ups, FollowUpRule, FollowUpTable, NO_TIMEZONE_SUPPORT};
pub use tone::adjust;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::types::{Intent, Personality, SelectionStrategy};

/// Replies used when no intent clears the threshold
pub const FALLBACK_RESPONSES: [&str; 4] = [
    "I'm not sure I understand. Could you rephrase that?",
    "That's an interesting point. Could you elaborate?",
    "I'm still learning. Can you ask me something else?",
    "I don't have enough information to answer that properly.",
];

/// Picks reply templates and fallbacks
pub struct ResponseSelector {
    strategy: SelectionStrategy,
    rng: StdRng,
    follow_ups: FollowUpTable,
}

impl ResponseSelector {
    /// Create a selector; `seed` makes random choices reproducible
    pub fn new(strategy: SelectionStrategy, seed: Option<u64>, follow_ups: FollowUpTable) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            strategy,
            rng,
            follow_ups,
        }
    }

    pub fn follow_ups(&self) -> &FollowUpTable {
        &self.follow_ups
    }

    /// Choose one of `options` according to the strategy
    pub fn choose<'a>(&mut self, options: &'a [String]) -> Option<&'a String> {
        match self.strategy {
            SelectionStrategy::Random => options.choose(&mut self.rng),
            SelectionStrategy::First => options.first(),
        }
    }

    /// Pick and render a reply for a matched intent
    pub fn pick_response(&mut self, intent: &Intent, personality: &Personality) -> Option<String> {
        let template = self.choose(&intent.responses)?;
        Some(render_template(template, personality, Local::now()))
    }

    /// Pick a reply from the fallback pool
    pub fn fallback(&mut self) -> String {
        let chosen = match self.strategy {
            SelectionStrategy::Random => FALLBACK_RESPONSES.choose(&mut self.rng),
            SelectionStrategy::First => FALLBACK_RESPONSES.first(),
        };
        chosen.copied().unwrap_or(FALLBACK_RESPONSES[0]).to_string()
    }
}

/// Substitute known placeholders; unknown ones are left verbatim
pub fn render_template(template: &str, personality: &Personality, now: DateTime<Local>) -> String {
    if !template.contains('{') {
        return template.to_string();
    }
    template
        .replace("{time}", &now.format("%H:%M:%S").to_string())
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
        .replace("{name}", &personality.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_render_template() {
        let p = Personality::default();
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            render_template("At {time} on {date}, {name} says {hi}", &p, now),
            "At 07:05:01 on 2024-03-09, Aurora says {hi}"
        );
        assert_eq!(render_template("plain", &p, now), "plain");
    }

    #[test]
    fn test_first_strategy_is_deterministic() {
        let mut selector =
            ResponseSelector::new(SelectionStrategy::First, None, FollowUpTable::empty());
        let intent = Intent::new("t", ["x"], ["one", "two", "three"]);
        let p = Personality::default();
        for _ in 0..5 {
            assert_eq!(selector.pick_response(&intent, &p).unwrap(), "one");
        }
        assert_eq!(selector.fallback(), FALLBACK_RESPONSES[0]);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let intent = Intent::new("t", ["x"], ["one", "two", "three", "four"]);
        let p = Personality::default();
        let draw = |seed| {
            let mut selector = ResponseSelector::new(
                SelectionStrategy::Random,
                Some(seed),
                FollowUpTable::empty(),
            );
            (0..10)
                .map(|_| selector.pick_response(&intent, &p).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
        assert!(draw(7).iter().all(|r| intent.responses.contains(r)));
    }

    #[test]
    fn test_fallback_from_pool() {
        let mut selector =
            ResponseSelector::new(SelectionStrategy::Random, Some(1), FollowUpTable::empty());
        for _ in 0..20 {
            let reply = selector.fallback();
            assert!(FALLBACK_RESPONSES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_empty_responses_yield_none() {
        let mut selector =
            ResponseSelector::new(SelectionStrategy::Random, Some(1), FollowUpTable::empty());
        let intent = Intent {
            tag: "t".to_string(),
            patterns: vec!["x".to_string()],
            responses: vec![],
        };
        assert!(selector.pick_response(&intent, &Personality::default()).is_none());
    }
}
