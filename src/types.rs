//! Core types for Aurora

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Similarity a match must strictly exceed to be accepted
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.5;

/// A named category of user request with example phrasings and replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    /// Unique identifier within a knowledge base
    pub tag: String,
    /// Example phrases used to build the similarity index
    pub patterns: Vec<String>,
    /// Reply templates, one is picked per matched turn
    pub responses: Vec<String>,
}

impl Intent {
    pub fn new(
        tag: impl Into<String>,
        patterns: impl IntoIterator<Item = impl Into<String>>,
        responses: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            tag: tag.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    /// Check the structural invariants: non-empty tag, patterns and responses,
    /// and no blank entry in either list
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tag.trim().is_empty() {
            return Err("tag is empty".to_string());
        }
        if self.patterns.is_empty() {
            return Err(format!("intent '{}' has no patterns", self.tag));
        }
        if self.responses.is_empty() {
            return Err(format!("intent '{}' has no responses", self.tag));
        }
        if self.patterns.iter().any(|p| p.trim().is_empty()) {
            return Err(format!("intent '{}' has a blank pattern", self.tag));
        }
        if self.responses.iter().any(|r| r.trim().is_empty()) {
            return Err(format!("intent '{}' has a blank response", self.tag));
        }
        Ok(())
    }
}

/// Conversation state remembered across turns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Tag of the most recently matched intent
    #[serde(default)]
    pub last_intent: Option<String>,
    /// Pending follow-up marker (the tag that armed it)
    #[serde(default)]
    pub follow_up: Option<String>,
}

/// Mood used for tone adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Neutral,
    Happy,
    Serious,
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mood::Neutral => write!(f, "neutral"),
            Mood::Happy => write!(f, "happy"),
            Mood::Serious => write!(f, "serious"),
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Mood::Neutral),
            "happy" => Ok(Mood::Happy),
            "serious" => Ok(Mood::Serious),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

/// Personality parameters, fixed for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub name: String,
    #[serde(default)]
    pub mood: Mood,
    /// 0.0 - 1.0, higher answers faster
    pub responsiveness: f32,
    /// 0.0 - 1.0, below 0.5 long replies are truncated
    pub verbosity: f32,
}

impl Personality {
    /// Build a personality, clamping both traits into [0, 1]
    pub fn new(name: impl Into<String>, mood: Mood, responsiveness: f32, verbosity: f32) -> Self {
        Self {
            name: name.into(),
            mood,
            responsiveness: clamp_unit(responsiveness),
            verbosity: clamp_unit(verbosity),
        }
    }
}

impl Default for Personality {
    fn default() -> Self {
        Self::new("Aurora", Mood::Neutral, 0.8, 0.7)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One raw utterance as received, for the session audit trail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtteranceLogEntry {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a successful intent match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Tag of the intent owning the best pattern
    pub tag: String,
    /// Cosine similarity of the best pattern
    pub score: f32,
    /// Row of the best pattern in the corpus index
    pub pattern_index: usize,
}

/// How a reply template is picked from an intent's response list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Uniform random draw
    #[default]
    Random,
    /// Always the first entry
    First,
}

impl std::str::FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(SelectionStrategy::Random),
            "first" => Ok(SelectionStrategy::First),
            _ => Err(format!("Unknown selection strategy: {}", s)),
        }
    }
}

/// When the corpus index is refreshed after the intents change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Rebuild immediately on every edit
    #[default]
    Eager,
    /// Mark stale and rebuild on the next turn
    Lazy,
}

/// Per-session matching and selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Match threshold, compared with strict greater-than
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub selection: SelectionStrategy,
    /// Seed for the response RNG; `None` seeds from entropy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub index_policy: IndexPolicy,
}

fn default_threshold() -> f32 {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            selection: SelectionStrategy::Random,
            seed: None,
            index_policy: IndexPolicy::Eager,
        }
    }
}

/// Configuration for the background chat worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Lower bound of the simulated thinking delay
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,
    /// Upper bound of the simulated thinking delay (capped below 2s)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Size of the command and event channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Emit a welcome message when the worker starts
    #[serde(default = "default_greet")]
    pub greet: bool,
}

fn default_min_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    1500
}

fn default_channel_capacity() -> usize {
    32
}

fn default_greet() -> bool {
    true
}

impl WorkerConfig {
    /// No artificial delay, useful for tests and scripted use
    pub fn immediate() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Default::default()
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            channel_capacity: default_channel_capacity(),
            greet: default_greet(),
        }
    }
}
