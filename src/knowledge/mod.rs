//! Knowledge base: intents plus conversation context
//!
//! Persisted as a single JSON snapshot:
//!
//! ```json
//! {
//!   "intents": [{"tag": "...", "patterns": ["..."], "responses": ["..."]}],
//!   "context": {"last_intent": null, "follow_up": null}
//! }
//! ```
//!
//! Loading never fails: a missing or corrupt file yields the built-in
//! default. Individual malformed intents are skipped with a warning.
//! Saving surfaces every error to the caller.

mod defaults;

pub use defaults::default_knowledge_base;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{AuroraError, Result};
use crate::types::{ConversationContext, Intent};

/// Intents (unique by tag, in insertion order) and conversation context
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub intents: Vec<Intent>,
    #[serde(default)]
    pub context: ConversationContext,
}

/// Document shape before per-entry validation
#[derive(Deserialize)]
struct RawSnapshot {
    intents: Vec<serde_json::Value>,
    #[serde(default)]
    context: Option<serde_json::Value>,
}

impl KnowledgeBase {
    /// Load the snapshot at `path`, substituting the default on any failure
    pub fn load(path: impl AsRef<Path>) -> KnowledgeBase {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No knowledge base found, using defaults");
                return default_knowledge_base();
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Unreadable knowledge base, using defaults"
                );
                return default_knowledge_base();
            }
        };

        match Self::from_json(&content) {
            Ok(kb) => {
                info!(path = %path.display(), intents = kb.intents.len(), "Loaded knowledge base");
                kb
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Corrupt knowledge base, using defaults");
                default_knowledge_base()
            }
        }
    }

    /// Parse a snapshot, skipping malformed or duplicate intents
    pub fn from_json(content: &str) -> Result<KnowledgeBase> {
        let raw: RawSnapshot = serde_json::from_str(content)?;

        let mut intents = Vec::with_capacity(raw.intents.len());
        let mut seen: HashSet<String> = HashSet::new();

        for (position, value) in raw.intents.into_iter().enumerate() {
            let intent: Intent = match serde_json::from_value(value) {
                Ok(intent) => intent,
                Err(e) => {
                    warn!(position, error = %e, "Skipping malformed intent");
                    continue;
                }
            };
            if let Err(reason) = intent.validate() {
                warn!(position, %reason, "Skipping invalid intent");
                continue;
            }
            if !seen.insert(intent.tag.clone()) {
                warn!(position, tag = %intent.tag, "Skipping duplicate intent tag");
                continue;
            }
            intents.push(intent);
        }

        let context = match raw.context {
            None | Some(serde_json::Value::Null) => ConversationContext::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring malformed context");
                ConversationContext::default()
            }),
        };

        Ok(KnowledgeBase { intents, context })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrite the snapshot at `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), intents = self.intents.len(), "Saved knowledge base");
        Ok(())
    }

    pub fn intent(&self, tag: &str) -> Option<&Intent> {
        self.intents.iter().find(|i| i.tag == tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|i| i.tag.as_str())
    }

    pub fn pattern_count(&self) -> usize {
        self.intents.iter().map(|i| i.patterns.len()).sum()
    }

    /// Add an intent, or replace the one with the same tag in place
    pub fn upsert_intent(&mut self, intent: Intent) -> Result<()> {
        intent.validate().map_err(AuroraError::InvalidIntent)?;
        match self.intents.iter_mut().find(|i| i.tag == intent.tag) {
            Some(existing) => *existing = intent,
            None => self.intents.push(intent),
        }
        Ok(())
    }

    /// Remove an intent; context pointers to it are cleared
    pub fn remove_intent(&mut self, tag: &str) -> Result<Intent> {
        let position = self
            .intents
            .iter()
            .position(|i| i.tag == tag)
            .ok_or_else(|| AuroraError::NotFound(tag.to_string()))?;

        if self.context.last_intent.as_deref() == Some(tag) {
            self.context.last_intent = None;
        }
        if self.context.follow_up.as_deref() == Some(tag) {
            self.context.follow_up = None;
        }
        Ok(self.intents.remove(position))
    }
}
