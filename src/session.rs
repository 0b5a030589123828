//! Conversation session
//!
//! A session owns one knowledge base (with its context), one personality,
//! one corpus index, one response selector and an append-only utterance
//! history. Nothing is global, so sessions are independent of each other.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::matching::CorpusIndex;
use crate::response::{adjust, default_follow_ups, FollowUpTable, ResponseSelector};
use crate::types::{
    Intent, IndexPolicy, MatchResult, Personality, SessionConfig, UtteranceLogEntry,
};

/// One conversation: state plus the matching and response machinery
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    knowledge: KnowledgeBase,
    personality: Personality,
    config: SessionConfig,
    index: Option<CorpusIndex>,
    index_stale: bool,
    selector: ResponseSelector,
    history: Vec<UtteranceLogEntry>,
}

impl Session {
    /// Create a session with the built-in follow-up rules
    pub fn new(knowledge: KnowledgeBase, personality: Personality, config: SessionConfig) -> Self {
        Self::with_follow_ups(knowledge, personality, config, default_follow_ups())
    }

    pub fn with_follow_ups(
        knowledge: KnowledgeBase,
        personality: Personality,
        config: SessionConfig,
        follow_ups: FollowUpTable,
    ) -> Self {
        let selector = ResponseSelector::new(config.selection, config.seed, follow_ups);
        let mut session = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            knowledge,
            personality,
            config,
            index: None,
            index_stale: true,
            selector,
            history: Vec::new(),
        };
        session.rebuild_index();
        info!(session = %session.id, personality = %session.personality.name, "Session started");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &[UtteranceLogEntry] {
        &self.history
    }

    /// The current index, `None` when the corpus has no indexable patterns
    pub fn index(&self) -> Option<&CorpusIndex> {
        self.index.as_ref()
    }

    pub fn is_index_stale(&self) -> bool {
        self.index_stale
    }

    /// Rebuild the corpus index from the current intents
    pub fn rebuild_index(&mut self) {
        self.index = match CorpusIndex::build(&self.knowledge.intents) {
            Ok(index) => Some(index),
            Err(e) => {
                warn!(
                    session = %self.id,
                    error = %e,
                    "No corpus index, all replies will fall back"
                );
                None
            }
        };
        self.index_stale = false;
    }

    fn ensure_index(&mut self) {
        if self.index_stale {
            self.rebuild_index();
        }
    }

    fn intents_changed(&mut self) {
        self.index_stale = true;
        if self.config.index_policy == IndexPolicy::Eager {
            self.rebuild_index();
        }
    }

    /// Add or replace an intent
    pub fn upsert_intent(&mut self, intent: Intent) -> Result<()> {
        self.knowledge.upsert_intent(intent)?;
        self.intents_changed();
        Ok(())
    }

    /// Remove an intent by tag
    pub fn remove_intent(&mut self, tag: &str) -> Result<Intent> {
        let removed = self.knowledge.remove_intent(tag)?;
        self.intents_changed();
        Ok(removed)
    }

    /// Persist the knowledge base snapshot
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.knowledge.save(path)
    }

    /// Match an utterance without touching context or history
    pub fn match_utterance(&mut self, utterance: &str) -> Option<MatchResult> {
        self.ensure_index();
        self.index
            .as_ref()?
            .match_utterance(utterance, self.config.threshold)
    }

    /// Produce the reply for one conversation turn
    pub fn respond(&mut self, utterance: &str) -> String {
        self.history.push(UtteranceLogEntry {
            text: utterance.to_string(),
            timestamp: Utc::now(),
        });
        self.ensure_index();

        if self.knowledge.context.follow_up.is_some() {
            if let Some(reply) = self
                .selector
                .follow_ups()
                .handle_follow_up(utterance, &mut self.knowledge.context)
            {
                return adjust(&reply, &self.personality);
            }
        }

        let reply = match self.match_utterance(utterance) {
            Some(result) => self.matched_reply(&result),
            None => None,
        };
        let reply = reply.unwrap_or_else(|| self.selector.fallback());

        adjust(&reply, &self.personality)
    }

    fn matched_reply(&mut self, result: &MatchResult) -> Option<String> {
        let intent = self.knowledge.intent(&result.tag)?;
        let reply = self.selector.pick_response(intent, &self.personality)?;

        let context = &mut self.knowledge.context;
        context.last_intent = Some(result.tag.clone());
        context.follow_up = self
            .selector
            .follow_ups()
            .has_rules_for(&result.tag)
            .then(|| result.tag.clone());

        debug!(session = %self.id, tag = %result.tag, score = result.score, "Replying from intent");
        Some(reply)
    }
}
