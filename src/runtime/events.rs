//! Events delivered to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a rendered message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum Sender {
    User,
    Agent(String),
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sender::User => write!(f, "You"),
            Sender::Agent(name) => write!(f, "{}", name),
        }
    }
}

/// A chat event for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Show or hide the typing indicator
    Typing { active: bool },
    /// Render a message
    Message {
        sender: Sender,
        text: String,
        timestamp: DateTime<Utc>,
    },
}

impl ChatEvent {
    pub fn typing(active: bool) -> Self {
        ChatEvent::Typing { active }
    }

    pub fn message(sender: Sender, text: impl Into<String>) -> Self {
        ChatEvent::Message {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
