//! Aurora - intent-matching conversational agent core
//!
//! Matches free-text utterances against a small curated set of intents
//! using TF-IDF vectors and cosine similarity, then replies with a
//! templated response adjusted by personality.

pub mod embedding;
pub mod error;
pub mod knowledge;
pub mod matching;
pub mod response;
pub mod runtime;
pub mod session;
pub mod text;
pub mod types;

pub use error::{AuroraError, Result};
pub use knowledge::KnowledgeBase;
pub use session::Session;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
