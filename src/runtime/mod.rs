//! Asynchronous hand-off between the presentation layer and a session
//!
//! The presentation layer holds a [`ChatHandle`] to submit utterances and
//! reads [`ChatEvent`]s (typing indicator, rendered messages) from a
//! channel. A single worker task owns the session.

mod events;
mod worker;

pub use events::{ChatEvent, Sender};
pub use worker::{ChatCommand, ChatHandle, ChatWorker, MAX_THINKING_DELAY, WELCOME_TEMPLATE};
