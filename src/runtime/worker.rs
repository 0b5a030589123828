//! Background chat worker
//!
//! One tokio task owns the [`Session`] and handles commands one at a
//! time, so conversation context is never touched concurrently. Each
//! turn shows the typing indicator, waits a bounded thinking delay,
//! computes the reply and posts it back as events.

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::events::{ChatEvent, Sender};
use crate::error::{AuroraError, Result};
use crate::response::render_template;
use crate::session::Session;
use crate::types::WorkerConfig;

/// Upper bound for any simulated thinking delay
pub const MAX_THINKING_DELAY: Duration = Duration::from_millis(1999);

/// Welcome message emitted when the worker starts
pub const WELCOME_TEMPLATE: &str =
    "Hello! I'm {name}, your advanced AI assistant. How can I help you today?";

/// Commands for the chat worker
#[derive(Debug)]
pub enum ChatCommand {
    /// Process one utterance; the reply is also sent on `reply` if present
    Utterance {
        text: String,
        reply: Option<oneshot::Sender<String>>,
    },
    /// Save the knowledge base snapshot
    Save {
        path: PathBuf,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Stop the worker after the queued commands
    Stop,
}

/// Cloneable handle used by the presentation layer
#[derive(Clone)]
pub struct ChatHandle {
    sender: mpsc::Sender<ChatCommand>,
}

impl ChatHandle {
    /// Queue an utterance; the reply arrives as a [`ChatEvent::Message`]
    pub async fn send(&self, utterance: impl Into<String>) -> Result<()> {
        self.sender
            .send(ChatCommand::Utterance {
                text: utterance.into(),
                reply: None,
            })
            .await
            .map_err(|_| AuroraError::WorkerClosed)
    }

    /// Queue an utterance and wait for its reply
    pub async fn ask(&self, utterance: impl Into<String>) -> Result<String> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ChatCommand::Utterance {
                text: utterance.into(),
                reply: Some(tx),
            })
            .await
            .map_err(|_| AuroraError::WorkerClosed)?;
        rx.await.map_err(|_| AuroraError::WorkerClosed)
    }

    /// Save the knowledge base from inside the worker
    pub async fn save(&self, path: impl Into<PathBuf>) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(ChatCommand::Save {
                path: path.into(),
                reply: tx,
            })
            .await
            .map_err(|_| AuroraError::WorkerClosed)?;
        rx.await.map_err(|_| AuroraError::WorkerClosed)?
    }

    /// Ask the worker to stop once queued commands are done
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(ChatCommand::Stop)
            .await
            .map_err(|_| AuroraError::WorkerClosed)
    }
}

/// Spawns and runs the single conversation worker
pub struct ChatWorker {
    session: Session,
    config: WorkerConfig,
    events: mpsc::Sender<ChatEvent>,
    rng: StdRng,
}

impl ChatWorker {
    /// Start the worker on the current tokio runtime
    pub fn spawn(
        session: Session,
        config: WorkerConfig,
    ) -> (ChatHandle, mpsc::Receiver<ChatEvent>) {
        let capacity = config.channel_capacity.max(1);
        let (command_tx, command_rx) = mpsc::channel::<ChatCommand>(capacity);
        let (event_tx, event_rx) = mpsc::channel::<ChatEvent>(capacity);

        let worker = ChatWorker {
            session,
            config,
            events: event_tx,
            rng: StdRng::from_entropy(),
        };
        tokio::spawn(worker.run(command_rx));

        (ChatHandle { sender: command_tx }, event_rx)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<ChatCommand>) {
        info!(session = %self.session.id(), "Chat worker started");

        if self.config.greet {
            let personality = self.session.personality();
            let welcome = render_template(WELCOME_TEMPLATE, personality, chrono::Local::now());
            self.emit(ChatEvent::message(self.agent(), welcome)).await;
        }

        while let Some(command) = commands.recv().await {
            match command {
                ChatCommand::Utterance { text, reply } => {
                    let response = self.turn(&text).await;
                    if let Some(reply) = reply {
                        let _ = reply.send(response);
                    }
                }
                ChatCommand::Save { path, reply } => {
                    let result = self.session.save(&path);
                    if let Err(e) = &result {
                        warn!(path = %path.display(), error = %e, "Failed to save knowledge base");
                    }
                    let _ = reply.send(result);
                }
                ChatCommand::Stop => break,
            }
        }

        info!(session = %self.session.id(), "Chat worker stopped");
    }

    async fn turn(&mut self, utterance: &str) -> String {
        self.emit(ChatEvent::message(Sender::User, utterance.to_string()))
            .await;
        self.emit(ChatEvent::typing(true)).await;

        let delay = self.thinking_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = self.session.respond(utterance);
        debug!(delay_ms = delay.as_millis() as u64, "Turn complete");

        self.emit(ChatEvent::typing(false)).await;
        self.emit(ChatEvent::message(self.agent(), response.clone()))
            .await;
        response
    }

    /// Uniform in the configured range, shortened by responsiveness
    fn thinking_delay(&mut self) -> Duration {
        let min = self.config.min_delay_ms.min(self.config.max_delay_ms);
        let max = self.config.max_delay_ms.max(min);
        if max == 0 {
            return Duration::ZERO;
        }
        let base = self.rng.gen_range(min..=max) as f32;
        let scale = 1.0 - 0.5 * self.session.personality().responsiveness;
        Duration::from_millis((base * scale) as u64).min(MAX_THINKING_DELAY)
    }

    fn agent(&self) -> Sender {
        Sender::Agent(self.session.personality().name.clone())
    }

    async fn emit(&self, event: ChatEvent) {
        // The presentation layer may have gone away; turns still complete
        if self.events.send(event).await.is_err() {
            debug!("Event receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::default_knowledge_base;
    use crate::types::{Personality, SessionConfig};

    fn session() -> Session {
        Session::new(
            default_knowledge_base(),
            Personality::default(),
            SessionConfig {
                seed: Some(3),
                ..Default::default()
            },
        )
    }

    fn quiet() -> WorkerConfig {
        WorkerConfig {
            greet: false,
            ..WorkerConfig::immediate()
        }
    }

    #[tokio::test]
    async fn test_turn_event_sequence() {
        let (handle, mut events) = ChatWorker::spawn(session(), quiet());
        handle.send("Hello").await.unwrap();

        match events.recv().await.unwrap() {
            ChatEvent::Message { sender, text, .. } => {
                assert_eq!(sender, Sender::User);
                assert_eq!(text, "Hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(events.recv().await.unwrap(), ChatEvent::typing(true));
        assert_eq!(events.recv().await.unwrap(), ChatEvent::typing(false));
        match events.recv().await.unwrap() {
            ChatEvent::Message { sender, text, .. } => {
                assert_eq!(sender, Sender::Agent("Aurora".to_string()));
                assert!(!text.is_empty());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ask_keeps_context_across_turns() {
        let (handle, _events) = ChatWorker::spawn(session(), quiet());
        handle.ask("What time is it").await.unwrap();
        let reply = handle.ask("what about the time difference").await.unwrap();
        assert_eq!(reply, crate::response::NO_TIMEZONE_SUPPORT);
    }

    #[tokio::test]
    async fn test_greeting_on_start() {
        let (_handle, mut events) = ChatWorker::spawn(session(), WorkerConfig::immediate());
        match events.recv().await.unwrap() {
            ChatEvent::Message { text, .. } => assert!(text.contains("Aurora")),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_save_and_shutdown() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kb.json");
        let (handle, _events) = ChatWorker::spawn(session(), quiet());

        handle.save(&path).await.unwrap();
        assert!(path.exists());

        handle.shutdown().await.unwrap();
        // Once the task exits, further commands fail
        for _ in 0..50 {
            if handle.ask("Hello").await.is_err() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("worker did not stop");
    }

    #[tokio::test]
    async fn test_failed_save_reported_and_worker_survives() {
        let dir = tempfile::TempDir::new().unwrap();
        let (handle, _events) = ChatWorker::spawn(session(), quiet());

        // The target is an existing directory, so the write fails
        let err = handle.save(dir.path()).await.unwrap_err();
        assert!(err.is_persistence_failure(), "unexpected error: {}", err);

        assert!(!handle.ask("Hello").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_turns_complete_without_event_receiver() {
        let (handle, events) = ChatWorker::spawn(session(), quiet());
        drop(events);
        assert!(!handle.ask("Hello").await.unwrap().is_empty());
    }

    #[test]
    fn test_thinking_delay_bounded() {
        let (event_tx, _event_rx) = mpsc::channel(1);
        let mut worker = ChatWorker {
            session: session(),
            config: WorkerConfig {
                min_delay_ms: 1500,
                max_delay_ms: 5000,
                ..Default::default()
            },
            events: event_tx,
            rng: StdRng::seed_from_u64(9),
        };
        for _ in 0..50 {
            assert!(worker.thinking_delay() <= MAX_THINKING_DELAY);
        }

        worker.config = WorkerConfig::immediate();
        assert_eq!(worker.thinking_delay(), Duration::ZERO);
    }
}
