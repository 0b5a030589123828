//! Aurora CLI
//!
//! Terminal front-end for the conversational core.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aurora::error::{AuroraError, Result};
use aurora::knowledge::{default_knowledge_base, KnowledgeBase};
use aurora::runtime::{ChatEvent, ChatWorker, Sender};
use aurora::session::Session;
use aurora::types::*;

#[derive(Parser)]
#[command(name = "aurora")]
#[command(about = "Intent-matching conversational agent")]
#[command(version)]
struct Cli {
    /// Knowledge base path
    #[arg(long, env = "AURORA_KB_PATH", default_value = "knowledge_base.json")]
    kb_path: String,

    /// Personality mood (neutral, happy, serious)
    #[arg(long, env = "AURORA_MOOD", default_value = "neutral")]
    mood: Mood,

    /// Verbosity (0-1); below 0.5 long replies are truncated
    #[arg(long, default_value = "0.7")]
    verbosity: f32,

    /// Responsiveness (0-1); higher answers faster
    #[arg(long, default_value = "0.8")]
    responsiveness: f32,

    /// Match threshold
    #[arg(long, default_value_t = DEFAULT_MATCH_THRESHOLD)]
    threshold: f32,

    /// Seed for reproducible reply selection
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat
    Chat {
        /// Skip the simulated thinking delay
        #[arg(long)]
        no_delay: bool,
    },
    /// Reply to a single utterance
    Ask {
        /// Utterance
        text: String,
    },
    /// Show which intent an utterance matches
    Match {
        /// Utterance
        text: String,
        /// Show every pattern score
        #[arg(short, long)]
        explain: bool,
    },
    /// List intents in the knowledge base
    Intents,
    /// Write the built-in knowledge base
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so replies stay clean on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.threshold) {
        return Err(AuroraError::Config(format!(
            "threshold must be within [0, 1], got {}",
            cli.threshold
        )));
    }

    // Expand ~ in path
    let kb_path = PathBuf::from(shellexpand::tilde(&cli.kb_path).to_string());

    let personality = Personality::new("Aurora", cli.mood, cli.responsiveness, cli.verbosity);
    let config = SessionConfig {
        threshold: cli.threshold,
        seed: cli.seed,
        ..Default::default()
    };

    match cli.command {
        Commands::Init { force } => {
            if kb_path.exists() && !force {
                return Err(AuroraError::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    kb_path.display()
                )));
            }
            default_knowledge_base().save(&kb_path)?;
            println!("Wrote default knowledge base to {}", kb_path.display());
        }

        Commands::Intents => {
            let kb = KnowledgeBase::load(&kb_path);
            for intent in &kb.intents {
                println!(
                    "{} ({} patterns, {} responses) - {}",
                    intent.tag,
                    intent.patterns.len(),
                    intent.responses.len(),
                    intent.patterns.join(" | ")
                );
            }
        }

        Commands::Match { text, explain } => {
            let mut session = Session::new(KnowledgeBase::load(&kb_path), personality, config);
            match session.match_utterance(&text) {
                Some(result) => println!("{} (score: {:.3})", result.tag, result.score),
                None => println!("no match"),
            }
            if explain {
                if let Some(index) = session.index() {
                    for score in index.score_all(&text) {
                        println!("  {:.3} {} [{}]", score.score, score.pattern, score.tag);
                    }
                }
            }
        }

        Commands::Ask { text } => {
            let mut session = Session::new(KnowledgeBase::load(&kb_path), personality, config);
            println!("{}", session.respond(&text));
        }

        Commands::Chat { no_delay } => {
            let session = Session::new(KnowledgeBase::load(&kb_path), personality, config);
            let worker_config = if no_delay {
                WorkerConfig::immediate()
            } else {
                WorkerConfig::default()
            };
            chat(session, worker_config, &kb_path).await?;
        }
    }

    Ok(())
}

async fn chat(session: Session, config: WorkerConfig, kb_path: &Path) -> Result<()> {
    println!("Type '/save' to store the knowledge base, '/quit' to exit\n");

    let (handle, mut events) = ChatWorker::spawn(session, config);

    let printer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while let Some(event) = events.recv().await {
            match event {
                ChatEvent::Typing { active: true } => {
                    print!("...\r");
                }
                ChatEvent::Typing { active: false } => {
                    print!("   \r");
                }
                // The terminal already shows what was typed
                ChatEvent::Message {
                    sender: Sender::User,
                    ..
                } => continue,
                ChatEvent::Message {
                    sender,
                    text,
                    timestamp,
                } => {
                    let local = timestamp.with_timezone(&chrono::Local);
                    println!("{} ({}):\n{}\n", sender, local.format("%H:%M:%S"), text);
                }
            }
            let _ = stdout.flush();
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" => break,
            "/save" => match handle.save(kb_path).await {
                Ok(()) => println!("Saved to {}", kb_path.display()),
                Err(e) => println!("Error: {}", e),
            },
            _ => {
                // Wait for the reply so turns stay in order with the prompt
                handle.ask(line).await?;
            }
        }
    }

    handle.shutdown().await?;
    let _ = printer.await;
    println!("Goodbye!");
    Ok(())
}
