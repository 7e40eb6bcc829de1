use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sona::replay::{self, ReplayVoiceClient};
use sona::store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
use sona::{
    create_router, AppState, Config, ConversationStore, NatsVoiceClient, SessionController,
    TranscriptMessage,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "sona")]
#[command(about = "Speak. Listen. Imagine. Voice session front end")]
struct Cli {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/sona")]
    config: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API backed by the NATS voice gateway
    Serve,

    /// Replay a recorded event log and print the transcript
    Replay {
        /// JSON-lines file of recorded voice events
        file: PathBuf,

        /// Save the session to the history like a manual stop would
        #[arg(long)]
        save: bool,
    },

    /// List saved conversations
    History,

    /// Print one saved conversation
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    let cfg = Config::load(&cli.config)?;

    info!("Sona v{}", env!("CARGO_PKG_VERSION"));

    let store_path = cfg.store.resolved_path();
    let store = ConversationStore::new(Arc::new(FileKeyValueStore::new(&store_path)));

    match cli.command {
        Command::Serve => serve(cfg, store).await,
        Command::Replay { file, save } => {
            let store = if save {
                store
            } else {
                let scratch: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
                ConversationStore::new(scratch)
            };
            run_replay(&cfg, store, file, save).await
        }
        Command::History => {
            let conversations = store.load();
            if conversations.is_empty() {
                println!("No saved conversations yet.");
            }
            for (index, conversation) in conversations.iter().enumerate() {
                let summary = conversation.summary(index);
                println!(
                    "{}  {} | {} | {} messages  [{}]",
                    summary.title,
                    summary.created,
                    summary.duration,
                    summary.message_count,
                    summary.id
                );
            }
            Ok(())
        }
        Command::Show { id } => {
            let conversation = store
                .get(&id)
                .with_context(|| format!("Conversation {} not found", id))?;
            println!(
                "{} ({}, {} messages)",
                conversation.summary(0).created,
                conversation.duration,
                conversation.message_count
            );
            print_transcript(&conversation.interview);
            Ok(())
        }
    }
}

async fn serve(cfg: Config, store: ConversationStore) -> Result<()> {
    info!("Loaded config: {}", cfg.service.name);
    info!("Voice gateway: {}", cfg.voice.nats_url);

    if cfg.voice.public_key.is_empty() {
        tracing::warn!("No voice public key configured (set SONA__VOICE__PUBLIC_KEY)");
    }

    let client = NatsVoiceClient::connect(&cfg.voice.nats_url, cfg.voice.public_key.clone())
        .await
        .context("Failed to connect voice client")?;

    let controller = Arc::new(SessionController::new(
        Arc::new(client),
        store,
        cfg.session_config()?,
    ));
    let _pump = controller.attach();

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(AppState::new(controller)))
        .await
        .context("HTTP server failed")?;

    Ok(())
}

async fn run_replay(cfg: &Config, store: ConversationStore, file: PathBuf, save: bool) -> Result<()> {
    let events = replay::load_events(&file)?;

    let mut session_config = cfg.session_config()?;
    session_config.start_delay = std::time::Duration::ZERO;

    let controller = SessionController::new(Arc::new(ReplayVoiceClient::new()), store, session_config);
    let outcome = replay::replay(&controller, events).await?;

    print_transcript(&outcome.messages);

    if let Some(error) = &outcome.error {
        println!("\nSession error: {}", error);
    }
    if let Some(note) = outcome.save_note(save) {
        println!("\n{}", note);
    }

    Ok(())
}

fn print_transcript(messages: &[TranscriptMessage]) {
    for message in messages {
        let marker = if message.is_final { "" } else { " (in progress)" };
        println!("[{}] {}{}", message.role, message.text, marker);
    }
}
