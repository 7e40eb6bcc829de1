//! Offline replay of recorded voice events
//!
//! A recording is a JSON-lines file, one voice event per line:
//!
//! ```text
//! {"event":"message","data":{"type":"transcript","role":"user","transcriptType":"final","transcript":"hello"}}
//! {"event":"error","data":{"message":"Meeting has ended"}}
//! {"event":"call-end"}
//! ```
//!
//! Replaying drives a `SessionController` through start, the recorded events and
//! stop, exactly as a live call would.

use crate::session::{SessionController, SessionStatus};
use crate::store::SavedConversation;
use crate::transcript::TranscriptMessage;
use crate::voice::{
    AssistantConfig, CallHandle, EventListeners, Subscription, VoiceClient, VoiceEvent,
};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct RecordedEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

/// Parse one line of a recording; `None` for blank lines and unknown events
pub fn parse_event_line(line: &str) -> Result<Option<VoiceEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let recorded: RecordedEvent = serde_json::from_str(line)?;
    let event = VoiceEvent::from_wire(&recorded.event, recorded.data);
    if event.is_none() {
        debug!("Skipping recorded {} event", recorded.event);
    }
    Ok(event)
}

pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<VoiceEvent>> {
    let path = path.as_ref();
    info!("Loading recorded events: {}", path.display());

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut events = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let event = parse_event_line(line)
            .with_context(|| format!("{}:{}: invalid event", path.display(), index + 1))?;
        events.extend(event);
    }

    info!("Loaded {} events", events.len());
    Ok(events)
}

/// Voice client that accepts every call and emits events on demand
#[derive(Default)]
pub struct ReplayVoiceClient {
    listeners: EventListeners,
}

impl ReplayVoiceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: VoiceEvent) -> usize {
        self.listeners.emit(event)
    }
}

#[async_trait::async_trait]
impl VoiceClient for ReplayVoiceClient {
    async fn start(&self, _assistant: &AssistantConfig) -> Result<CallHandle> {
        Ok(CallHandle {
            call_id: format!("replay-{}", uuid::Uuid::new_v4()),
        })
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }

    async fn set_muted(&self, _muted: bool) -> Result<()> {
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.listeners.subscribe()
    }

    fn name(&self) -> &str {
        "replay"
    }
}

/// Result of replaying a recording
#[derive(Debug)]
pub struct ReplayOutcome {
    pub messages: Vec<TranscriptMessage>,
    /// Set when the session ended by `stop` with enough messages to keep
    pub saved: Option<SavedConversation>,
    /// Error surfaced by a recorded `error` event
    pub error: Option<String>,
}

impl ReplayOutcome {
    /// One-line note on what happened to the session history.
    ///
    /// `persisted` says whether the controller's store was the real history;
    /// a scratch store only shows what a manual stop would have kept.
    pub fn save_note(&self, persisted: bool) -> Option<String> {
        let saved = self.saved.as_ref()?;
        Some(if persisted {
            format!("Saved as {} ({})", saved.id, saved.duration)
        } else {
            format!(
                "Would be saved ({}, {} messages); rerun with --save to keep it",
                saved.duration, saved.message_count
            )
        })
    }
}

/// Run `events` through `controller` as one session.
///
/// The session is stopped afterwards unless a recorded `call-end` or `error`
/// already ended it.
pub async fn replay(controller: &SessionController, events: Vec<VoiceEvent>) -> Result<ReplayOutcome> {
    controller.start().await?;

    for event in events {
        controller.handle_event(event).await;
    }

    let saved = if controller.status().await == SessionStatus::Active {
        controller.stop().await?
    } else {
        info!("Recording ended the session itself; nothing saved");
        None
    };

    let snapshot = controller.snapshot().await;
    Ok(ReplayOutcome {
        messages: snapshot.messages,
        saved,
        error: snapshot.error,
    })
}
