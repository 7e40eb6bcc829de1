use super::config::SessionConfig;
use super::error::SessionError;
use super::status::{SessionSnapshot, SessionStatus};
use crate::store::{ConversationStore, SavedConversation};
use crate::transcript::{Reconciled, TranscriptMessage, TranscriptReconciler};
use crate::voice::{AssistantConfig, CallHandle, Voice, VoiceClient, VoiceEvent};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const START_FAILED_MESSAGE: &str = "Failed to start session";
const SAVE_FAILED_MESSAGE: &str = "Failed to save conversation";

struct SessionState {
    status: SessionStatus,
    call: Option<CallHandle>,
    muted: bool,
    voice: Voice,
    error: Option<String>,
    start_time: Option<DateTime<Utc>>,
    /// A `begin_start` whose `finish_start` has not returned yet
    start_pending: bool,
    transcript: TranscriptReconciler,
    viewing: Option<SavedConversation>,
}

/// Mediates between user actions and the voice client.
///
/// All state lives behind one lock, so an event handler or user action always
/// sees and leaves a consistent transcript. The voice client and the store are
/// injected so tests can substitute fakes.
pub struct SessionController {
    /// Voice client for starting and controlling calls
    client: Arc<dyn VoiceClient>,

    /// Where finished sessions are saved
    store: ConversationStore,

    config: SessionConfig,

    state: Mutex<SessionState>,
}

impl SessionController {
    pub fn new(client: Arc<dyn VoiceClient>, store: ConversationStore, config: SessionConfig) -> Self {
        info!("Creating session controller with {} voice client", client.name());

        let state = SessionState {
            status: SessionStatus::Idle,
            call: None,
            muted: false,
            voice: config.default_voice.clone(),
            error: None,
            start_time: None,
            start_pending: false,
            transcript: TranscriptReconciler::new(),
            viewing: None,
        };

        Self {
            client,
            store,
            config,
            state: Mutex::new(state),
        }
    }

    /// Subscribe to the voice client and feed its events into this controller.
    ///
    /// The subscription is registered before this returns; dropping the pump
    /// stops the task and unsubscribes.
    pub fn attach(self: &Arc<Self>) -> EventPump {
        let mut subscription = self.client.subscribe();
        let controller = Arc::clone(self);

        let task = tokio::spawn(async move {
            info!("Voice event pump started");

            while let Some(event) = subscription.recv().await {
                controller.handle_event(event).await;
            }

            info!("Voice event pump stopped");
        });

        EventPump { task }
    }

    /// Start a session: enter `connecting`, wait, then call the voice client
    pub async fn start(&self) -> Result<(), SessionError> {
        let assistant = self.begin_start().await?;
        self.finish_start(assistant).await
    }

    /// First half of `start`: move to `connecting` and reset the transcript.
    ///
    /// Returns the configuration to pass to `finish_start`. Every successful
    /// call must be followed by exactly one `finish_start`; until then further
    /// starts are refused, even if an error event already returned to `idle`.
    pub async fn begin_start(&self) -> Result<AssistantConfig, SessionError> {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Idle {
            warn!("Start requested while {}", state.status);
            return Err(SessionError::AlreadyStarted(state.status));
        }
        if state.start_pending {
            warn!("Start requested while a previous start is still in flight");
            return Err(SessionError::StartPending);
        }

        state.status = SessionStatus::Connecting;
        state.call = None;
        state.error = None;
        state.viewing = None;
        state.transcript.reset();
        state.start_time = Some(Utc::now());
        state.start_pending = true;

        info!("Starting session with voice {}", state.voice.voice_id);

        Ok(self.config.assistant.for_voice(&state.voice))
    }

    /// Second half of `start`: pace, then ask the voice client for a call.
    ///
    /// There is no cancellation; the session ends up `active` or back at `idle`.
    /// If an error event ended the attempt while the client was connecting, the
    /// late call is stopped and `StartAbandoned` is returned.
    pub async fn finish_start(&self, assistant: AssistantConfig) -> Result<(), SessionError> {
        tokio::time::sleep(self.config.start_delay).await;

        let result = self.client.start(&assistant).await;

        let mut state = self.state.lock().await;
        state.start_pending = false;

        if state.status != SessionStatus::Connecting {
            return match result {
                Ok(handle) => {
                    warn!(
                        "Call {} connected after the session was {}; stopping it",
                        handle.call_id, state.status
                    );
                    if let Err(e) = self.client.stop().await {
                        warn!("Voice client failed to stop abandoned call: {:#}", e);
                    }
                    Err(SessionError::StartAbandoned)
                }
                Err(e) => {
                    debug!("Abandoned start also failed: {:#}", e);
                    Err(SessionError::StartFailed(e))
                }
            };
        }

        match result {
            Ok(handle) => {
                info!("Session active (call {})", handle.call_id);
                state.status = SessionStatus::Active;
                state.call = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("Failed to start session: {:#}", e);
                state.status = SessionStatus::Idle;
                state.call = None;
                state.start_time = None;
                state.error = Some(START_FAILED_MESSAGE.to_string());
                Err(SessionError::StartFailed(e))
            }
        }
    }

    /// Stop the active session, saving it when more than one message was captured
    pub async fn stop(&self) -> Result<Option<SavedConversation>, SessionError> {
        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Active {
            warn!("Stop requested while {}", state.status);
            return Err(SessionError::NotActive(state.status));
        }

        info!("Stopping session");

        if let Err(e) = self.client.stop().await {
            warn!("Voice client failed to stop cleanly: {:#}", e);
        }

        state.status = SessionStatus::Idle;
        state.call = None;
        state.transcript.end_session();

        let start_time = state.start_time.take();
        let saved = match start_time {
            Some(start) if state.transcript.len() > 1 => {
                let store = self.store.clone();
                let messages = state.transcript.messages().to_vec();
                let end = Utc::now();
                let result = tokio::task::spawn_blocking(move || store.save(&messages, start, end))
                    .await
                    .unwrap_or_else(|e| Err(anyhow::anyhow!("Save task failed: {}", e)));

                match result {
                    Ok(conversation) => Some(conversation),
                    Err(e) => {
                        error!("Failed to save conversation: {:#}", e);
                        state.error = Some(SAVE_FAILED_MESSAGE.to_string());
                        None
                    }
                }
            }
            _ => {
                debug!(
                    "Not saving session with {} message(s)",
                    state.transcript.len()
                );
                None
            }
        };

        info!("Session stopped");

        Ok(saved)
    }

    /// Flip the microphone mute; returns the new mute state
    pub async fn toggle_mute(&self) -> Result<bool, SessionError> {
        let mut state = self.state.lock().await;
        let muted = !state.muted;

        self.client
            .set_muted(muted)
            .await
            .map_err(SessionError::Client)?;

        state.muted = muted;
        info!("Microphone {}", if muted { "muted" } else { "unmuted" });

        Ok(muted)
    }

    /// Select the voice for the next start; a running session is unaffected
    pub async fn set_voice(&self, voice_id: &str) -> Result<Voice, SessionError> {
        let voice = self
            .config
            .find_voice(voice_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownVoice(voice_id.to_string()))?;

        let mut state = self.state.lock().await;
        if state.status != SessionStatus::Idle {
            info!("Voice {} will apply to the next session", voice.voice_id);
        }
        state.voice = voice.clone();

        Ok(voice)
    }

    pub fn voices(&self) -> &[Voice] {
        &self.config.voices
    }

    /// Saved history, newest first
    pub async fn saved_conversations(&self) -> Vec<SavedConversation> {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.load()).await {
            Ok(conversations) => conversations,
            Err(e) => {
                error!("History load task failed: {}", e);
                Vec::new()
            }
        }
    }

    /// One saved conversation by id
    pub async fn saved_conversation(&self, id: &str) -> Option<SavedConversation> {
        let store = self.store.clone();
        let id = id.to_string();
        match tokio::task::spawn_blocking(move || store.get(&id)).await {
            Ok(conversation) => conversation,
            Err(e) => {
                error!("History lookup task failed: {}", e);
                None
            }
        }
    }

    /// Show a saved conversation instead of the live transcript
    pub async fn view_conversation(&self, id: &str) -> Option<SavedConversation> {
        let conversation = self.saved_conversation(id).await?;
        let mut state = self.state.lock().await;
        state.viewing = Some(conversation.clone());
        Some(conversation)
    }

    /// Go back to showing the live transcript
    pub async fn return_to_live(&self) {
        let mut state = self.state.lock().await;
        state.viewing = None;
    }

    /// Apply one event from the voice client
    pub async fn handle_event(&self, event: VoiceEvent) {
        let mut state = self.state.lock().await;

        match event {
            VoiceEvent::Message(message) => match state.transcript.apply_message(&message) {
                Reconciled::Ignored => {}
                outcome => debug!("Transcript updated: {:?}", outcome),
            },
            VoiceEvent::CallEnd => {
                let status = state.status;
                match status {
                    // A late end from an earlier call must not abort the new one
                    SessionStatus::Connecting => {
                        debug!("Ignoring call-end while connecting");
                    }
                    status => {
                        if status == SessionStatus::Active {
                            info!("Call ended by the voice service");
                        }
                        state.status = SessionStatus::Idle;
                        state.call = None;
                        state.start_time = None;
                        state.transcript.end_session();
                    }
                }
            }
            VoiceEvent::Error(message) => {
                error!("Voice client error: {}", message);
                state.status = SessionStatus::Idle;
                state.call = None;
                state.start_time = None;
                state.error = Some(message);
                state.transcript.end_session();
            }
        }
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    pub async fn messages(&self) -> Vec<TranscriptMessage> {
        self.state.lock().await.transcript.messages().to_vec()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            status: state.status,
            muted: state.muted,
            voice: state.voice.clone(),
            error: state.error.clone(),
            call_active: state.call.is_some(),
            started_at: state.start_time,
            messages: state.transcript.messages().to_vec(),
            viewing: state.viewing.clone(),
        }
    }
}

/// Background task feeding voice events into a controller, stopped on drop
pub struct EventPump {
    task: JoinHandle<()>,
}

impl EventPump {
    /// Whether the pump has stopped (the client dropped its listeners)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for EventPump {
    fn drop(&mut self) {
        self.task.abort();
    }
}
