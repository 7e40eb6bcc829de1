// Shared fakes for integration tests
//
// FakeVoiceClient records every call the controller makes and lets tests emit
// events as the voice service would. CountingStore counts writes so tests can
// assert when history is (not) saved.

#![allow(dead_code)]

use anyhow::Result;
use serde_json::json;
use sona::session::{SessionConfig, SessionController, SessionSnapshot};
use sona::store::{ConversationStore, KeyValueStore, MemoryKeyValueStore};
use sona::voice::{AssistantConfig, CallHandle, EventListeners, Subscription, VoiceClient, VoiceEvent};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct FakeVoiceClient {
    listeners: EventListeners,
    pub starts: Mutex<Vec<AssistantConfig>>,
    pub stops: AtomicUsize,
    pub mutes: Mutex<Vec<bool>>,
    pub fail_start: AtomicBool,
    pub fail_mute: AtomicBool,
}

impl FakeVoiceClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn emit(&self, event: VoiceEvent) -> usize {
        self.listeners.emit(event)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn started_voices(&self) -> Vec<String> {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.voice.voice_id.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl VoiceClient for FakeVoiceClient {
    async fn start(&self, assistant: &AssistantConfig) -> Result<CallHandle> {
        if self.fail_start.load(Ordering::SeqCst) {
            anyhow::bail!("microphone permission denied");
        }
        self.starts.lock().unwrap().push(assistant.clone());
        Ok(CallHandle {
            call_id: format!("call-{}", self.starts.lock().unwrap().len()),
        })
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn set_muted(&self, muted: bool) -> Result<()> {
        if self.fail_mute.load(Ordering::SeqCst) {
            anyhow::bail!("no call in progress");
        }
        self.mutes.lock().unwrap().push(muted);
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.listeners.subscribe()
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// In-memory store that counts writes
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryKeyValueStore,
    pub writes: AtomicUsize,
}

impl CountingStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

pub struct Harness {
    pub client: Arc<FakeVoiceClient>,
    pub backend: Arc<CountingStore>,
    pub store: ConversationStore,
    pub controller: Arc<SessionController>,
}

/// Controller wired to fakes, with no start delay
pub fn harness() -> Harness {
    let client = FakeVoiceClient::new();
    let backend = Arc::new(CountingStore::default());
    let store = ConversationStore::new(backend.clone());

    let config = SessionConfig {
        start_delay: Duration::ZERO,
        ..SessionConfig::default()
    };

    let controller = Arc::new(SessionController::new(
        client.clone(),
        store.clone(),
        config,
    ));

    Harness {
        client,
        backend,
        store,
        controller,
    }
}

pub fn partial(role: &str, text: &str) -> VoiceEvent {
    transcript(role, "partial", text)
}

pub fn final_text(role: &str, text: &str) -> VoiceEvent {
    transcript(role, "final", text)
}

fn transcript(role: &str, kind: &str, text: &str) -> VoiceEvent {
    VoiceEvent::Message(json!({
        "type": "transcript",
        "role": role,
        "transcriptType": kind,
        "transcript": text,
    }))
}

/// Poll the controller until `predicate` holds (2 second limit)
pub async fn wait_for(
    controller: &SessionController,
    predicate: impl Fn(&SessionSnapshot) -> bool,
) -> SessionSnapshot {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let snapshot = controller.snapshot().await;
            if predicate(&snapshot) {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    result.expect("controller did not reach expected state in time")
}

/// Poll a plain condition (2 second limit)
pub async fn wait_until(condition: impl Fn() -> bool) {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    result.expect("condition not met in time");
}
