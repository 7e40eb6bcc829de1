use super::messages::{CallStartedReply, MuteRequest, StartCallRequest};
use crate::voice::{
    AssistantConfig, CallHandle, EventListeners, Subscription, VoiceClient, VoiceEvent,
};
use anyhow::{Context, Result};
use async_nats::Client;
use futures::stream::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const START_SUBJECT: &str = "voice.call.start";
const STOP_SUBJECT: &str = "voice.call.stop";
const MUTE_SUBJECT: &str = "voice.call.mute";
const EVENTS_SUBJECT: &str = "voice.events.>";

/// Voice client backed by a voice gateway on NATS
///
/// Calls are relayed as request/publish messages; gateway events arrive on
/// `voice.events.<name>` and are fanned out to subscriptions.
pub struct NatsVoiceClient {
    client: Client,
    public_key: String,
    listeners: EventListeners,
    event_task: JoinHandle<()>,
}

impl NatsVoiceClient {
    /// Connect to NATS and start relaying gateway events
    pub async fn connect(url: &str, public_key: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        let mut subscriber = client
            .subscribe(EVENTS_SUBJECT.to_string())
            .await
            .context("Failed to subscribe to voice events")?;

        info!("Subscribed to {}", EVENTS_SUBJECT);

        let listeners = EventListeners::new();
        let relay = listeners.clone();

        let event_task = tokio::spawn(async move {
            while let Some(msg) = subscriber.next().await {
                let name = msg.subject.as_str().rsplit('.').next().unwrap_or_default();

                let payload = if msg.payload.is_empty() {
                    Value::Null
                } else {
                    match serde_json::from_slice::<Value>(&msg.payload) {
                        Ok(value) => value,
                        Err(e) => {
                            warn!("Failed to parse {} event payload: {}", name, e);
                            continue;
                        }
                    }
                };

                match VoiceEvent::from_wire(name, payload) {
                    Some(event) => {
                        relay.emit(event);
                    }
                    None => debug!("Ignoring voice event {}", name),
                }
            }

            info!("Voice event relay stopped");
        });

        Ok(Self {
            client,
            public_key,
            listeners,
            event_task,
        })
    }
}

#[async_trait::async_trait]
impl VoiceClient for NatsVoiceClient {
    async fn start(&self, assistant: &AssistantConfig) -> Result<CallHandle> {
        let request = StartCallRequest {
            public_key: self.public_key.clone(),
            assistant: assistant.clone(),
        };
        let payload = serde_json::to_vec(&request)?;

        let reply = self
            .client
            .request(START_SUBJECT.to_string(), payload.into())
            .await
            .context("Voice gateway did not answer the start request")?;

        let reply: CallStartedReply =
            serde_json::from_slice(&reply.payload).context("Malformed start reply")?;

        match (reply.call_id, reply.error) {
            (_, Some(error)) => anyhow::bail!("Voice gateway refused to start: {}", error),
            (Some(call_id), None) => {
                info!("Call {} started", call_id);
                Ok(CallHandle { call_id })
            }
            (None, None) => anyhow::bail!("Voice gateway returned no call id"),
        }
    }

    async fn stop(&self) -> Result<()> {
        self.client
            .publish(STOP_SUBJECT.to_string(), "{}".into())
            .await
            .context("Failed to publish stop request")?;
        Ok(())
    }

    async fn set_muted(&self, muted: bool) -> Result<()> {
        let payload = serde_json::to_vec(&MuteRequest { muted })?;
        self.client
            .publish(MUTE_SUBJECT.to_string(), payload.into())
            .await
            .context("Failed to publish mute request")?;
        Ok(())
    }

    fn subscribe(&self) -> Subscription {
        self.listeners.subscribe()
    }

    fn name(&self) -> &str {
        "nats"
    }
}

impl Drop for NatsVoiceClient {
    fn drop(&mut self) {
        self.event_task.abort();
        self.listeners.clear();
    }
}
