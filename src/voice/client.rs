use super::assistant::AssistantConfig;
use super::listeners::Subscription;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message shown when an error event carries no message of its own
const DEFAULT_ERROR_MESSAGE: &str = "Connection failed";

/// Opaque marker of a running call, returned by `VoiceClient::start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallHandle {
    pub call_id: String,
}

/// Notification emitted by the voice client
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    /// Any `message` payload; transcript updates are one kind of message
    Message(Value),
    /// The call was terminated by the remote side
    CallEnd,
    /// The call failed mid-session
    Error(String),
}

impl VoiceEvent {
    /// Build an event from its wire name and JSON payload.
    ///
    /// Returns `None` for event names the controller does not consume.
    pub fn from_wire(name: &str, payload: Value) -> Option<Self> {
        match name {
            "message" => Some(VoiceEvent::Message(payload)),
            "call-end" => Some(VoiceEvent::CallEnd),
            "error" => {
                let message = match &payload {
                    Value::String(s) if !s.is_empty() => s.clone(),
                    Value::Object(map) => map
                        .get("message")
                        .and_then(Value::as_str)
                        .filter(|s| !s.is_empty())
                        .unwrap_or(DEFAULT_ERROR_MESSAGE)
                        .to_string(),
                    _ => DEFAULT_ERROR_MESSAGE.to_string(),
                };
                Some(VoiceEvent::Error(message))
            }
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VoiceEvent::Message(_) => "message",
            VoiceEvent::CallEnd => "call-end",
            VoiceEvent::Error(_) => "error",
        }
    }
}

/// Real-time voice session client
///
/// Implementations:
/// - `NatsVoiceClient`: relays calls and events through a voice gateway on NATS
/// - test fakes that record calls and emit scripted events
#[async_trait::async_trait]
pub trait VoiceClient: Send + Sync {
    /// Start a call with the given assistant configuration
    async fn start(&self, assistant: &AssistantConfig) -> Result<CallHandle>;

    /// Stop the current call
    async fn stop(&self) -> Result<()>;

    /// Mute or unmute the local microphone
    async fn set_muted(&self, muted: bool) -> Result<()>;

    /// Register for events; dropping the subscription unregisters it
    fn subscribe(&self) -> Subscription;

    /// Client name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire() {
        assert_eq!(
            VoiceEvent::from_wire("message", json!({"type": "transcript"})),
            Some(VoiceEvent::Message(json!({"type": "transcript"})))
        );
        assert_eq!(
            VoiceEvent::from_wire("call-end", Value::Null),
            Some(VoiceEvent::CallEnd)
        );
        assert_eq!(VoiceEvent::from_wire("speech-start", Value::Null), None);
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(
            VoiceEvent::from_wire("error", json!({"message": "Meeting has ended"})),
            Some(VoiceEvent::Error("Meeting has ended".to_string()))
        );
        assert_eq!(
            VoiceEvent::from_wire("error", json!("socket closed")),
            Some(VoiceEvent::Error("socket closed".to_string()))
        );
        assert_eq!(
            VoiceEvent::from_wire("error", json!({"code": 500})),
            Some(VoiceEvent::Error(DEFAULT_ERROR_MESSAGE.to_string()))
        );
        assert_eq!(
            VoiceEvent::from_wire("error", Value::Null),
            Some(VoiceEvent::Error(DEFAULT_ERROR_MESSAGE.to_string()))
        );
    }
}
