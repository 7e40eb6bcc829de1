use crate::voice::AssistantConfig;
use serde::{Deserialize, Serialize};

/// Request published to `voice.call.start`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCallRequest {
    pub public_key: String,
    pub assistant: AssistantConfig,
}

/// Gateway reply to a start request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStartedReply {
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Message published to `voice.call.mute`
#[derive(Debug, Serialize, Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}
