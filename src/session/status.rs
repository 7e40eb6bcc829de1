use crate::store::SavedConversation;
use crate::transcript::TranscriptMessage;
use crate::voice::Voice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level session state, independent of the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Connecting,
    Active,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Connecting => "connecting",
            SessionStatus::Active => "active",
        })
    }
}

/// Read-only view of the controller for rendering
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: SessionStatus,

    /// Whether the microphone is muted
    pub muted: bool,

    /// Voice used by the next start
    pub voice: Voice,

    /// Last user-visible error, if any
    pub error: Option<String>,

    /// Whether the voice client holds a call handle
    pub call_active: bool,

    /// When the current (or last unsaved) session was started
    pub started_at: Option<DateTime<Utc>>,

    /// Live transcript, in arrival order
    pub messages: Vec<TranscriptMessage>,

    /// Saved conversation being viewed instead of the live transcript
    pub viewing: Option<SavedConversation>,
}
