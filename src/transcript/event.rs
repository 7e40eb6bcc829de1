use super::message::Role;
use serde_json::Value;

/// Whether an utterance may still be revised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptKind {
    Partial,
    Final,
}

impl TranscriptKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "partial" => Some(TranscriptKind::Partial),
            "final" => Some(TranscriptKind::Final),
            _ => None,
        }
    }
}

/// A speech-to-text update for one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEvent {
    pub role: Role,
    pub text: String,
    pub kind: TranscriptKind,
}

impl TranscriptEvent {
    pub fn partial(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            kind: TranscriptKind::Partial,
        }
    }

    pub fn final_text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            kind: TranscriptKind::Final,
        }
    }

    /// Extract a transcript update from a raw `message` event payload.
    ///
    /// Returns `None` for non-transcript messages and for anything malformed
    /// (missing text, unknown transcript type). Those are dropped, never raised.
    /// A `transcript` message without `transcriptType` counts as final.
    ///
    /// The role comes from `role` when it names a known role, otherwise from
    /// `speaker`: `"user"` maps to the user and anything else to the assistant.
    pub fn from_message(message: &Value) -> Option<Self> {
        let transcript_type = message.get("transcriptType").and_then(Value::as_str);
        let is_transcript = message.get("type").and_then(Value::as_str) == Some("transcript")
            || transcript_type == Some("partial");
        if !is_transcript {
            return None;
        }

        // Transcripts without a kind are settled text
        let kind = match transcript_type {
            Some(kind) => TranscriptKind::parse(kind)?,
            None => TranscriptKind::Final,
        };
        let text = message.get("transcript").and_then(Value::as_str)?.to_string();

        let role = match message
            .get("role")
            .and_then(Value::as_str)
            .and_then(Role::parse)
        {
            Some(role) => role,
            None => match message.get("speaker").and_then(Value::as_str) {
                Some("user") => Role::User,
                _ => Role::Assistant,
            },
        };

        Some(Self { role, text, kind })
    }
}
