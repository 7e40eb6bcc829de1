use super::event::{TranscriptEvent, TranscriptKind};
use super::message::{Role, TranscriptMessage};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// What applying one event did to the message list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    /// A new message was appended
    Appended(String),
    /// An in-progress message had its text replaced
    Updated(String),
    /// An in-progress message was settled in place
    Finalized(String),
    /// A standalone final repeated an existing message and was discarded
    Duplicate,
    /// The raw event carried no usable transcript
    Ignored,
}

/// Merges partial/final speech-to-text events into an ordered message list.
///
/// Messages are kept in arrival order and are never re-sorted. Each role has at
/// most one in-progress (`is_final == false`) message, tracked by id in the
/// ongoing index.
#[derive(Debug, Default, Clone)]
pub struct TranscriptReconciler {
    messages: Vec<TranscriptMessage>,
    ongoing: HashMap<Role, String>,
}

impl TranscriptReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Id of the message currently receiving partial updates for `role`
    pub fn ongoing_id(&self, role: Role) -> Option<&str> {
        self.ongoing.get(&role).map(String::as_str)
    }

    /// Apply a raw `message` event from the voice client
    pub fn apply_message(&mut self, message: &Value) -> Reconciled {
        match TranscriptEvent::from_message(message) {
            Some(event) => self.apply(event),
            None => {
                debug!("Dropping non-transcript message: {}", message);
                Reconciled::Ignored
            }
        }
    }

    pub fn apply(&mut self, event: TranscriptEvent) -> Reconciled {
        match event.kind {
            TranscriptKind::Partial => self.apply_partial(event.role, event.text),
            TranscriptKind::Final => self.apply_final(event.role, event.text),
        }
    }

    fn apply_partial(&mut self, role: Role, text: String) -> Reconciled {
        // Fall back to any unsettled row of this role so an orphaned index never
        // produces a second in-progress row.
        let position = self
            .ongoing
            .get(&role)
            .and_then(|id| self.position_of(id))
            .or_else(|| {
                self.messages
                    .iter()
                    .rposition(|m| m.role == role && !m.is_final)
            });

        match position {
            Some(index) => {
                let message = &mut self.messages[index];
                message.text = text;
                message.is_final = false;
                self.ongoing.insert(role, message.id.clone());
                Reconciled::Updated(message.id.clone())
            }
            None => {
                let message = TranscriptMessage::new(role, text, false);
                let id = message.id.clone();
                self.ongoing.insert(role, id.clone());
                self.messages.push(message);
                Reconciled::Appended(id)
            }
        }
    }

    fn apply_final(&mut self, role: Role, text: String) -> Reconciled {
        if let Some(id) = self.ongoing.remove(&role) {
            if let Some(index) = self.position_of(&id) {
                let message = &mut self.messages[index];
                message.text = text;
                message.is_final = true;
                return Reconciled::Finalized(id);
            }
        }

        // Upstream sometimes repeats a final notification.
        if self
            .messages
            .iter()
            .any(|m| m.role == role && m.text == text)
        {
            debug!("Discarding duplicate final {} message", role);
            return Reconciled::Duplicate;
        }

        let message = TranscriptMessage::new(role, text, true);
        let id = message.id.clone();
        self.messages.push(message);
        Reconciled::Appended(id)
    }

    /// Forget which messages are in progress.
    ///
    /// Unsettled messages stay in the list with `is_final == false`.
    pub fn end_session(&mut self) {
        self.ongoing.clear();
    }

    /// Drop all messages and ongoing tracking
    pub fn reset(&mut self) {
        self.messages.clear();
        self.ongoing.clear();
    }

    fn position_of(&self, id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }
}
