use super::conversation::{duration_label, SavedConversation};
use super::kv::KeyValueStore;
use crate::transcript::TranscriptMessage;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Fixed key holding the serialized history
pub const SAVED_CONVERSATIONS_KEY: &str = "savedInterviews";

/// History of finished sessions, newest first
///
/// Saving reads the current list and overwrites it with the new entry prepended.
/// Two writers sharing one backing store can lose each other's updates.
#[derive(Clone)]
pub struct ConversationStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Load the saved history.
    ///
    /// Missing or unreadable data yields an empty list.
    pub fn load(&self) -> Vec<SavedConversation> {
        let raw = match self.backend.get(SAVED_CONVERSATIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read saved conversations: {:#}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(conversations) => conversations,
            Err(e) => {
                warn!("Saved conversations are corrupt, starting fresh: {}", e);
                Vec::new()
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<SavedConversation> {
        self.load().into_iter().find(|c| c.id == id)
    }

    /// Persist a finished session at the front of the history
    pub fn save(
        &self,
        messages: &[TranscriptMessage],
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<SavedConversation> {
        let conversation = SavedConversation {
            id: uuid::Uuid::new_v4().to_string(),
            date_created: Utc::now(),
            start_time,
            end_time: Some(end_time),
            duration: duration_label(start_time, end_time),
            message_count: messages.len(),
            interview: messages.to_vec(),
        };

        let mut conversations = self.load();
        conversations.insert(0, conversation.clone());

        let payload =
            serde_json::to_string(&conversations).context("Failed to serialize conversations")?;
        self.backend
            .set(SAVED_CONVERSATIONS_KEY, &payload)
            .context("Failed to persist conversations")?;

        info!(
            "Saved conversation {} ({}, {} messages)",
            conversation.id, conversation.duration, conversation.message_count
        );

        Ok(conversation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryKeyValueStore, SHORT_DURATION_LABEL};
    use crate::transcript::Role;
    use chrono::Duration;

    fn store() -> (ConversationStore, Arc<MemoryKeyValueStore>) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        (ConversationStore::new(backend.clone()), backend)
    }

    fn messages() -> Vec<TranscriptMessage> {
        vec![
            TranscriptMessage::new(Role::User, "hello", true),
            TranscriptMessage::new(Role::Assistant, "hi there", true),
        ]
    }

    #[test]
    fn test_load_empty_when_absent() {
        let (store, _) = store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_empty_when_corrupt() {
        let (store, backend) = store();
        backend.set(SAVED_CONVERSATIONS_KEY, "{not json").unwrap();
        assert!(store.load().is_empty());

        backend.set(SAVED_CONVERSATIONS_KEY, r#"{"id":"x"}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_prepends_newest_first() {
        let (store, _) = store();
        let t0 = Utc::now();

        let first = store.save(&messages(), t0, t0 + Duration::minutes(5)).unwrap();
        let second = store
            .save(&messages()[..1], t0, t0 + Duration::seconds(30))
            .unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].id, second.id);
        assert_eq!(loaded[1].id, first.id);
        assert_eq!(loaded[1].duration, "5 min");
        assert_eq!(loaded[0].duration, SHORT_DURATION_LABEL);
        assert_eq!(loaded[1].message_count, 2);
        assert_eq!(loaded[1].interview, first.interview);
    }

    #[test]
    fn test_save_over_corrupt_history_starts_fresh() {
        let (store, backend) = store();
        backend.set(SAVED_CONVERSATIONS_KEY, "garbage").unwrap();

        let t0 = Utc::now();
        store.save(&messages(), t0, t0 + Duration::minutes(1)).unwrap();

        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_get_by_id() {
        let (store, _) = store();
        let t0 = Utc::now();
        let saved = store.save(&messages(), t0, t0 + Duration::minutes(2)).unwrap();

        assert_eq!(store.get(&saved.id).map(|c| c.message_count), Some(2));
        assert!(store.get("missing").is_none());
    }
}
