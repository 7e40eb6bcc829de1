//! Conversation history persistence
//!
//! Finished sessions are kept as a newest-first JSON array under a single key of
//! a durable key-value store. The store is append-only: there is no update or
//! delete, and every save rewrites the whole list.

mod conversation;
mod kv;
mod store;

pub use conversation::{
    duration_label, format_date_time, ConversationSummary, FormattedDateTime, SavedConversation,
    SHORT_DURATION_LABEL,
};
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use store::{ConversationStore, SAVED_CONVERSATIONS_KEY};
