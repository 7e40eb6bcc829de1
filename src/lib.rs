pub mod config;
pub mod http;
pub mod nats;
pub mod replay;
pub mod session;
pub mod store;
pub mod transcript;
pub mod voice;

pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::NatsVoiceClient;
pub use replay::{ReplayOutcome, ReplayVoiceClient};
pub use session::{SessionConfig, SessionController, SessionError, SessionSnapshot, SessionStatus};
pub use store::{ConversationStore, FileKeyValueStore, KeyValueStore, SavedConversation};
pub use transcript::{Role, TranscriptEvent, TranscriptMessage, TranscriptReconciler};
pub use voice::{AssistantConfig, CallHandle, Voice, VoiceClient, VoiceEvent};
