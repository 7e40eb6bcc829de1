//! Voice client abstraction
//!
//! The real-time voice service (audio, speech recognition, language model) is an
//! external collaborator. The session controller only sees:
//! - `VoiceClient`: start / stop / mute calls and an event subscription
//! - `VoiceEvent`: `message`, `call-end` and `error` notifications
//! - `AssistantConfig`: the payload handed to `start`

mod assistant;
mod client;
mod listeners;

pub use assistant::{
    AssistantConfig, AssistantSettings, ModelConfig, SeedMessage, TranscriberConfig, Voice,
};
pub use client::{CallHandle, VoiceClient, VoiceEvent};
pub use listeners::{EventListeners, Subscription};
