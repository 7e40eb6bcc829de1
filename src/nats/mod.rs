pub mod client;
pub mod messages;

pub use client::NatsVoiceClient;
pub use messages::{CallStartedReply, MuteRequest, StartCallRequest};
