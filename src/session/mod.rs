//! Voice session management
//!
//! This module provides the `SessionController` that owns:
//! - The `idle → connecting → active` status machine
//! - The live transcript fed by voice client events
//! - Mute and voice selection
//! - Saving finished sessions to the conversation history

mod config;
mod controller;
mod error;
mod status;

pub use config::SessionConfig;
pub use controller::{EventPump, SessionController};
pub use error::SessionError;
pub use status::{SessionSnapshot, SessionStatus};
