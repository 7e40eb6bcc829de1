//! HTTP API for the browser front end
//!
//! This module exposes the session controller as a small REST surface:
//! - GET /session - Current status, mute flag, error and live transcript
//! - POST /session/start, /session/stop, /session/mute - Session control
//! - GET /voices, PUT /session/voice - Voice selection
//! - GET /conversations, GET /conversations/:id - Saved history
//! - POST /conversations/:id/view, POST /session/live - Switch the displayed transcript
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{SelectVoiceRequest, StopSessionResponse};
pub use routes::create_router;
pub use state::AppState;
