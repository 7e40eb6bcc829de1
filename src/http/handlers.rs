use super::state::AppState;
use crate::session::SessionError;
use crate::store::{ConversationSummary, SavedConversation};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectVoiceRequest {
    pub voice_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopSessionResponse {
    pub status: String,
    pub message: String,
    /// Present when the session was long enough to be kept
    pub saved: Option<SavedConversation>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn session_error_response(e: SessionError) -> Response {
    let status = match &e {
        SessionError::AlreadyStarted(_)
        | SessionError::StartPending
        | SessionError::StartAbandoned
        | SessionError::NotActive(_) => StatusCode::CONFLICT,
        SessionError::UnknownVoice(_) => StatusCode::BAD_REQUEST,
        SessionError::StartFailed(_) | SessionError::Client(_) => StatusCode::BAD_GATEWAY,
    };
    error_response(status, e.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /session
/// Current session snapshot
pub async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

/// POST /session/start
/// Begin connecting; the voice client is called in the background
pub async fn start_session(State(state): State<AppState>) -> Response {
    let assistant = match state.controller.begin_start().await {
        Ok(assistant) => assistant,
        Err(e) => return session_error_response(e),
    };

    let controller = state.controller.clone();
    tokio::spawn(async move {
        if let Err(e) = controller.finish_start(assistant).await {
            error!("Session failed to start: {}", e);
        }
    });

    info!("Session connecting");

    (StatusCode::ACCEPTED, Json(state.controller.snapshot().await)).into_response()
}

/// POST /session/stop
/// Stop the active session, saving it if it has more than one message
pub async fn stop_session(State(state): State<AppState>) -> Response {
    match state.controller.stop().await {
        Ok(saved) => {
            let message = match &saved {
                Some(conversation) => format!(
                    "Session saved ({}, {} messages)",
                    conversation.duration, conversation.message_count
                ),
                None => "Session stopped".to_string(),
            };
            (
                StatusCode::OK,
                Json(StopSessionResponse {
                    status: "idle".to_string(),
                    message,
                    saved,
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Failed to stop session: {}", e);
            session_error_response(e)
        }
    }
}

/// POST /session/mute
/// Toggle the microphone mute
pub async fn toggle_mute(State(state): State<AppState>) -> Response {
    match state.controller.toggle_mute().await {
        Ok(_) => Json(state.controller.snapshot().await).into_response(),
        Err(e) => {
            error!("Failed to toggle mute: {}", e);
            session_error_response(e)
        }
    }
}

/// PUT /session/voice
/// Select the voice used by the next session
pub async fn select_voice(
    State(state): State<AppState>,
    Json(req): Json<SelectVoiceRequest>,
) -> Response {
    match state.controller.set_voice(&req.voice_id).await {
        Ok(voice) => Json(voice).into_response(),
        Err(e) => session_error_response(e),
    }
}

/// GET /voices
pub async fn list_voices(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.voices().to_vec())
}

/// POST /session/live
/// Show the live transcript again
pub async fn return_to_live(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.return_to_live().await;
    Json(state.controller.snapshot().await)
}

/// GET /conversations
/// Saved history, newest first
pub async fn list_conversations(State(state): State<AppState>) -> impl IntoResponse {
    let summaries: Vec<ConversationSummary> = state
        .controller
        .saved_conversations()
        .await
        .iter()
        .enumerate()
        .map(|(index, conversation)| conversation.summary(index))
        .collect();
    Json(summaries)
}

/// GET /conversations/:id
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.controller.saved_conversation(&id).await {
        Some(conversation) => Json(conversation).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Conversation {} not found", id),
        ),
    }
}

/// POST /conversations/:id/view
/// Display a saved conversation instead of the live transcript
pub async fn view_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.controller.view_conversation(&id).await {
        Some(_) => Json(state.controller.snapshot().await).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Conversation {} not found", id),
        ),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
