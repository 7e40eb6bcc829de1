use super::status::SessionStatus;

/// Errors returned by `SessionController` operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `start` while a session is connecting or active
    #[error("session is already {0}")]
    AlreadyStarted(SessionStatus),

    /// `start` before the previous attempt's client call has returned
    #[error("a previous start is still in flight")]
    StartPending,

    /// The client connected after an error event had already ended the attempt
    #[error("start abandoned: the session ended while connecting")]
    StartAbandoned,

    /// `stop` without an active session
    #[error("no active session (status: {0})")]
    NotActive(SessionStatus),

    #[error("unknown voice: {0}")]
    UnknownVoice(String),

    /// The voice client rejected `start`
    #[error("failed to start session: {0:#}")]
    StartFailed(anyhow::Error),

    #[error("voice client error: {0:#}")]
    Client(anyhow::Error),
}
