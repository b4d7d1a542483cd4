use thiserror::Error;

/// Invalid session-controller transitions and listener bookkeeping failures.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("installation already running")]
    AlreadyRunning,

    #[error("session is not running")]
    NotRunning,

    #[error("listener registration failed: {message}")]
    ListenerRegistration { message: String },
}
