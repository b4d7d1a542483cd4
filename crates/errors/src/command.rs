use thiserror::Error;

/// Failures of the backend command boundary.
///
/// The start command's rejection carries only a human-readable message; the
/// session stores it as terminal state rather than propagating further.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    #[error("{message}")]
    Rejected { message: String },

    #[error("failed to launch installer: {message}")]
    Spawn { message: String },

    #[error("telemetry dispatch failed: {message}")]
    Telemetry { message: String },
}

impl CommandError {
    /// Wrap a backend rejection message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// The human-readable message, as rendered to the user on failure.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message } | Self::Spawn { message } | Self::Telemetry { message } => {
                message
            }
        }
    }
}
