#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the eim installation core
//!
//! Fine-grained error types organized by domain, aggregated into a single
//! [`Error`] for cross-crate boundaries. Backend-call failures are converted
//! into session state at the call site rather than re-thrown to a global
//! handler, so these types stay small and cloneable.

use thiserror::Error;

pub mod command;
pub mod config;
pub mod session;

pub use command::CommandError;
pub use config::ConfigError;
pub use session::SessionError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("command error: {0}")]
    Command(#[from] CommandError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
        path: Option<std::path::PathBuf>,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Create an Io error with an associated path
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: Some(path.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(ConfigError::Parse {
            message: err.to_string(),
        })
    }
}

/// Result type alias for eim operations
pub type Result<T> = std::result::Result<T, Error>;
