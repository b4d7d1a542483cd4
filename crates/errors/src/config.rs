use thiserror::Error;

/// Errors reading the settings or the install registry (`eim_idf.json`).
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("registry file not found: {path}")]
    RegistryNotFound { path: String },

    #[error("failed to parse registry: {message}")]
    Parse { message: String },

    #[error("no installation with id {id}")]
    UnknownInstallation { id: String },

    #[error("invalid setting {field}: {message}")]
    InvalidSetting { field: String, message: String },
}
