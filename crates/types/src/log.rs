use serde::{Deserialize, Serialize};

/// Severity of a backend log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl From<String> for LogLevel {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl LogLevel {
    /// Parse a backend-reported level string, defaulting to `Info` for
    /// anything unrecognized. The event stream is best-effort; an unknown
    /// level must never drop the message.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "warning" | "warn" => Self::Warning,
            "error" => Self::Error,
            "success" => Self::Success,
            _ => Self::Info,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_parse_maps_known_levels() {
        assert_eq!(LogLevel::parse_lenient("warning"), LogLevel::Warning);
        assert_eq!(LogLevel::parse_lenient("WARN"), LogLevel::Warning);
        assert_eq!(LogLevel::parse_lenient("error"), LogLevel::Error);
        assert_eq!(LogLevel::parse_lenient("success"), LogLevel::Success);
    }

    #[test]
    fn lenient_parse_defaults_to_info() {
        assert_eq!(LogLevel::parse_lenient("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::parse_lenient(""), LogLevel::Info);
    }

    #[test]
    fn serde_round_trip_uses_snake_case() {
        let json = serde_json::to_string(&LogLevel::Success).unwrap();
        assert_eq!(json, "\"success\"");
    }
}
