use serde::{Deserialize, Serialize};

use crate::{EventLevel, EventSource};
use eim_types::{InstallStage, LogLevel};

/// Payload of the `installation-progress` wire event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: InstallStage,
    pub percentage: u32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Payload of the `log-message` wire event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    pub level: LogLevel,
    pub message: String,
}

/// Payload of the `installation-plan` wire event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanUpdate {
    pub versions: Vec<String>,
    pub total_versions: usize,
    #[serde(default)]
    pub current_version_index: Option<usize>,
}

/// Top-level event enum aggregating the three wire event types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    Progress(ProgressUpdate),
    Log(LogMessage),
    Plan(PlanUpdate),
}

impl AppEvent {
    /// The Tauri-style event name this payload travels under.
    #[must_use]
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Progress(_) => "installation-progress",
            Self::Log(_) => "log-message",
            Self::Plan(_) => "installation-plan",
        }
    }

    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::Progress(_) => EventSource::PROGRESS,
            Self::Log(_) => EventSource::LOG,
            Self::Plan(_) => EventSource::PLAN,
        }
    }

    /// Determine the appropriate severity for routing this event to logs.
    #[must_use]
    pub fn event_level(&self) -> EventLevel {
        match self {
            Self::Progress(update) if update.stage == InstallStage::Error => EventLevel::Error,
            Self::Progress(_) => EventLevel::Debug,
            Self::Log(message) => match message.level {
                LogLevel::Error => EventLevel::Error,
                LogLevel::Warning => EventLevel::Warn,
                LogLevel::Info | LogLevel::Success => EventLevel::Info,
            },
            Self::Plan(_) => EventLevel::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_payload_matches_wire_contract() {
        let json = r#"{
            "stage": "download",
            "percentage": 15,
            "message": "Downloading ESP-IDF repository...",
            "detail": "Cloning main repository",
            "version": "v5.4.1"
        }"#;
        let update: ProgressUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.stage, InstallStage::Download);
        assert_eq!(update.percentage, 15);
        assert_eq!(update.version.as_deref(), Some("v5.4.1"));
    }

    #[test]
    fn progress_payload_tolerates_missing_optionals() {
        let json = r#"{"stage": "checking", "percentage": 0, "message": "Starting"}"#;
        let update: ProgressUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(update.detail, None);
        assert_eq!(update.version, None);
    }

    #[test]
    fn log_payload_is_lenient_about_level() {
        let json = r#"{"level": "noise", "message": "hello"}"#;
        let message: LogMessage = serde_json::from_str(json).unwrap();
        assert_eq!(message.level, LogLevel::Info);
    }

    #[test]
    fn wire_names_are_stable() {
        let event = AppEvent::Plan(PlanUpdate {
            versions: vec!["v5.1".into()],
            total_versions: 1,
            current_version_index: None,
        });
        assert_eq!(event.wire_name(), "installation-plan");
    }

    #[test]
    fn error_stage_escalates_event_level() {
        let event = AppEvent::Progress(ProgressUpdate {
            stage: InstallStage::Error,
            percentage: 0,
            message: "failed".into(),
            detail: None,
            version: None,
        });
        assert_eq!(event.event_level(), EventLevel::Error);
    }
}
