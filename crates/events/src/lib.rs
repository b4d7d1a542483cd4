#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for the eim installation core
//!
//! The installer backend is consumed exclusively through a publish/subscribe
//! event boundary: progress updates, log lines, and multi-version install
//! plans. This crate defines the payload types matching that wire contract,
//! per-type broadcast channels modelling the boundary, and the unified
//! [`EventEmitter`] trait used by everything that produces events.

pub mod channel;
pub mod meta;
pub mod payload;

pub use channel::{
    BackendChannels, BackendSubscriptions, LogReceiver, LogSender, PlanReceiver, PlanSender,
    ProgressReceiver, ProgressSender, DEFAULT_CHANNEL_CAPACITY,
};
pub use meta::{EventLevel, EventMeta, EventSource};
pub use payload::{AppEvent, LogMessage, PlanUpdate, ProgressUpdate};

use eim_types::{InstallStage, InstallationPlan, LogLevel};

/// A meta-stamped event, as handed to logging and telemetry consumers.
#[derive(Debug, Clone)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Stamp an event with metadata derived from its own domain and level.
    #[must_use]
    pub fn stamp(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.event_level(), event.event_source());
        Self { meta, event }
    }
}

/// The unified trait for emitting backend events.
///
/// Implemented by anything holding a set of [`BackendChannels`]; the default
/// helpers cover the emission patterns the installer paths actually use.
/// Send errors are ignored; a closed boundary just means nobody is
/// listening anymore.
pub trait EventEmitter {
    /// The channels this emitter publishes into.
    fn channels(&self) -> Option<&BackendChannels>;

    /// Emit an event onto its wire channel.
    fn emit(&self, event: AppEvent) {
        if let Some(channels) = self.channels() {
            channels.publish(event);
        }
    }

    /// Emit an installation progress update.
    fn emit_stage(
        &self,
        stage: InstallStage,
        percentage: u32,
        message: impl Into<String>,
        detail: Option<String>,
        version: Option<String>,
    ) {
        self.emit(AppEvent::Progress(ProgressUpdate {
            stage,
            percentage,
            message: message.into(),
            detail,
            version,
        }));
    }

    /// Emit a log line at an explicit level.
    fn emit_log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(AppEvent::Log(LogMessage {
            level,
            message: message.into(),
        }));
    }

    /// Emit an info-level log line.
    fn emit_info(&self, message: impl Into<String>) {
        self.emit_log(LogLevel::Info, message);
    }

    /// Emit a warning-level log line.
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit_log(LogLevel::Warning, message);
    }

    /// Emit an error-level log line.
    fn emit_error(&self, message: impl Into<String>) {
        self.emit_log(LogLevel::Error, message);
    }

    /// Emit a success-level log line.
    fn emit_success(&self, message: impl Into<String>) {
        self.emit_log(LogLevel::Success, message);
    }

    /// Announce (or re-announce with a new index) the installation plan.
    fn emit_plan(&self, plan: &InstallationPlan) {
        self.emit(AppEvent::Plan(PlanUpdate {
            versions: plan.versions.clone(),
            total_versions: plan.total_versions,
            current_version_index: plan.current_version_index,
        }));
    }
}

impl EventEmitter for BackendChannels {
    fn channels(&self) -> Option<&BackendChannels> {
        Some(self)
    }
}
