#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the eim installation core
//!
//! This crate provides the fundamental types shared across the system:
//! installation stages, log levels, progress snapshots, and the
//! multi-version installation plan.

pub mod log;
pub mod plan;
pub mod progress;
pub mod stage;

pub use log::LogLevel;
pub use plan::{segment_progress, InstallationPlan, VersionState};
pub use progress::{clamp_percent, ProgressSnapshot};
pub use stage::InstallStage;

/// Current wall-clock time in milliseconds since the Unix epoch.
///
/// Timestamps on log entries and progress snapshots use this resolution to
/// match the frontend wire contract.
#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
