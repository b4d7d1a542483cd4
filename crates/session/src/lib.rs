#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Installation session control
//!
//! [`InstallationSession`] orchestrates one installation run: it resets the
//! derived state (logs, progress, step index), acquires the three backend
//! event subscriptions, dispatches the start command, folds incoming events
//! into the aggregation pipeline, and tracks per-version completion and
//! failure. The backend itself is opaque: everything goes through the
//! [`backend::InstallerBackend`] command boundary and the event channels.

pub mod backend;
pub mod controller;
pub mod listeners;

pub use backend::InstallerBackend;
pub use controller::{InstallationSession, SessionState};
pub use listeners::ListenerGuards;
