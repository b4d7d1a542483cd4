#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Progress aggregation and step derivation
//!
//! The backend reports progress at whatever rate its work produces, often
//! dozens of events per second during download phases.
//! [`aggregator::ProgressAggregator`]
//! absorbs that stream into a single owned snapshot (receipt is never
//! throttled) and republishes it to observers at a bounded cadence.
//! [`steps::StepTracker`] folds the same stream into the discrete step index
//! driving the step-indicator UI.

pub mod aggregator;
pub mod steps;

pub use aggregator::{ProgressAggregator, PUBLISH_INTERVAL};
pub use steps::{InstallStep, StepTracker, DOWNLOAD_SUBMODULE_THRESHOLD};
