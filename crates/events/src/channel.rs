use tokio::sync::broadcast;

use crate::{AppEvent, LogMessage, PlanUpdate, ProgressUpdate};

/// Default depth of each per-type broadcast channel. Progress events can
/// arrive many times per second during download phases; receivers that fall
/// further behind than this observe a `Lagged` gap rather than blocking the
/// producer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

pub type ProgressSender = broadcast::Sender<ProgressUpdate>;
pub type ProgressReceiver = broadcast::Receiver<ProgressUpdate>;
pub type LogSender = broadcast::Sender<LogMessage>;
pub type LogReceiver = broadcast::Receiver<LogMessage>;
pub type PlanSender = broadcast::Sender<PlanUpdate>;
pub type PlanReceiver = broadcast::Receiver<PlanUpdate>;

/// The three publish/subscribe channels of the backend event boundary.
///
/// One channel per wire event type, mirroring the three frontend listeners
/// (`installation-progress`, `log-message`, `installation-plan`). Events of
/// the same type are delivered in FIFO order; no coalescing happens here.
#[derive(Debug, Clone)]
pub struct BackendChannels {
    progress: ProgressSender,
    log: LogSender,
    plan: PlanSender,
}

impl BackendChannels {
    /// Create the channel set with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create the channel set with an explicit per-channel capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (progress, _) = broadcast::channel(capacity);
        let (log, _) = broadcast::channel(capacity);
        let (plan, _) = broadcast::channel(capacity);
        Self { progress, log, plan }
    }

    /// Route an event onto its wire channel. Send errors mean no receiver is
    /// currently subscribed and are deliberately ignored.
    pub fn publish(&self, event: AppEvent) {
        match event {
            AppEvent::Progress(update) => {
                let _ = self.progress.send(update);
            }
            AppEvent::Log(message) => {
                let _ = self.log.send(message);
            }
            AppEvent::Plan(plan) => {
                let _ = self.plan.send(plan);
            }
        }
    }

    /// Acquire one subscription per event type.
    #[must_use]
    pub fn subscribe(&self) -> BackendSubscriptions {
        BackendSubscriptions {
            progress: self.progress.subscribe(),
            log: self.log.subscribe(),
            plan: self.plan.subscribe(),
        }
    }
}

impl Default for BackendChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// One receiver per wire event type, handed out together.
#[derive(Debug)]
pub struct BackendSubscriptions {
    pub progress: ProgressReceiver,
    pub log: LogReceiver,
    pub plan: PlanReceiver,
}
