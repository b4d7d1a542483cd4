//! Throttled snapshot publication over an always-current cell

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::trace;

use eim_events::ProgressUpdate;
use eim_types::{now_ms, ProgressSnapshot};

/// Minimum spacing between snapshot publications. Bounds observer re-render
/// cost to ~10Hz no matter how fast the backend emits.
pub const PUBLISH_INTERVAL: Duration = Duration::from_millis(100);

/// Aggregates the raw progress stream into one owned [`ProgressSnapshot`].
///
/// Every incoming event overwrites the snapshot synchronously, so the latest
/// truth is never lost. Publication to subscribers is decoupled: a leading
/// publish fires when the previous one is at least [`PUBLISH_INTERVAL`] old,
/// otherwise a trailing publish is (re)scheduled so the final event of a
/// burst always reaches observers. Terminal stages bypass the throttle
/// entirely: completion and failure are milestones that must not lag.
///
/// The owner drives the trailing edge: `pending_deadline()` feeds the event
/// loop's sleep arm and `flush()` is called when that sleep fires. This
/// keeps all mutation on the single event-dispatch task.
#[derive(Debug)]
pub struct ProgressAggregator {
    snapshot: ProgressSnapshot,
    publisher: watch::Sender<ProgressSnapshot>,
    interval: Duration,
    last_publish: Option<Instant>,
    pending: Option<Instant>,
    publish_count: u64,
}

impl ProgressAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_interval(PUBLISH_INTERVAL)
    }

    #[must_use]
    pub fn with_interval(interval: Duration) -> Self {
        let (publisher, _) = watch::channel(ProgressSnapshot::default());
        Self {
            snapshot: ProgressSnapshot::default(),
            publisher,
            interval,
            last_publish: None,
            pending: None,
            publish_count: 0,
        }
    }

    /// Record one backend progress event.
    ///
    /// The snapshot is overwritten unconditionally; only the publication is
    /// throttled.
    pub fn record(&mut self, update: &ProgressUpdate) {
        self.snapshot.overwrite(
            update.percentage,
            update.message.clone(),
            update.detail.clone().unwrap_or_default(),
            now_ms(),
        );

        let now = Instant::now();
        if update.stage.is_terminal() {
            self.publish(now);
            return;
        }

        let due = self
            .last_publish
            .is_none_or(|previous| now.duration_since(previous) >= self.interval);
        if due {
            self.publish(now);
        } else {
            // Reschedule the trailing publish; the newest event wins.
            self.pending = Some(now + self.interval);
        }
    }

    /// Deadline of the scheduled trailing publish, if one is outstanding.
    #[must_use]
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Fire the trailing publish. No-op when nothing is scheduled.
    pub fn flush(&mut self) {
        if self.pending.is_some() {
            self.publish(Instant::now());
        }
    }

    /// Reset for a fresh installation run and publish the pristine state
    /// immediately so observers drop stale progress at once.
    pub fn reset(&mut self) {
        self.snapshot.reset();
        self.pending = None;
        self.publisher.send_replace(self.snapshot.clone());
        self.publish_count += 1;
        // Allow the first event of the new run to publish without delay.
        self.last_publish = None;
    }

    /// The latest recorded truth, possibly newer than what subscribers saw.
    #[must_use]
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Register an observer. Receivers always hold the last published value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.publisher.subscribe()
    }

    /// Number of publications so far (the throttle trigger counter).
    #[must_use]
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }

    fn publish(&mut self, now: Instant) {
        self.pending = None;
        self.last_publish = Some(now);
        self.publish_count += 1;
        trace!(percentage = self.snapshot.percentage, "publishing progress snapshot");
        self.publisher.send_replace(self.snapshot.clone());
    }
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eim_types::InstallStage;
    use tokio::time::{self, Duration};

    fn update(stage: InstallStage, percentage: u32, message: &str) -> ProgressUpdate {
        ProgressUpdate {
            stage,
            percentage,
            message: message.into(),
            detail: None,
            version: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_event_publishes_immediately() {
        let mut aggregator = ProgressAggregator::new();
        let rx = aggregator.subscribe();
        aggregator.record(&update(InstallStage::Checking, 0, "Starting"));
        assert_eq!(aggregator.publish_count(), 1);
        assert_eq!(rx.borrow().activity, "Starting");
    }

    #[tokio::test(start_paused = true)]
    async fn burst_publishes_at_most_once_per_interval() {
        let mut aggregator = ProgressAggregator::new();
        let rx = aggregator.subscribe();

        // 10 events spread over 90ms: one leading publish, rest deferred.
        for pct in 0..10_u32 {
            aggregator.record(&update(InstallStage::Download, pct, "burst"));
            time::advance(Duration::from_millis(10)).await;
        }
        assert_eq!(aggregator.publish_count(), 1);
        assert_eq!(rx.borrow().percentage, 0);
        // The unpublished cell still holds the latest truth.
        assert_eq!(aggregator.snapshot().percentage, 9);

        // Trailing edge delivers the final values.
        let deadline = aggregator.pending_deadline().expect("trailing publish scheduled");
        time::advance(deadline.saturating_duration_since(Instant::now())).await;
        aggregator.flush();
        assert_eq!(aggregator.publish_count(), 2);
        assert_eq!(rx.borrow().percentage, 9);
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_events_each_publish() {
        let mut aggregator = ProgressAggregator::new();
        for pct in [10_u32, 20, 30] {
            aggregator.record(&update(InstallStage::Tools, pct, "spaced"));
            time::advance(Duration::from_millis(150)).await;
        }
        assert_eq!(aggregator.publish_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_stage_bypasses_throttle() {
        let mut aggregator = ProgressAggregator::new();
        let rx = aggregator.subscribe();
        aggregator.record(&update(InstallStage::Download, 50, "downloading"));
        time::advance(Duration::from_millis(10)).await;
        aggregator.record(&update(InstallStage::Error, 0, "failed"));
        assert_eq!(aggregator.publish_count(), 2);
        assert_eq!(rx.borrow().activity, "failed");
        assert_eq!(aggregator.pending_deadline(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_keeps_only_newest_deadline() {
        let mut aggregator = ProgressAggregator::new();
        aggregator.record(&update(InstallStage::Download, 1, "a"));
        time::advance(Duration::from_millis(30)).await;
        aggregator.record(&update(InstallStage::Download, 2, "b"));
        let first = aggregator.pending_deadline().unwrap();
        time::advance(Duration::from_millis(30)).await;
        aggregator.record(&update(InstallStage::Download, 3, "c"));
        let second = aggregator.pending_deadline().unwrap();
        assert!(second > first);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_publishes_pristine_state() {
        let mut aggregator = ProgressAggregator::new();
        let rx = aggregator.subscribe();
        aggregator.record(&update(InstallStage::Tools, 70, "tools"));
        aggregator.reset();
        assert_eq!(rx.borrow().percentage, 0);
        assert_eq!(rx.borrow().activity, "");
        // First event of the new run is a leading publish again.
        aggregator.record(&update(InstallStage::Checking, 0, "fresh"));
        assert_eq!(rx.borrow().activity, "fresh");
    }
}
