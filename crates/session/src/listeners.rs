use eim_events::{BackendChannels, LogReceiver, PlanReceiver, ProgressReceiver};

/// The session's three event subscriptions, released exactly once.
///
/// Acquired when a run enters the running state and released unconditionally
/// on teardown. Each handle is consumed through `Option::take`, so a second
/// release is a no-op rather than a double-unsubscribe; dropping the guards
/// releases whatever is still held.
#[derive(Debug)]
pub struct ListenerGuards {
    progress: Option<ProgressReceiver>,
    log: Option<LogReceiver>,
    plan: Option<PlanReceiver>,
}

impl ListenerGuards {
    /// Subscribe to all three backend event types.
    #[must_use]
    pub fn acquire(channels: &BackendChannels) -> Self {
        let subs = channels.subscribe();
        Self {
            progress: Some(subs.progress),
            log: Some(subs.log),
            plan: Some(subs.plan),
        }
    }

    /// Unsubscribe every listener that is still registered. Idempotent.
    pub fn release(&mut self) {
        // Dropping a broadcast receiver is the unsubscribe.
        drop(self.progress.take());
        drop(self.log.take());
        drop(self.plan.take());
    }

    /// Whether every listener has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.progress.is_none() && self.log.is_none() && self.plan.is_none()
    }

    /// Mutable access to all three receivers, `None` once released.
    pub fn split_mut(
        &mut self,
    ) -> Option<(&mut ProgressReceiver, &mut LogReceiver, &mut PlanReceiver)> {
        match (self.progress.as_mut(), self.log.as_mut(), self.plan.as_mut()) {
            (Some(progress), Some(log), Some(plan)) => Some((progress, log, plan)),
            _ => None,
        }
    }
}

impl Drop for ListenerGuards {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_is_idempotent() {
        let channels = BackendChannels::new();
        let mut guards = ListenerGuards::acquire(&channels);
        assert!(!guards.is_released());
        guards.release();
        assert!(guards.is_released());
        // Second release must not panic or double-unsubscribe.
        guards.release();
        assert!(guards.is_released());
    }

    #[test]
    fn split_mut_requires_live_listeners() {
        let channels = BackendChannels::new();
        let mut guards = ListenerGuards::acquire(&channels);
        assert!(guards.split_mut().is_some());
        guards.release();
        assert!(guards.split_mut().is_none());
    }
}
