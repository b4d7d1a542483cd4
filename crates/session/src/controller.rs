use std::collections::BTreeSet;

use serde_json::json;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use eim_events::{AppEvent, LogMessage, PlanUpdate, ProgressUpdate};
use eim_logview::LogStore;
use eim_progress::{InstallStep, ProgressAggregator, StepTracker};
use eim_types::{InstallStage, InstallationPlan, ProgressSnapshot, VersionState};

use crate::backend::InstallerBackend;
use crate::listeners::ListenerGuards;

/// Lifecycle of one installation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Finished,
    Failed,
}

/// One message pumped out of the event boundary.
enum Pumped {
    Progress(ProgressUpdate),
    Log(LogMessage),
    Plan(PlanUpdate),
    Flush,
    Closed,
}

/// Orchestrates one installation run against an [`InstallerBackend`].
///
/// All mutation happens on delivery of discrete events, on the single task
/// that owns the session; the log store, progress snapshot, and step index
/// are exclusively owned here and only read by the rendering layer.
#[derive(Debug)]
pub struct InstallationSession {
    state: SessionState,
    error_message: Option<String>,
    error_detail: Option<String>,
    installed: BTreeSet<String>,
    failed: BTreeSet<String>,
    plan: Option<InstallationPlan>,
    logs: LogStore,
    aggregator: ProgressAggregator,
    steps: StepTracker,
    listeners: Option<ListenerGuards>,
}

impl InstallationSession {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            error_message: None,
            error_detail: None,
            installed: BTreeSet::new(),
            failed: BTreeSet::new(),
            plan: None,
            logs: LogStore::new(),
            aggregator: ProgressAggregator::new(),
            steps: StepTracker::new(),
            listeners: None,
        }
    }

    /// Start a fresh installation run: reset derived state, attach
    /// listeners, dispatch the backend start command.
    ///
    /// A rejected start command is converted into terminal session state
    /// (never re-thrown): the session ends up `Failed` with the rejection
    /// message stored, and this method still returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` when a run is in flight.
    pub async fn start<B: InstallerBackend>(
        &mut self,
        backend: &B,
    ) -> Result<(), eim_errors::SessionError> {
        self.begin(backend)?;

        track(backend, "installation_started", json!({})).await;

        if let Err(err) = backend.start_installation().await {
            error!(message = err.message(), "start command rejected");
            self.fail(err.message().to_string(), None, None);
        }
        Ok(())
    }

    /// Fix-mode entry: the backend is presumed already started externally;
    /// only reset and attach listeners, skip the start command.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyRunning` when a run is in flight.
    pub fn attach<B: InstallerBackend>(
        &mut self,
        backend: &B,
    ) -> Result<(), eim_errors::SessionError> {
        self.begin(backend)
    }

    fn begin<B: InstallerBackend>(
        &mut self,
        backend: &B,
    ) -> Result<(), eim_errors::SessionError> {
        if self.state == SessionState::Running {
            return Err(eim_errors::SessionError::AlreadyRunning);
        }

        self.logs.clear();
        self.aggregator.reset();
        self.steps.reset();
        self.plan = None;
        self.installed.clear();
        self.failed.clear();
        self.error_message = None;
        self.error_detail = None;

        // Release any stale listeners from a previous run before
        // re-acquiring; acquisition itself cannot fail on a live channel set.
        if let Some(mut old) = self.listeners.take() {
            old.release();
        }
        self.listeners = Some(ListenerGuards::acquire(backend.channels()));
        self.state = SessionState::Running;
        debug!("installation session running");
        Ok(())
    }

    /// Drive the session until it leaves the running state, then release
    /// the listeners and report the outcome through telemetry.
    pub async fn run_until_terminal<B: InstallerBackend>(&mut self, backend: &B) -> SessionState {
        while self.state == SessionState::Running {
            match self.next_message().await {
                Pumped::Progress(update) => self.handle_progress(&update),
                Pumped::Log(message) => self.handle_log(&message),
                Pumped::Plan(plan) => self.handle_plan(plan),
                Pumped::Flush => self.aggregator.flush(),
                Pumped::Closed => {
                    warn!("event boundary closed while running");
                    break;
                }
            }
        }
        // Events already delivered before the terminal one still get
        // applied, so the log view and plan index do not lose their tail.
        self.drain_delivered();
        self.teardown();

        match self.state {
            SessionState::Finished => {
                track(
                    backend,
                    "installation_finished",
                    json!({ "versions": self.installed.iter().collect::<Vec<_>>() }),
                )
                .await;
            }
            SessionState::Failed => {
                track(
                    backend,
                    "installation_failed",
                    json!({ "error": self.error_message }),
                )
                .await;
            }
            SessionState::Idle | SessionState::Running => {}
        }
        self.state
    }

    /// Wait for the next event, flush deadline, or channel closure.
    async fn next_message(&mut self) -> Pumped {
        let deadline = self.aggregator.pending_deadline();
        let Some(listeners) = self.listeners.as_mut() else {
            return Pumped::Closed;
        };
        let Some((progress, log, plan)) = listeners.split_mut() else {
            return Pumped::Closed;
        };

        loop {
            tokio::select! {
                received = progress.recv() => match received {
                    Ok(update) => return Pumped::Progress(update),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "progress listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Pumped::Closed,
                },
                received = log.recv() => match received {
                    Ok(message) => return Pumped::Log(message),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "log listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Pumped::Closed,
                },
                received = plan.recv() => match received {
                    Ok(update) => return Pumped::Plan(update),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "plan listener lagged");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return Pumped::Closed,
                },
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() => return Pumped::Flush,
            }
        }
    }

    /// Apply everything the boundary already delivered, without waiting.
    /// Per-type FIFO order is preserved; order across types is not
    /// guaranteed, matching the boundary itself.
    fn drain_delivered(&mut self) {
        let mut delivered = Vec::new();
        if let Some((progress, log, plan)) =
            self.listeners.as_mut().and_then(ListenerGuards::split_mut)
        {
            while let Ok(update) = progress.try_recv() {
                delivered.push(AppEvent::Progress(update));
            }
            while let Ok(message) = log.try_recv() {
                delivered.push(AppEvent::Log(message));
            }
            while let Ok(update) = plan.try_recv() {
                delivered.push(AppEvent::Plan(update));
            }
        }
        for event in delivered {
            self.handle_event(event);
        }
    }

    /// Apply one event. Exposed for synchronous, deterministic tests; the
    /// async loop funnels into the same handlers.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Progress(update) => self.handle_progress(&update),
            AppEvent::Log(message) => self.handle_log(&message),
            AppEvent::Plan(plan) => self.handle_plan(plan),
        }
    }

    fn handle_progress(&mut self, update: &ProgressUpdate) {
        match update.stage {
            InstallStage::Complete => {
                // The completion milestone always renders as 100%.
                let mut update = update.clone();
                update.percentage = 100;
                self.aggregator.record(&update);
                if self.state != SessionState::Failed {
                    self.steps.observe(InstallStage::Complete, 100);
                }
                if let Some(version) = self.resolve_version(update.version.as_deref()) {
                    // Idempotent: re-completing a version is a no-op.
                    self.installed.insert(version);
                }
                if self.state == SessionState::Running {
                    self.state = SessionState::Finished;
                }
            }
            InstallStage::Error => {
                self.aggregator.record(update);
                // The step index deliberately stays where it was: the
                // indicator freezes at the failure point.
                self.fail(
                    update.message.clone(),
                    update.detail.clone(),
                    update.version.clone(),
                );
            }
            _ => {
                self.aggregator.record(update);
                // A failed run keeps its step frozen at the failure point.
                if self.state != SessionState::Failed {
                    self.steps.observe(update.stage, update.percentage);
                }
            }
        }
    }

    fn handle_log(&mut self, message: &LogMessage) {
        self.logs.append(message.level, message.message.clone());
    }

    fn handle_plan(&mut self, update: PlanUpdate) {
        match self.plan.as_mut() {
            // The plan is set once per run; later events only move the
            // current version index.
            Some(plan) => plan.current_version_index = update.current_version_index,
            None => {
                self.plan = Some(InstallationPlan {
                    total_versions: update.total_versions,
                    versions: update.versions,
                    current_version_index: update.current_version_index,
                });
            }
        }
    }

    fn fail(&mut self, message: String, detail: Option<String>, version: Option<String>) {
        if let Some(version) = self.resolve_version(version.as_deref()) {
            self.failed.insert(version);
        }
        self.error_message = Some(message);
        self.error_detail = detail;
        if self.state == SessionState::Running {
            self.state = SessionState::Failed;
        }
    }

    /// The version an event refers to: the explicit payload version, or the
    /// plan's current one.
    fn resolve_version(&self, event_version: Option<&str>) -> Option<String> {
        event_version
            .map(str::to_string)
            .or_else(|| self.plan.as_ref()?.current_version().map(str::to_string))
    }

    /// Release the event subscriptions. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        if let Some(listeners) = self.listeners.as_mut() {
            listeners.release();
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Navigation-blocking query: is an installation in flight?
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    #[must_use]
    pub fn installed_versions(&self) -> &BTreeSet<String> {
        &self.installed
    }

    #[must_use]
    pub fn failed_versions(&self) -> &BTreeSet<String> {
        &self.failed
    }

    #[must_use]
    pub fn plan(&self) -> Option<&InstallationPlan> {
        self.plan.as_ref()
    }

    #[must_use]
    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    #[must_use]
    pub fn current_step(&self) -> InstallStep {
        self.steps.current()
    }

    /// Latest aggregated truth, independent of the publish cadence.
    #[must_use]
    pub fn progress(&self) -> &ProgressSnapshot {
        self.aggregator.snapshot()
    }

    /// Observer registration for the throttled snapshot stream.
    #[must_use]
    pub fn subscribe_progress(&self) -> watch::Receiver<ProgressSnapshot> {
        self.aggregator.subscribe()
    }

    /// Derived per-version chips: completed, failed, active, or pending.
    #[must_use]
    pub fn version_states(&self) -> Vec<(String, VersionState)> {
        let Some(plan) = self.plan.as_ref() else {
            return Vec::new();
        };
        plan.versions
            .iter()
            .map(|version| {
                let state = if self.installed.contains(version) {
                    VersionState::Completed
                } else if self.failed.contains(version) {
                    VersionState::Failed
                } else if self.state == SessionState::Running
                    && plan.current_version() == Some(version.as_str())
                {
                    VersionState::Active
                } else {
                    VersionState::Pending
                };
                (version.clone(), state)
            })
            .collect()
    }
}

impl Default for InstallationSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Fire-and-forget telemetry: failures are logged locally, never surfaced.
async fn track<B: InstallerBackend>(backend: &B, name: &str, data: serde_json::Value) {
    if let Err(err) = backend.track_event(name, data).await {
        warn!(event = name, message = err.message(), "telemetry dropped");
    }
}
