use eim_config::Settings;
use eim_errors::CommandError;
use eim_events::BackendChannels;

/// The command boundary fulfilled by the external installer engine.
///
/// Success of `start_installation` only acknowledges dispatch; the terminal
/// outcome arrives later as a `complete` or `error` stage event on the
/// event boundary. All calls are driven from the single session task.
pub trait InstallerBackend {
    /// The event channels this backend publishes into.
    fn channels(&self) -> &BackendChannels;

    /// Kick off the installation.
    ///
    /// # Errors
    ///
    /// Rejected with a human-readable message when the installation could
    /// not even be dispatched (process launch failure, invalid settings).
    fn start_installation(&self) -> impl std::future::Future<Output = Result<(), CommandError>>;

    /// Current installer settings, including selected IDF versions and the
    /// target path.
    ///
    /// # Errors
    ///
    /// Rejected when the backend cannot produce its settings object.
    fn settings(&self) -> impl std::future::Future<Output = Result<Settings, CommandError>>;

    /// Platform identifier of the machine the backend runs on.
    fn operating_system(&self) -> &'static str {
        std::env::consts::OS
    }

    /// Fire-and-forget telemetry. Callers swallow failures; implementations
    /// should not retry.
    ///
    /// # Errors
    ///
    /// Rejected when the telemetry sink is unreachable; callers log and
    /// continue.
    fn track_event(
        &self,
        name: &str,
        additional_data: serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), CommandError>>;
}
