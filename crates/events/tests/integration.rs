//! Integration tests for the event boundary: channel routing, FIFO
//! ordering, and the emitter helpers.

use eim_events::{AppEvent, BackendChannels, EventEmitter, LogMessage, ProgressUpdate};
use eim_types::{InstallStage, InstallationPlan, LogLevel};

#[tokio::test]
async fn publish_routes_by_event_type() {
    let channels = BackendChannels::new();
    let mut subs = channels.subscribe();

    channels.publish(AppEvent::Progress(ProgressUpdate {
        stage: InstallStage::Checking,
        percentage: 0,
        message: "Starting installation...".into(),
        detail: None,
        version: None,
    }));
    channels.publish(AppEvent::Log(LogMessage {
        level: LogLevel::Info,
        message: "hello".into(),
    }));

    let progress = subs.progress.recv().await.unwrap();
    assert_eq!(progress.stage, InstallStage::Checking);
    let log = subs.log.recv().await.unwrap();
    assert_eq!(log.message, "hello");
    assert!(subs.plan.try_recv().is_err());
}

#[tokio::test]
async fn same_type_events_arrive_in_fifo_order() {
    let channels = BackendChannels::new();
    let mut subs = channels.subscribe();

    for pct in [5_u32, 10, 15, 20] {
        channels.emit_stage(InstallStage::Download, pct, "downloading", None, None);
    }

    let mut seen = Vec::new();
    for _ in 0..4 {
        seen.push(subs.progress.recv().await.unwrap().percentage);
    }
    assert_eq!(seen, vec![5, 10, 15, 20]);
}

#[tokio::test]
async fn emitter_helpers_fill_payloads() {
    let channels = BackendChannels::new();
    let mut subs = channels.subscribe();

    channels.emit_stage(
        InstallStage::Tools,
        65,
        "Installing 7 development tools...",
        Some("Preparing tools installation".into()),
        Some("v5.4.1".into()),
    );
    channels.emit_success("Tools installed");
    channels.emit_plan(&InstallationPlan::new(vec!["v5.3".into(), "v5.4.1".into()]));

    let progress = subs.progress.recv().await.unwrap();
    assert_eq!(progress.stage, InstallStage::Tools);
    assert_eq!(progress.detail.as_deref(), Some("Preparing tools installation"));
    assert_eq!(progress.version.as_deref(), Some("v5.4.1"));

    let log = subs.log.recv().await.unwrap();
    assert_eq!(log.level, LogLevel::Success);

    let plan = subs.plan.recv().await.unwrap();
    assert_eq!(plan.total_versions, 2);
    assert_eq!(plan.current_version_index, None);
}

#[tokio::test]
async fn publish_without_subscribers_is_silent() {
    let channels = BackendChannels::new();
    // No subscriptions held; the send error must be swallowed.
    channels.emit_info("nobody is listening");
}
