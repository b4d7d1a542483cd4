//! Tracing setup and structured event logging

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use eim_events::{AppEvent, EventLevel, EventMessage};

/// Initialize the tracing subscriber. `RUST_LOG` overrides the default
/// directive; `-v` raises the baseline to debug.
pub fn init(verbose: u8) {
    let default_directive = if verbose > 0 { "eim=debug,info" } else { "eim=info,warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Log an event with structured fields at its own severity.
pub fn log_event(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Progress(update) => match meta.level {
            EventLevel::Error => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    stage = %update.stage,
                    percentage = update.percentage,
                    message = %update.message,
                    detail = ?update.detail,
                    "installation error"
                );
            }
            _ => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    stage = %update.stage,
                    percentage = update.percentage,
                    version = ?update.version,
                    "installation progress"
                );
            }
        },
        AppEvent::Log(line) => match meta.level {
            EventLevel::Error => {
                error!(source = meta.source.as_str(), event_id = %meta.event_id, "{}", line.message);
            }
            EventLevel::Warn => {
                warn!(source = meta.source.as_str(), event_id = %meta.event_id, "{}", line.message);
            }
            _ => {
                debug!(source = meta.source.as_str(), event_id = %meta.event_id, "{}", line.message);
            }
        },
        AppEvent::Plan(plan) => {
            info!(
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                total_versions = plan.total_versions,
                current = ?plan.current_version_index,
                "installation plan"
            );
        }
    }
}
