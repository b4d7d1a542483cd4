//! eim-monitor: terminal monitor for ESP-IDF Installation Manager runs
//!
//! `run` spawns the installer engine and drives a full installation
//! session; `attach` joins a run started externally by reading the
//! engine's output from stdin (fix mode).

mod backend;
mod cli;
mod events;
mod logging;
mod parse;

use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use eim_config::{IdfConfig, Settings};
use eim_session::{InstallationSession, InstallerBackend, SessionState};

use crate::backend::{ProcessBackend, StdinBackend};
use crate::cli::{Cli, Command};
use crate::events::EventHandler;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    logging::init(args.verbose);

    let mut settings = Settings::default();
    if let Some(registry) = &args.registry {
        settings = settings.with_registry_dir(registry);
    }

    // The registry is read-only context: show what is already installed.
    match IdfConfig::from_file(settings.registry_path()).await {
        Ok(registry) => {
            info!(
                installed = ?registry.installed_versions(),
                selected = registry.selected().map(|install| install.name.clone()),
                "install registry loaded"
            );
        }
        Err(err) => warn!(%err, "install registry unavailable"),
    }

    match args.command {
        Command::Run {
            installer,
            versions,
            path,
        } => {
            if !versions.is_empty() {
                settings.idf_versions = Some(versions);
            }
            if let Some(path) = path {
                settings.path = path;
            }
            let backend = ProcessBackend::new(installer, settings);
            let mut session = InstallationSession::new();
            if let Err(err) = session.start(&backend).await {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
            monitor(session, &backend).await
        }
        Command::Attach { versions } => {
            if !versions.is_empty() {
                settings.idf_versions = Some(versions);
            }
            let backend = StdinBackend::new(settings);
            let mut session = InstallationSession::new();
            if let Err(err) = session.attach(&backend) {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
            backend.spawn_reader();
            monitor(session, &backend).await
        }
    }
}

/// Drive the session to a terminal state while rendering published
/// snapshots and log lines, then print the summary.
async fn monitor<B: InstallerBackend>(mut session: InstallationSession, backend: &B) -> ExitCode {
    match backend.settings().await {
        Ok(settings) => info!(
            os = backend.operating_system(),
            path = %settings.path.display(),
            versions = ?settings.selected_versions(),
            "monitoring installation"
        ),
        Err(err) => warn!(message = err.message(), "backend settings unavailable"),
    }

    let mut handler = EventHandler::new();
    let mut snapshots = session.subscribe_progress();
    let mut log_lines = backend.channels().subscribe().log;

    let outcome = {
        let run = session.run_until_terminal(backend);
        tokio::pin!(run);
        loop {
            tokio::select! {
                outcome = &mut run => break outcome,
                changed = snapshots.changed() => {
                    if changed.is_ok() {
                        let snapshot = snapshots.borrow_and_update().clone();
                        handler.on_snapshot(&snapshot);
                    }
                }
                received = log_lines.recv() => {
                    if let Ok(line) = received {
                        handler.on_log(line.level, &line.message);
                    }
                }
            }
        }
    };

    // Catch log lines that were still queued when the run ended.
    while let Ok(line) = log_lines.try_recv() {
        handler.on_log(line.level, &line.message);
    }
    handler.on_snapshot(&session.progress().clone());
    handler.finish(&session);

    match outcome {
        SessionState::Finished => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
