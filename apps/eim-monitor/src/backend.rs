//! Backend implementations for the monitor
//!
//! [`ProcessBackend`] spawns the installer executable and turns its output
//! stream into structured events; [`StdinBackend`] is the attach-mode
//! variant that consumes the output of an installation started externally
//! (piped into this process).

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use eim_config::Settings;
use eim_errors::CommandError;
use eim_events::{BackendChannels, EventEmitter};
use eim_session::InstallerBackend;
use eim_types::{InstallStage, InstallationPlan};

use crate::logging;
use crate::parse::{clean_log_line, LineParser};

/// Runs the installer engine as a child process and republishes its output
/// as events.
pub struct ProcessBackend {
    channels: BackendChannels,
    program: PathBuf,
    settings: Settings,
}

impl ProcessBackend {
    pub fn new(program: PathBuf, settings: Settings) -> Self {
        Self {
            channels: BackendChannels::new(),
            program,
            settings,
        }
    }
}

impl InstallerBackend for ProcessBackend {
    fn channels(&self) -> &BackendChannels {
        &self.channels
    }

    async fn start_installation(&self) -> Result<(), CommandError> {
        let versions = self.settings.selected_versions().to_vec();

        let mut command = Command::new(&self.program);
        command.arg("install").arg("--non-interactive");
        if !versions.is_empty() {
            command.arg("--idf-versions").arg(versions.join(","));
        }
        command.arg("--path").arg(&self.settings.path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        let mut child = command.spawn().map_err(|err| CommandError::Spawn {
            message: format!("{}: {err}", self.program.display()),
        })?;
        info!(program = %self.program.display(), "installer process spawned");

        let stdout = child.stdout.take().ok_or_else(|| CommandError::Spawn {
            message: "installer stdout not captured".into(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| CommandError::Spawn {
            message: "installer stderr not captured".into(),
        })?;

        self.channels
            .emit_plan(&InstallationPlan::new(versions.clone()));
        self.channels.emit_stage(
            InstallStage::Checking,
            0,
            "Starting installation...",
            None,
            None,
        );

        let channels = self.channels.clone();
        tokio::spawn(async move {
            supervise(channels, child, stdout, stderr, versions).await;
        });
        Ok(())
    }

    async fn settings(&self) -> Result<Settings, CommandError> {
        Ok(self.settings.clone())
    }

    async fn track_event(
        &self,
        name: &str,
        additional_data: serde_json::Value,
    ) -> Result<(), CommandError> {
        // The engine owns the real telemetry endpoint; the monitor only
        // records the intent locally.
        debug!(event = name, data = %additional_data, "telemetry");
        Ok(())
    }
}

/// Pump both output streams through the parser, then report the process
/// exit as a terminal event. Stage markers in the output normally arrive
/// first; the exit report is the fallback for engines that die quietly.
async fn supervise(
    channels: BackendChannels,
    mut child: tokio::process::Child,
    stdout: impl AsyncRead + Unpin,
    stderr: impl AsyncRead + Unpin,
    versions: Vec<String>,
) {
    let mut parser = LineParser::new(versions);
    let mut out_lines = BufReader::new(stdout).lines();
    let mut err_lines = BufReader::new(stderr).lines();
    let mut out_done = false;
    let mut err_done = false;

    while !(out_done && err_done) {
        tokio::select! {
            line = out_lines.next_line(), if !out_done => match line {
                Ok(Some(line)) => publish_parsed(&channels, &mut parser, &line),
                Ok(None) | Err(_) => out_done = true,
            },
            line = err_lines.next_line(), if !err_done => match line {
                Ok(Some(line)) => {
                    if let Some(message) = clean_log_line(&line) {
                        channels.emit_error(message);
                    }
                }
                Ok(None) | Err(_) => err_done = true,
            },
        }
    }

    match child.wait().await {
        Ok(status) if status.success() => {
            channels.emit_stage(
                InstallStage::Complete,
                100,
                "ESP-IDF installation completed successfully!",
                Some("Installation finished".into()),
                None,
            );
        }
        Ok(status) => {
            channels.emit_stage(
                InstallStage::Error,
                0,
                "Installation process failed".to_string(),
                Some(format!("installer exited with {status}")),
                None,
            );
        }
        Err(err) => {
            channels.emit_stage(
                InstallStage::Error,
                0,
                "Installation process failed".to_string(),
                Some(err.to_string()),
                None,
            );
        }
    }
}

fn publish_parsed(channels: &BackendChannels, parser: &mut LineParser, line: &str) {
    for event in parser.parse(line) {
        logging::log_event(&eim_events::EventMessage::stamp(event.clone()));
        channels.publish(event);
    }
}

/// Attach-mode backend: the installation was started externally and its
/// output is piped into this process; only the event boundary is live.
pub struct StdinBackend {
    channels: BackendChannels,
    settings: Settings,
}

impl StdinBackend {
    pub fn new(settings: Settings) -> Self {
        Self {
            channels: BackendChannels::new(),
            settings,
        }
    }

    /// Start pumping stdin through the parser.
    pub fn spawn_reader(&self) {
        let channels = self.channels.clone();
        let versions = self.settings.selected_versions().to_vec();
        if !versions.is_empty() {
            channels.emit_plan(&InstallationPlan::new(versions.clone()));
        }
        tokio::spawn(async move {
            let mut parser = LineParser::new(versions);
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                publish_parsed(&channels, &mut parser, &line);
            }
        });
    }
}

impl InstallerBackend for StdinBackend {
    fn channels(&self) -> &BackendChannels {
        &self.channels
    }

    async fn start_installation(&self) -> Result<(), CommandError> {
        Err(CommandError::rejected(
            "attach-only session: the installer was started externally",
        ))
    }

    async fn settings(&self) -> Result<Settings, CommandError> {
        Ok(self.settings.clone())
    }

    async fn track_event(
        &self,
        name: &str,
        additional_data: serde_json::Value,
    ) -> Result<(), CommandError> {
        debug!(event = name, data = %additional_data, "telemetry");
        Ok(())
    }
}
