//! Installer output parsing
//!
//! The installer engine reports progress only through its log stream. This
//! parser folds those lines into structured events: stage transitions keyed
//! on known markers, tool-level sub-progress counted against the announced
//! tool list, and a cleaned info-level passthrough of everything worth
//! showing the user.

use eim_events::{AppEvent, LogMessage, PlanUpdate, ProgressUpdate};
use eim_types::{InstallStage, LogLevel};

/// Stateful line parser for one installation run.
#[derive(Debug)]
pub struct LineParser {
    /// Versions of the announced plan, used to resolve the plan index when
    /// the engine switches versions.
    versions: Vec<String>,
    current_version: Option<String>,
    percentage: u32,
    tools_started: bool,
    tools_total: u32,
    tools_done: u32,
}

impl LineParser {
    pub fn new(versions: Vec<String>) -> Self {
        Self {
            versions,
            current_version: None,
            percentage: 5,
            tools_started: false,
            tools_total: 0,
            tools_done: 0,
        }
    }

    /// Parse one line of installer output into zero or more events.
    pub fn parse(&mut self, line: &str) -> Vec<AppEvent> {
        let mut events = Vec::new();

        if let Some(version) = extract_bracketed(line, "Selected idf version:") {
            let version = version.replace('"', "").trim().to_string();
            self.current_version = Some(version.clone());
            if let Some(index) = self.versions.iter().position(|v| v == &version) {
                events.push(AppEvent::Plan(PlanUpdate {
                    versions: self.versions.clone(),
                    total_versions: self.versions.len(),
                    current_version_index: Some(index),
                }));
            }
            self.push_stage(
                &mut events,
                InstallStage::Download,
                10,
                format!("Starting ESP-IDF {version} installation"),
                "Preparing to download ESP-IDF",
            );
        } else if line.contains("Checking for prerequisites") {
            self.push_stage(
                &mut events,
                InstallStage::Prerequisites,
                8,
                "Checking prerequisites...",
                "Verifying system requirements",
            );
        } else if line.contains("Python sanity check") {
            self.push_stage(
                &mut events,
                InstallStage::Prerequisites,
                12,
                "Verifying Python installation...",
                "Checking Python environment",
            );
        } else if line.contains("Cloning ESP-IDF") || line.contains("git clone") {
            self.push_stage(
                &mut events,
                InstallStage::Download,
                15,
                "Downloading ESP-IDF repository...",
                "Cloning main repository",
            );
        } else if line.contains("Updating submodule") || line.contains("submodule update") {
            // The long tail of the download phase: creep towards 65%.
            let pct = (self.percentage + 2).min(65);
            self.push_stage(
                &mut events,
                InstallStage::Download,
                pct,
                "Downloading submodules...",
                "Processing ESP-IDF submodules",
            );
        } else if let Some(tools) = extract_bracketed(line, "Downloading tools:") {
            self.tools_total = u32::try_from(tools.split(',').count()).unwrap_or(u32::MAX);
            self.tools_started = true;
            self.push_stage(
                &mut events,
                InstallStage::Tools,
                65,
                format!("Installing {} development tools...", self.tools_total),
                "Preparing tools installation",
            );
        } else if self.tools_started && line.contains("Downloading tool:") {
            if let Some(position) = line.find("tool:") {
                let tool_name = line[position + 5..].trim().to_string();
                let pct = 65 + self.tools_done * 20 / self.tools_total.max(1);
                // The engine may not know the total on every platform; a
                // bare ordinal reads better than "of 0".
                let ordinal = self.tools_done + 1;
                self.push_stage(
                    &mut events,
                    InstallStage::Tools,
                    pct,
                    format!("Downloading: {tool_name}"),
                    format!("Tool {ordinal}"),
                );
            }
        } else if line.contains("extracted tool:") || line.contains("Decompression completed") {
            self.tools_done += 1;
            let pct = (65 + self.tools_done * 20 / self.tools_total.max(1)).min(85);
            self.push_stage(
                &mut events,
                InstallStage::Tools,
                pct,
                format!("Installed tool ({})", self.tools_done),
                "Tool installation completed",
            );
        } else if line.contains("Python environment") || line.contains("Installing python") {
            self.push_stage(
                &mut events,
                InstallStage::Python,
                90,
                "Setting up Python environment...",
                "Configuring Python dependencies",
            );
        } else if line.contains("Successfully installed IDF") || line.contains("Installation complete")
        {
            self.push_stage(
                &mut events,
                InstallStage::Complete,
                100,
                "ESP-IDF installation completed successfully!",
                "Installation finished",
            );
        }

        if let Some(cleaned) = clean_log_line(line) {
            events.push(AppEvent::Log(LogMessage {
                level: LogLevel::Info,
                message: cleaned,
            }));
        }
        events
    }

    fn push_stage(
        &mut self,
        events: &mut Vec<AppEvent>,
        stage: InstallStage,
        percentage: u32,
        message: impl Into<String>,
        detail: impl Into<String>,
    ) {
        self.percentage = percentage;
        events.push(AppEvent::Progress(ProgressUpdate {
            stage,
            percentage,
            message: message.into(),
            detail: Some(detail.into()),
            version: self.current_version.clone(),
        }));
    }
}

/// The `[...]` payload following a marker, if both are present.
fn extract_bracketed<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    if !line.contains(marker) {
        return None;
    }
    let start = line.find('[')?;
    let end = line.find(']')?;
    (start + 1 <= end).then(|| &line[start + 1..end])
}

/// Strip the engine's logger prefix and drop internal chatter.
pub(crate) fn clean_log_line(line: &str) -> Option<String> {
    if line.contains("DEBUG") || line.contains("TRACE") {
        return None;
    }
    let cleaned = match line.split_once(" - ") {
        Some((_, rest)) => rest,
        None => line,
    };
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Some(cleaned.to_string())
}
