//! Event handling and progress display

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use eim_logview::{LogStore, VirtualWindow, DEFAULT_ITEM_HEIGHT};
use eim_progress::InstallStep;
use eim_session::{InstallationSession, SessionState};
use eim_types::{LogLevel, ProgressSnapshot, VersionState};

/// Lines of the log recap printed after the run.
const RECAP_LINES: usize = 15;

/// Renders throttled snapshots and log lines while a run is in flight, and
/// a summary once it ends.
pub struct EventHandler {
    bar: ProgressBar,
    logs: LogStore,
}

impl EventHandler {
    pub fn new() -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Self {
            bar,
            logs: LogStore::new(),
        }
    }

    /// Apply one published snapshot to the progress bar.
    pub fn on_snapshot(&mut self, snapshot: &ProgressSnapshot) {
        self.bar.set_position(u64::from(snapshot.percentage));
        if snapshot.detail.is_empty() {
            self.bar.set_message(snapshot.activity.clone());
        } else {
            self.bar
                .set_message(format!("{} ({})", snapshot.activity, snapshot.detail));
        }
    }

    /// Print and retain one backend log line.
    pub fn on_log(&mut self, level: LogLevel, message: &str) {
        let styled = match level {
            LogLevel::Error => style(message).red().to_string(),
            LogLevel::Warning => style(message).yellow().to_string(),
            LogLevel::Success => style(message).green().to_string(),
            LogLevel::Info => message.to_string(),
        };
        self.bar.println(styled);
        self.logs.append(level, message);
    }

    /// Finish the bar and print the end-of-run summary.
    pub fn finish(&mut self, session: &InstallationSession) {
        match session.state() {
            SessionState::Finished => {
                self.bar.finish_with_message("installation complete");
                println!(
                    "{} installed: {}",
                    style("ok").green().bold(),
                    session
                        .installed_versions()
                        .iter()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            SessionState::Failed => {
                self.bar.abandon_with_message("installation failed");
                println!(
                    "{} {}",
                    style("error:").red().bold(),
                    session.error_message().unwrap_or("installation failed")
                );
                if let Some(detail) = session.error_detail() {
                    println!("  {detail}");
                }
                println!("  Check the installation log for details.");
            }
            SessionState::Idle | SessionState::Running => {
                self.bar.abandon_with_message("installation interrupted");
            }
        }

        self.print_steps(session);
        self.print_chips(session);
        self.print_recap();
    }

    /// The step indicator, with the reached step highlighted. On failure
    /// this shows the step the run froze at.
    fn print_steps(&self, session: &InstallationSession) {
        let current = session.current_step();
        let rendered: Vec<String> = InstallStep::ALL
            .iter()
            .map(|step| {
                if *step == current {
                    style(step.title()).bold().to_string()
                } else if *step < current {
                    style(step.title()).green().to_string()
                } else {
                    style(step.title()).dim().to_string()
                }
            })
            .collect();
        println!("steps: {}", rendered.join(" > "));
    }

    fn print_chips(&self, session: &InstallationSession) {
        let chips = session.version_states();
        if chips.is_empty() {
            return;
        }
        let rendered: Vec<String> = chips
            .into_iter()
            .map(|(version, state)| match state {
                VersionState::Completed => style(format!("[{version} ✓]")).green().to_string(),
                VersionState::Failed => style(format!("[{version} ✗]")).red().to_string(),
                VersionState::Active => style(format!("[{version} …]")).cyan().to_string(),
                VersionState::Pending => style(format!("[{version}]")).dim().to_string(),
            })
            .collect();
        println!("versions: {}", rendered.join(" "));
    }

    /// Recap of the most recent log lines, windowed the same way the GUI
    /// log viewer is: a viewport-sized slice of the bounded store.
    fn print_recap(&self) {
        if self.logs.is_empty() {
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        let viewport = RECAP_LINES as f64 * DEFAULT_ITEM_HEIGHT;
        let mut window = VirtualWindow::with_viewport(viewport);
        let slice = window.refresh(self.logs.len());

        println!("{}", style("recent log:").bold());
        // The store is newest-first; the recap reads top-down in time order.
        let mut entries = self.logs.slice(slice.start, slice.end);
        entries.reverse();
        for entry in entries {
            println!("  {} {}", style(entry.level).dim(), entry.text);
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
