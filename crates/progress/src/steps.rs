use eim_types::InstallStage;

/// Discrete UI step derived from backend stages. The order is the order the
/// step indicator renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InstallStep {
    Checking,
    Prerequisites,
    Download,
    Submodules,
    Tools,
    Python,
    Configure,
    Complete,
}

/// Percentage above which a `download` stage is displayed as the submodules
/// step. The backend signals the submodule sub-phase only through progress
/// crossing this threshold, not through a distinct stage name.
pub const DOWNLOAD_SUBMODULE_THRESHOLD: u32 = 10;

impl InstallStep {
    pub const ALL: [Self; 8] = [
        Self::Checking,
        Self::Prerequisites,
        Self::Download,
        Self::Submodules,
        Self::Tools,
        Self::Python,
        Self::Configure,
        Self::Complete,
    ];

    /// Position in the step indicator (0..=7).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Checking => 0,
            Self::Prerequisites => 1,
            Self::Download => 2,
            Self::Submodules => 3,
            Self::Tools => 4,
            Self::Python => 5,
            Self::Configure => 6,
            Self::Complete => 7,
        }
    }

    /// Label rendered next to the indicator.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Checking => "Checking system",
            Self::Prerequisites => "Prerequisites",
            Self::Download => "Downloading ESP-IDF",
            Self::Submodules => "Submodules",
            Self::Tools => "Development tools",
            Self::Python => "Python environment",
            Self::Configure => "Configuration",
            Self::Complete => "Complete",
        }
    }
}

/// Folds `(stage, percentage)` pairs into the current [`InstallStep`].
///
/// An `error` stage never moves the step: the indicator freezes at its last
/// position so the failure point stays visible. Unknown stages are ignored
/// the same way.
#[derive(Debug, Clone)]
pub struct StepTracker {
    current: InstallStep,
}

impl StepTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: InstallStep::Checking,
        }
    }

    #[must_use]
    pub fn current(&self) -> InstallStep {
        self.current
    }

    /// Back to step 0 for a fresh run.
    pub fn reset(&mut self) {
        self.current = InstallStep::Checking;
    }

    /// Apply one observed stage event. Returns the new step only when it
    /// actually changed, so callers can skip redundant state writes.
    pub fn observe(&mut self, stage: InstallStage, percentage: u32) -> Option<InstallStep> {
        let candidate = match stage {
            InstallStage::Checking => InstallStep::Checking,
            InstallStage::Prerequisites => InstallStep::Prerequisites,
            InstallStage::Download => {
                if percentage > DOWNLOAD_SUBMODULE_THRESHOLD {
                    InstallStep::Submodules
                } else {
                    InstallStep::Download
                }
            }
            InstallStage::Extract | InstallStage::Submodules => InstallStep::Submodules,
            InstallStage::Tools => InstallStep::Tools,
            InstallStage::Python => InstallStep::Python,
            InstallStage::Configure => InstallStep::Configure,
            InstallStage::Complete => InstallStep::Complete,
            InstallStage::Error | InstallStage::Unknown => return None,
        };

        if candidate == self.current {
            return None;
        }
        self.current = candidate;
        Some(candidate)
    }
}

impl Default for StepTracker {
    fn default() -> Self {
        Self::new()
    }
}
