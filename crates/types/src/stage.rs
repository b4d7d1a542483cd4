use serde::{Deserialize, Serialize};

/// Coarse-grained phase name reported by the installer backend.
///
/// The backend vocabulary is open-ended across releases; anything this core
/// does not recognize deserializes to `Unknown` and is carried through
/// without advancing the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum InstallStage {
    Checking,
    Prerequisites,
    Download,
    Extract,
    Submodules,
    Tools,
    Python,
    Configure,
    Complete,
    Error,
    Unknown,
}

impl From<String> for InstallStage {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl InstallStage {
    /// Parse a backend-reported stage string without failing on unknown input.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "checking" => Self::Checking,
            "prerequisites" => Self::Prerequisites,
            "download" => Self::Download,
            "extract" => Self::Extract,
            "submodules" => Self::Submodules,
            "tools" => Self::Tools,
            "python" => Self::Python,
            "configure" => Self::Configure,
            "complete" => Self::Complete,
            "error" => Self::Error,
            _ => Self::Unknown,
        }
    }

    /// Whether this stage ends the installation run (successfully or not).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }

    /// Stable wire name for serialization and display.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Prerequisites => "prerequisites",
            Self::Download => "download",
            Self::Extract => "extract",
            Self::Submodules => "submodules",
            Self::Tools => "tools",
            Self::Python => "python",
            Self::Configure => "configure",
            Self::Complete => "complete",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for InstallStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
