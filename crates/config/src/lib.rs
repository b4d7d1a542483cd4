#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration for the eim installation core
//!
//! Two read surfaces: user-facing [`Settings`] (install path, chosen IDF
//! versions) and the install registry `eim_idf.json` maintained by the
//! installer engine. This core only ever reads the registry; writing it is
//! the engine's job.

pub mod registry;

pub use registry::{IdfConfig, IdfInstallation, IDF_CONFIG_FILE_NAME};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// User-facing installer settings.
///
/// Mirrors the subset of the backend settings object this core consumes:
/// the target install path, where the install registry lives, and which IDF
/// versions the user selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Target installation directory.
    #[serde(default = "default_install_path")]
    pub path: PathBuf,

    /// Directory containing `eim_idf.json`.
    #[serde(default = "default_install_path")]
    pub esp_idf_json_path: PathBuf,

    /// Versions selected for installation, newest first. `None` means the
    /// backend will pick the latest released version.
    #[serde(default)]
    pub idf_versions: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: default_install_path(),
            esp_idf_json_path: default_install_path(),
            idf_versions: None,
        }
    }
}

impl Settings {
    /// Full path of the install registry file.
    #[must_use]
    pub fn registry_path(&self) -> PathBuf {
        self.esp_idf_json_path.join(IDF_CONFIG_FILE_NAME)
    }

    /// The versions to install, empty when the backend should choose.
    #[must_use]
    pub fn selected_versions(&self) -> &[String] {
        self.idf_versions.as_deref().unwrap_or_default()
    }

    /// Point the registry location somewhere explicit (tests, CLI override).
    #[must_use]
    pub fn with_registry_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.esp_idf_json_path = dir.as_ref().to_path_buf();
        self
    }
}

fn default_install_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".espressif")
}
