use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use eim_errors::{ConfigError, Error, Result};

/// File name of the install registry maintained by the installer engine.
pub const IDF_CONFIG_FILE_NAME: &str = "eim_idf.json";

/// One installed ESP-IDF version as recorded by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdfInstallation {
    #[serde(rename = "activationScript")]
    pub activation_script: String,
    pub id: String,
    #[serde(rename = "idfToolsPath")]
    pub idf_tools_path: String,
    pub name: String,
    pub path: String,
    pub python: String,
}

/// The install registry (`eim_idf.json`), read-only for this core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdfConfig {
    #[serde(rename = "gitPath")]
    pub git_path: String,
    #[serde(rename = "idfInstalled")]
    pub idf_installed: Vec<IdfInstallation>,
    #[serde(rename = "idfSelectedId")]
    pub idf_selected_id: String,
    #[serde(rename = "eimPath", default)]
    pub eim_path: Option<String>,
    #[serde(rename = "version", default)]
    pub version: Option<String>,
}

impl IdfConfig {
    /// Parse registry content without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` when the JSON does not match the
    /// registry structure.
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| {
            Error::Config(ConfigError::Parse {
                message: err.to_string(),
            })
        })
    }

    /// Load and parse the registry file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::RegistryNotFound` when the file is missing and
    /// `ConfigError::Parse` when its content is malformed.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                Error::Config(ConfigError::RegistryNotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&err, path)
            }
        })?;
        debug!(path = %path.display(), "loaded install registry");
        Self::parse(&content)
    }

    /// Names of every installed version, registry order.
    #[must_use]
    pub fn installed_versions(&self) -> Vec<String> {
        self.idf_installed
            .iter()
            .map(|install| install.name.clone())
            .collect()
    }

    /// The installation matching an id or display name.
    #[must_use]
    pub fn get(&self, id_or_name: &str) -> Option<&IdfInstallation> {
        self.idf_installed
            .iter()
            .find(|install| install.id == id_or_name || install.name == id_or_name)
    }

    /// The installation the user currently has selected.
    #[must_use]
    pub fn selected(&self) -> Option<&IdfInstallation> {
        self.get(&self.idf_selected_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "gitPath": "/usr/bin/git",
        "idfSelectedId": "esp-idf-v5.4.1",
        "eimPath": "/opt/eim/eim",
        "version": "1.0",
        "idfInstalled": [
            {
                "activationScript": "/home/user/.espressif/activate_idf_v5.4.1.sh",
                "id": "esp-idf-v5.4.1",
                "idfToolsPath": "/home/user/.espressif/tools",
                "name": "v5.4.1",
                "path": "/home/user/.espressif/v5.4.1/esp-idf",
                "python": "/home/user/.espressif/python/bin/python3"
            },
            {
                "activationScript": "/home/user/.espressif/activate_idf_v5.3.sh",
                "id": "esp-idf-v5.3",
                "idfToolsPath": "/home/user/.espressif/tools",
                "name": "v5.3",
                "path": "/home/user/.espressif/v5.3/esp-idf",
                "python": "/home/user/.espressif/python/bin/python3"
            }
        ]
    }"#;

    #[test]
    fn parses_registry_with_camel_case_fields() {
        let config = IdfConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.git_path, "/usr/bin/git");
        assert_eq!(config.installed_versions(), vec!["v5.4.1", "v5.3"]);
        assert_eq!(config.selected().unwrap().name, "v5.4.1");
    }

    #[test]
    fn lookup_by_id_or_name() {
        let config = IdfConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.get("esp-idf-v5.3").unwrap().name, "v5.3");
        assert_eq!(config.get("v5.3").unwrap().id, "esp-idf-v5.3");
        assert!(config.get("v9.9").is_none());
    }

    #[test]
    fn malformed_registry_is_a_parse_error() {
        let err = IdfConfig::parse("{\"gitPath\": 42}").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::Parse { .. })
        ));
    }

    #[tokio::test]
    async fn missing_file_reports_registry_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(IDF_CONFIG_FILE_NAME);
        let err = IdfConfig::from_file(&missing).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::RegistryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(IDF_CONFIG_FILE_NAME);
        std::fs::write(&path, SAMPLE).unwrap();
        let config = IdfConfig::from_file(&path).await.unwrap();
        assert_eq!(config.idf_installed.len(), 2);
    }
}
