//! Host-supplied settings for the resolution roots, import map and builds.

use crate::error::Result;
use crate::logging::LogSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_APPLICATION_NAME: &str = "app";

/// A gem/engine root, registered after the application in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRoot {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub application_root: PathBuf,
    pub application_name: String,
    /// Defaults to `<application_root>/node_modules`.
    pub package_store: Option<PathBuf>,
    pub engines: Vec<EngineRoot>,
    pub environment: String,
    /// Path to the import-map JSON document, relative to the application root.
    pub import_map: Option<PathBuf>,
    /// Environment variables captured into every build fingerprint.
    pub forwarded_env: Vec<String>,
    /// Explicit values forwarded to builds, overriding captured ones.
    pub env: BTreeMap<String, String>,
    pub watch_debounce_ms: u64,
    pub log: LogSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            application_root: PathBuf::from("."),
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            package_store: None,
            engines: Vec::new(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            import_map: None,
            forwarded_env: Vec::new(),
            env: BTreeMap::new(),
            watch_debounce_ms: 500,
            log: LogSettings::default(),
        }
    }
}

impl Config {
    pub fn new(application_root: impl Into<PathBuf>) -> Self {
        Self {
            application_root: application_root.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_engine(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.engines.push(EngineRoot {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn package_store_dir(&self) -> PathBuf {
        self.package_store
            .clone()
            .unwrap_or_else(|| self.application_root.join("node_modules"))
    }

    pub fn import_map_path(&self) -> Option<PathBuf> {
        self.import_map
            .as_ref()
            .map(|path| self.application_root.join(path))
    }

    pub fn watch_debounce(&self) -> Duration {
        Duration::from_millis(self.watch_debounce_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = Config::from_json_str(r#"{ "application_root": "/srv/app" }"#).unwrap();
        assert_eq!(config.application_name, "app");
        assert_eq!(config.environment, "development");
        assert_eq!(config.package_store_dir(), PathBuf::from("/srv/app/node_modules"));
        assert_eq!(config.watch_debounce(), Duration::from_millis(500));
        assert!(config.import_map_path().is_none());
        assert!(!config.log.enabled);
    }

    #[test]
    fn test_log_section() {
        let config = Config::from_json_str(
            r#"{
                "application_root": "/srv/app",
                "log": { "enabled": true, "dir": "/var/log/app", "filter": "proscenium_core=debug" }
            }"#,
        )
        .unwrap();
        assert!(config.log.enabled);
        assert_eq!(config.log.component, "proscenium");
        assert_eq!(config.log.log_dir(), PathBuf::from("/var/log/app"));
        assert_eq!(config.log.filter.as_deref(), Some("proscenium_core=debug"));
    }

    #[test]
    fn test_engines_keep_declaration_order() {
        let config = Config::from_json_str(
            r#"{
                "application_root": "/srv/app",
                "engines": [
                    { "name": "ui", "path": "/gems/ui" },
                    { "name": "admin", "path": "/gems/admin" }
                ],
                "import_map": "config/import_map.json"
            }"#,
        )
        .unwrap();
        let names: Vec<_> = config.engines.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ui", "admin"]);
        assert_eq!(
            config.import_map_path(),
            Some(PathBuf::from("/srv/app/config/import_map.json"))
        );
    }
}
