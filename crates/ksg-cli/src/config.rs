//! Application configuration loaded from TOML

use anyhow::Context;
use ksg_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default tracing filter when neither the file nor `RUST_LOG` sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
    /// Record store settings
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            store: StoreConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("reading config {}", path.display()))
            }
        };
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse configuration text
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_store_section_keeps_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            log_filter = "debug"
            [store]
            path = "/data/survey.csv"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.store.path, PathBuf::from("/data/survey.csv"));
        assert_eq!(cfg.store.tail_rows, 5);
        assert_eq!(cfg.store.export_file_name, "ksheersagar_survey_responses.csv");
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn bad_type_is_reported() {
        assert!(AppConfig::from_toml("[store]\ntail_rows = \"five\"").is_err());
    }
}
