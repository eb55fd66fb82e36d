//! `gridsync.toml` settings.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use gridsync_core::{DEFAULT_DATA_URL, SyncOptions};
use gridsync_model::ColumnSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// File read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gridsync.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Row feed: an http(s) URL or a local JSON file.
    pub data_url: String,
    pub sync: SyncOptions,
    /// Declared grid columns, in display order.
    pub columns: ColumnSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            sync: SyncOptions::default(),
            columns: ColumnSet::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("parse settings")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serialize settings")
    }
}

/// Load settings.
///
/// An explicit path must exist. Without one, a missing `gridsync.toml` in the
/// working directory yields the defaults.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(path) {
        Ok(content) => {
            let settings = Settings::from_toml(&content)
                .with_context(|| format!("invalid settings file {}", path.display()))?;
            info!(path = %path.display(), "loaded settings");
            Ok(settings)
        }
        Err(error) if !explicit && error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no settings file, using defaults");
            Ok(Settings::default())
        }
        Err(error) => {
            Err(error).with_context(|| format!("read settings file {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn parses_columns_and_sync_section() {
        let settings = Settings::from_toml(
            r#"
data_url = "rows.json"

[sync]
persist_sort = true

[[columns]]
id = "athlete"
filter = true

[[columns]]
id = "age"
sortable = false
"#,
        )
        .unwrap();
        assert_eq!(settings.data_url, "rows.json");
        assert!(settings.sync.persist_sort);
        assert!(!settings.sync.restore_sort);
        assert_eq!(settings.columns.len(), 2);
        assert!(settings.columns.get("athlete").unwrap().filter);
        assert!(!settings.columns.get("age").unwrap().sortable);
    }

    #[test]
    fn duplicate_columns_are_rejected() {
        let result = Settings::from_toml(
            r#"
[[columns]]
id = "make"
[[columns]]
id = "make"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn defaults_survive_toml_round_trip() {
        let text = Settings::default().to_toml().unwrap();
        assert_eq!(Settings::from_toml(&text).unwrap(), Settings::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_settings(Some(Path::new("/nonexistent/gridsync.toml"))).is_err());
    }
}
