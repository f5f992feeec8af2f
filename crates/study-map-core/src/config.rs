// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::GeoCoordinate;
use crate::locations::DEFAULT_USER_LOCATION;
use crate::store::{JsonStore, LocationStore, RemoteStore, StoreError};
use crate::tiles::{UrlTemplateTileSource, DEFAULT_TILE_URL};
use crate::viewport::DEFAULT_ZOOM;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// JSON files on disk. Defaults to `<config root>/data`.
    Local {
        #[serde(default)]
        data_dir: Option<PathBuf>,
    },
    Remote { base_url: String },
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Local { data_dir: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_source: DataSource,
    pub tile_url_template: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub default_user_location: GeoCoordinate,
    pub initial_zoom: u8,
    pub tile_cache_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_source: DataSource::default(),
            tile_url_template: DEFAULT_TILE_URL.to_string(),
            user_agent: format!("StudyMap/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 5,
            default_user_location: DEFAULT_USER_LOCATION,
            initial_zoom: DEFAULT_ZOOM,
            tile_cache_capacity: 300,
        }
    }
}

impl AppConfig {
    /// Loads `<config root>/config.json`, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&crate::get_config_root().join(CONFIG_FILE))
    }

    /// Missing files give defaults silently; unreadable ones are logged.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .context("Failed to read config.json")
            .and_then(|c| serde_json::from_str(&c).context("Failed to parse config.json"))
        {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default configuration: path={} error={:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&crate::get_config_root().join(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn tile_source(&self) -> UrlTemplateTileSource {
        UrlTemplateTileSource::new(self.tile_url_template.clone())
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.data_source {
            DataSource::Local {
                data_dir: Some(dir),
            } => dir.clone(),
            _ => crate::get_config_root().join("data"),
        }
    }

    /// Builds the configured store. Remote stores own a blocking HTTP client,
    /// so call this from a thread where blocking is allowed.
    pub fn open_store(&self) -> Result<Box<dyn LocationStore>, StoreError> {
        match &self.data_source {
            DataSource::Local { .. } => Ok(Box::new(JsonStore::new(self.data_dir()))),
            DataSource::Remote { base_url } => Ok(Box::new(RemoteStore::new(
                base_url,
                self.request_timeout(),
                &self.user_agent,
            )?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"data_source":{"kind":"remote","base_url":"http://campus.example/api"},"initial_zoom":5}"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.initial_zoom, 5);
        assert_eq!(
            config.data_source,
            DataSource::Remote {
                base_url: "http://campus.example/api".to_string()
            }
        );
        assert_eq!(config.tile_url_template, DEFAULT_TILE_URL);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "initial_zoom = 5").unwrap();
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            data_source: DataSource::Local {
                data_dir: Some(dir.path().join("db")),
            },
            request_timeout_secs: 3,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path), config);
        assert_eq!(config.data_dir(), dir.path().join("db"));
    }
}
