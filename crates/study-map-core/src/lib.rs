// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod config;
pub mod diagnostics;
pub mod geo;
pub mod interaction;
pub mod locations;
pub mod markers;
pub mod presenter;
pub mod projection;
pub mod session;
pub mod store;
pub mod tiles;
pub mod viewport;

pub use geo::{distance_meters, GeoCoordinate};
pub use locations::{StudyLocation, Student};
pub use session::{Effect, MapSession, Notice};

use std::env;
use std::path::PathBuf;

/// Environment variable that overrides where config, data and logs live.
pub const HOME_ENV: &str = "STUDY_MAP_HOME";

/// Root directory for config.json, the local data store and the log file.
pub fn get_config_root() -> PathBuf {
    if let Ok(home) = env::var(HOME_ENV) {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }

    directories::ProjectDirs::from("org", "study-map", "StudyMap")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".study-map"))
}
