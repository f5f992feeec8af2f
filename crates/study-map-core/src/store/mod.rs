// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod json;
pub mod memory;
pub mod remote;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use remote::RemoteStore;

use crate::geo::GeoCoordinate;
use crate::locations::{StudyLocation, Student};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

/// Read side of the data source.
pub trait LocationProvider: Send + Sync {
    /// All study locations, with `distance_from_user` computed against `user`.
    fn load_locations(&self, user: GeoCoordinate) -> Result<Vec<StudyLocation>, StoreError>;

    /// The last saved user position. `None` means nothing was ever saved.
    fn load_user_coordinate(&self) -> Result<Option<GeoCoordinate>, StoreError>;

    fn load_current_student(&self) -> Result<Option<Student>, StoreError>;
}

/// Write side of the data source.
pub trait PersistenceSink: Send + Sync {
    fn save_user_coordinate(&self, coord: GeoCoordinate) -> Result<(), StoreError>;
}

/// Anything that can both load and save.
pub trait LocationStore: LocationProvider + PersistenceSink {}

impl<T: LocationProvider + PersistenceSink> LocationStore for T {}
