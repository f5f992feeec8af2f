// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{LocationProvider, PersistenceSink, StoreError};
use crate::geo::GeoCoordinate;
use crate::locations::{update_distances, StudyLocation, Student};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

/// HTTP JSON data source:
///
/// - `GET  {base}/locations`
/// - `GET  {base}/students/current`
/// - `GET  {base}/user-location`
/// - `PUT  {base}/user-location`
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base: Url,
    client: Client,
    timeout: Duration,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self, StoreError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(StoreError::Http)?;

        Ok(Self {
            base,
            client,
            timeout,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
        Ok(self.base.join(path)?)
    }

    fn map_err(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Http(e)
        }
    }

    /// GETs `path`, treating 404 as "nothing there".
    fn get_optional<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, StoreError> {
        let url = self.endpoint(path)?;
        debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(|e| self.map_err(e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(|e| self.map_err(e))?;
        response.json().map(Some).map_err(|e| self.map_err(e))
    }
}

impl LocationProvider for RemoteStore {
    fn load_locations(&self, user: GeoCoordinate) -> Result<Vec<StudyLocation>, StoreError> {
        let mut locations: Vec<StudyLocation> =
            self.get_optional("locations")?.unwrap_or_default();
        update_distances(&mut locations, user);
        info!("Fetched {} study locations from {}", locations.len(), self.base);
        Ok(locations)
    }

    fn load_user_coordinate(&self) -> Result<Option<GeoCoordinate>, StoreError> {
        self.get_optional("user-location")
    }

    fn load_current_student(&self) -> Result<Option<Student>, StoreError> {
        self.get_optional("students/current")
    }
}

impl PersistenceSink for RemoteStore {
    fn save_user_coordinate(&self, coord: GeoCoordinate) -> Result<(), StoreError> {
        let url = self.endpoint("user-location")?;
        debug!("PUT {} {}", url, coord);
        self.client
            .put(url)
            .json(&coord)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.map_err(e))?;
        Ok(())
    }
}
