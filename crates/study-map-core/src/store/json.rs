// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{LocationProvider, PersistenceSink, StoreError};
use crate::geo::GeoCoordinate;
use crate::locations::{sample_locations, update_distances, StudyLocation, Student};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOCATIONS_FILE: &str = "locations.json";
const STUDENTS_FILE: &str = "students.json";
const USER_LOCATION_FILE: &str = "user_location.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedUserLocation {
    #[serde(flatten)]
    pub coordinate: GeoCoordinate,
    pub updated_at: DateTime<Utc>,
}

/// File-backed store: one JSON document per table under `data_dir`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn write_json<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        let content = serde_json::to_string_pretty(value)?;
        // Readers must never see a truncated document.
        let path = self.path(file);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Writes the bundled sample groups if no locations file exists yet.
    pub fn ensure_seeded(&self) -> Result<bool, StoreError> {
        if self.path(LOCATIONS_FILE).exists() {
            return Ok(false);
        }
        info!(
            "Seeding sample study locations: data_dir={}",
            self.data_dir.display()
        );
        self.write_json(LOCATIONS_FILE, &sample_locations())?;
        Ok(true)
    }

    pub fn save_locations(&self, locations: &[StudyLocation]) -> Result<(), StoreError> {
        self.write_json(LOCATIONS_FILE, locations)
    }

    pub fn save_students(&self, students: &[Student]) -> Result<(), StoreError> {
        self.write_json(STUDENTS_FILE, students)
    }

    pub fn load_students(&self) -> Result<Vec<Student>, StoreError> {
        let path = self.path(STUDENTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_saved_user_location(&self) -> Result<Option<SavedUserLocation>, StoreError> {
        let path = self.path(USER_LOCATION_FILE);
        if !path.exists() {
            debug!("No saved user location at {}", path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl LocationProvider for JsonStore {
    fn load_locations(&self, user: GeoCoordinate) -> Result<Vec<StudyLocation>, StoreError> {
        self.ensure_seeded()?;
        let content = fs::read_to_string(self.path(LOCATIONS_FILE))?;
        let mut locations: Vec<StudyLocation> = serde_json::from_str(&content)?;
        locations.sort_by(|a, b| a.group_name.cmp(&b.group_name));
        update_distances(&mut locations, user);

        info!("Loaded {} study locations", locations.len());
        Ok(locations)
    }

    fn load_user_coordinate(&self) -> Result<Option<GeoCoordinate>, StoreError> {
        Ok(self.load_saved_user_location()?.map(|s| s.coordinate))
    }

    fn load_current_student(&self) -> Result<Option<Student>, StoreError> {
        Ok(self.load_students()?.into_iter().min_by_key(|s| s.id))
    }
}

impl PersistenceSink for JsonStore {
    fn save_user_coordinate(&self, coord: GeoCoordinate) -> Result<(), StoreError> {
        let saved = SavedUserLocation {
            coordinate: coord,
            updated_at: Utc::now(),
        };
        self.write_json(USER_LOCATION_FILE, &saved)?;
        info!("Saved user location: {}", coord);
        Ok(())
    }
}
