// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{LocationProvider, PersistenceSink, StoreError};
use crate::geo::GeoCoordinate;
use crate::locations::{sample_locations, update_distances, StudyLocation, Student};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    locations: Vec<StudyLocation>,
    user: Option<GeoCoordinate>,
    student: Option<Student>,
    fail_saves: bool,
    fail_loads: bool,
    save_count: usize,
}

/// In-process store. Backs the offline fallback and the session tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(locations: Vec<StudyLocation>, user: Option<GeoCoordinate>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                locations,
                user,
                ..Inner::default()
            }),
        }
    }

    pub fn with_sample_data() -> Self {
        Self::new(sample_locations(), None)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panic while holding the lock cannot leave Inner half-written.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_student(&self, student: Student) {
        self.lock().student = Some(student);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.lock().fail_loads = fail;
    }

    pub fn saved_coordinate(&self) -> Option<GeoCoordinate> {
        self.lock().user
    }

    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }
}

impl LocationProvider for MemoryStore {
    fn load_locations(&self, user: GeoCoordinate) -> Result<Vec<StudyLocation>, StoreError> {
        let inner = self.lock();
        if inner.fail_loads {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        let mut locations = inner.locations.clone();
        update_distances(&mut locations, user);
        Ok(locations)
    }

    fn load_user_coordinate(&self) -> Result<Option<GeoCoordinate>, StoreError> {
        let inner = self.lock();
        if inner.fail_loads {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(inner.user)
    }

    fn load_current_student(&self) -> Result<Option<Student>, StoreError> {
        Ok(self.lock().student.clone())
    }
}

impl PersistenceSink for MemoryStore {
    fn save_user_coordinate(&self, coord: GeoCoordinate) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_saves {
            return Err(StoreError::Unavailable("memory store read-only".to_string()));
        }
        inner.user = Some(coord);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_save_keeps_previous() {
        let original = GeoCoordinate::new(1.0, 2.0);
        let store = MemoryStore::new(Vec::new(), Some(original));
        store.set_fail_saves(true);

        assert!(store.save_user_coordinate(GeoCoordinate::new(3.0, 4.0)).is_err());
        assert_eq!(store.saved_coordinate(), Some(original));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_loads_compute_distances() {
        let store = MemoryStore::with_sample_data();
        let locations = store
            .load_locations(crate::locations::DEFAULT_USER_LOCATION)
            .unwrap();
        assert!(locations.iter().all(|l| l.distance_from_user > 0.0));
    }
}
