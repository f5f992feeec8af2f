// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::{distance_meters, GeoCoordinate};
use serde::{Deserialize, Serialize};

/// Where the map opens when no saved user location exists (CPUT, Cape Town).
pub const DEFAULT_USER_LOCATION: GeoCoordinate =
    GeoCoordinate::new(-33.93080102488844, 18.430230425585137);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyLocation {
    pub id: u32,
    pub group_name: String,
    pub location_name: String,
    pub building: String,
    #[serde(flatten)]
    pub coordinate: GeoCoordinate,
    pub member_count: u32,
    /// Metres from the user. Derived, so never read from or written to disk.
    #[serde(skip)]
    pub distance_from_user: f64,
}

impl StudyLocation {
    pub fn new(
        id: u32,
        group_name: &str,
        location_name: &str,
        building: &str,
        coordinate: GeoCoordinate,
        member_count: u32,
    ) -> Self {
        Self {
            id,
            group_name: group_name.to_string(),
            location_name: location_name.to_string(),
            building: building.to_string(),
            coordinate,
            member_count,
            distance_from_user: 0.0,
        }
    }

    pub fn update_distance(&mut self, user: GeoCoordinate) {
        self.distance_from_user = distance_meters(user, self.coordinate);
    }
}

/// Recomputes `distance_from_user` for every location.
pub fn update_distances(locations: &mut [StudyLocation], user: GeoCoordinate) {
    for location in locations.iter_mut() {
        location.update_distance(user);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub student_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub course: String,
}

impl Default for Student {
    fn default() -> Self {
        Self {
            id: 0,
            first_name: "User".to_string(),
            last_name: String::new(),
            student_number: "231234567".to_string(),
            email: "example@cput.ac.za".to_string(),
            course: "Computer Science".to_string(),
        }
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Letter shown in the avatar bubble.
    pub fn initial(&self) -> char {
        self.first_name
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

/// The groups shipped with the app, used whenever the data source is
/// unreachable.
pub fn sample_locations() -> Vec<StudyLocation> {
    vec![
        StudyLocation::new(
            1,
            "ADF2625 GROUP",
            "Library",
            "Library Building",
            GeoCoordinate::new(-33.930505201808685, 18.430816189682822),
            5,
        ),
        StudyLocation::new(
            2,
            "MAF Group",
            "Library",
            "Library Building",
            GeoCoordinate::new(-33.93009832484135, 18.430670728029888),
            4,
        ),
        StudyLocation::new(
            3,
            "PRJ152S",
            "Engineering Lab",
            "Engineering Building",
            GeoCoordinate::new(-33.930877181287876, 18.42936060636949),
            6,
        ),
        StudyLocation::new(
            4,
            "Business Practice",
            "Commerce Building",
            "Commerce Building",
            GeoCoordinate::new(-33.930204714751454, 18.42946654578125),
            4,
        ),
        StudyLocation::new(
            5,
            "Proff Com",
            "E-Learning Center",
            "E-Learning Building",
            GeoCoordinate::new(-33.92893680677932, 18.42840885211103),
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances_follow_user() {
        let mut locations = sample_locations();
        update_distances(&mut locations, DEFAULT_USER_LOCATION);
        assert!(locations.iter().all(|l| l.distance_from_user < 500.0));

        let far = GeoCoordinate::new(-26.2041, 28.0473);
        update_distances(&mut locations, far);
        assert!(locations.iter().all(|l| l.distance_from_user > 1_000_000.0));
    }

    #[test]
    fn test_location_json_shape() {
        let json = r#"{"id":7,"group_name":"G","location_name":"L","building":"B",
            "latitude":-33.9,"longitude":18.4,"member_count":2}"#;
        let loc: StudyLocation = serde_json::from_str(json).unwrap();
        assert_eq!(loc.coordinate, GeoCoordinate::new(-33.9, 18.4));
        assert_eq!(loc.distance_from_user, 0.0);

        let out = serde_json::to_value(&loc).unwrap();
        assert!(out.get("distance_from_user").is_none());
        assert_eq!(out["latitude"], -33.9);
    }

    #[test]
    fn test_student_names() {
        let s = Student::default();
        assert_eq!(s.full_name(), "User");
        assert_eq!(s.initial(), 'U');

        let s = Student {
            first_name: "thandi".to_string(),
            last_name: "Mokoena".to_string(),
            ..Student::default()
        };
        assert_eq!(s.full_name(), "thandi Mokoena");
        assert_eq!(s.initial(), 'T');
    }
}
