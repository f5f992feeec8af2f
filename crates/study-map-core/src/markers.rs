// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::GeoCoordinate;
use crate::locations::StudyLocation;
use crate::projection::PixelPoint;
use crate::viewport::Viewport;

pub const USER_MARKER_LABEL: &str = "Your Location";

/// Screen radius around a marker that still counts as clicking it.
pub const HIT_TOLERANCE_PX: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerRole {
    UserLocation,
    StudyLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub position: GeoCoordinate,
    pub role: MarkerRole,
    pub location: Option<StudyLocation>,
}

impl Marker {
    pub fn user(position: GeoCoordinate) -> Self {
        Self {
            label: USER_MARKER_LABEL.to_string(),
            position,
            role: MarkerRole::UserLocation,
            location: None,
        }
    }

    pub fn study(location: &StudyLocation) -> Self {
        Self {
            label: location.group_name.clone(),
            position: location.coordinate,
            role: MarkerRole::StudyLocation,
            location: Some(location.clone()),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == MarkerRole::UserLocation
    }
}

/// The markers currently drawn on the map.
///
/// Callers must treat this as an unordered collection: it is never patched,
/// only replaced by [`MarkerSet::rebuild`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn rebuild(user: GeoCoordinate, locations: &[StudyLocation]) -> Self {
        let mut markers = Vec::with_capacity(locations.len() + 1);
        markers.push(Marker::user(user));
        markers.extend(locations.iter().map(Marker::study));
        Self { markers }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn user_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.is_user())
    }

    /// First study marker whose projected position lies strictly within
    /// `tolerance_px` of `point` (viewport-relative). The user marker is never
    /// returned.
    pub fn hit_test(
        &self,
        point: PixelPoint,
        viewport: &Viewport,
        tolerance_px: f64,
    ) -> Option<&Marker> {
        self.markers
            .iter()
            .filter(|m| m.role == MarkerRole::StudyLocation)
            .find(|m| viewport.coordinate_to_point(m.position).distance(point) < tolerance_px)
    }
}
