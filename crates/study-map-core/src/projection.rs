// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::GeoCoordinate;
use std::f64::consts::PI;

// --- Slippy Map / Mercator Math ---
pub const TILE_SIZE: f64 = 256.0;

/// Zoom values run "backwards": 1 is street level, 15 shows the whole region.
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 15;

/// Detail level of the tile pyramid when zoom is 0.
pub const TOTAL_MAP_ZOOM: u8 = 17;

/// Latitude at which Web Mercator maps to a square world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A position in pixel space. Depending on context this is either an
/// absolute map pixel at some zoom or a point relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> PixelPoint {
        PixelPoint::new(self.x + dx, self.y + dy)
    }
}

/// Bidirectional mapping between coordinates and absolute map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    pub tile_size: f64,
    pub total_map_zoom: u8,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            total_map_zoom: TOTAL_MAP_ZOOM,
        }
    }
}

impl Projector {
    pub fn detail_level(&self, zoom: u8) -> u32 {
        self.total_map_zoom.saturating_sub(zoom) as u32
    }

    /// Width (and height) of the whole world in pixels at `zoom`.
    pub fn map_size(&self, zoom: u8) -> f64 {
        self.tile_size * 2.0f64.powi(self.detail_level(zoom) as i32)
    }

    /// Number of tiles along one axis at `zoom`.
    pub fn tiles_per_axis(&self, zoom: u8) -> u32 {
        1u32 << self.detail_level(zoom)
    }

    pub fn to_pixel(&self, coord: GeoCoordinate, zoom: u8) -> PixelPoint {
        let size = self.map_size(zoom);
        let lat = coord.latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = (coord.longitude + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        PixelPoint::new(x, y)
    }

    pub fn to_coordinate(&self, point: PixelPoint, zoom: u8) -> GeoCoordinate {
        let size = self.map_size(zoom);

        let longitude = point.x / size * 360.0 - 180.0;
        let n = PI - 2.0 * PI * point.y / size;
        let latitude = n.sinh().atan().to_degrees();
        GeoCoordinate::new(latitude, longitude)
    }
}
