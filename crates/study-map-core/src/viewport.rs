// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::GeoCoordinate;
use crate::projection::{PixelPoint, Projector, MAX_ZOOM, MIN_ZOOM};
use crate::tiles::TileCoords;

pub const DEFAULT_ZOOM: u8 = 8;

/// A tile that intersects the viewport, with its top-left corner in
/// viewport-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleTile {
    pub coords: TileCoords,
    pub screen: PixelPoint,
    pub size: f64,
}

/// The visible map window. All mutation goes through the methods below so
/// that center and zoom can never drift out of their valid ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    center: GeoCoordinate,
    zoom: u8,
    width: f64,
    height: f64,
    projector: Projector,
}

impl Viewport {
    pub fn new(center: GeoCoordinate, zoom: u8, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
            projector: Projector::default(),
        }
    }

    pub fn center(&self) -> GeoCoordinate {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    pub fn set_center(&mut self, coord: GeoCoordinate) {
        self.center = coord;
    }

    /// Applies `zoom` if it lies in [MIN_ZOOM, MAX_ZOOM], otherwise leaves
    /// the viewport untouched. Returns the (unchanged) center either way.
    pub fn set_zoom(&mut self, zoom: u8) -> GeoCoordinate {
        if (MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            self.zoom = zoom;
        }
        self.center
    }

    /// One step closer to the ground. Lower zoom means more detail.
    pub fn zoom_in(&mut self) {
        if self.zoom > MIN_ZOOM {
            self.zoom -= 1;
        }
    }

    pub fn zoom_out(&mut self) {
        if self.zoom < MAX_ZOOM {
            self.zoom += 1;
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Moves the map by a screen delta, the way a dragged canvas moves:
    /// dragging right reveals what lies to the west.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let size = self.projector.map_size(self.zoom);
        let center = self.projector.to_pixel(self.center, self.zoom);

        let x = (center.x - dx).rem_euclid(size);
        let y = (center.y - dy).clamp(0.0, size);

        self.center = self.projector.to_coordinate(PixelPoint::new(x, y), self.zoom);
    }

    /// Absolute map pixel shown at the top-left corner of the viewport.
    pub fn top_left(&self) -> PixelPoint {
        let center = self.projector.to_pixel(self.center, self.zoom);
        center.offset(-self.width / 2.0, -self.height / 2.0)
    }

    pub fn point_to_coordinate(&self, point: PixelPoint) -> GeoCoordinate {
        let origin = self.top_left();
        self.projector
            .to_coordinate(origin.offset(point.x, point.y), self.zoom)
    }

    pub fn coordinate_to_point(&self, coord: GeoCoordinate) -> PixelPoint {
        let origin = self.top_left();
        let px = self.projector.to_pixel(coord, self.zoom);
        PixelPoint::new(px.x - origin.x, px.y - origin.y)
    }

    /// Tiles needed to cover the viewport at the current detail level.
    /// Rows above or below the world are skipped. Columns wrap across the
    /// antimeridian, at most one copy of the world wide.
    pub fn visible_tiles(&self) -> Vec<VisibleTile> {
        let tile_size = self.projector.tile_size;
        let per_axis = self.projector.tiles_per_axis(self.zoom) as i64;
        let z = self.projector.detail_level(self.zoom);
        let origin = self.top_left();

        let min_tx = (origin.x / tile_size).floor() as i64;
        let max_tx = ((origin.x + self.width) / tile_size).floor() as i64;
        let min_ty = (origin.y / tile_size).floor() as i64;
        let max_ty = ((origin.y + self.height) / tile_size).floor() as i64;

        let mut tiles = Vec::new();
        for ty in min_ty.max(0)..=max_ty.min(per_axis - 1) {
            for tx in min_tx..=max_tx.min(min_tx + per_axis - 1) {
                tiles.push(VisibleTile {
                    coords: TileCoords {
                        x: tx.rem_euclid(per_axis) as u32,
                        y: ty as u32,
                        z,
                    },
                    screen: PixelPoint::new(
                        tx as f64 * tile_size - origin.x,
                        ty as f64 * tile_size - origin.y,
                    ),
                    size: tile_size,
                });
            }
        }
        tiles
    }
}
