// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// Address of one tile in the pyramid. `z` is the detail level, not the
/// application zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoords {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

/// Produces download URLs for tiles. Only the renderer talks to this.
pub trait TileSource: Send + Sync {
    fn tile_url(&self, detail_level: u32, x: u32, y: u32) -> String;

    fn url_for(&self, coords: TileCoords) -> String {
        self.tile_url(coords.z, coords.x, coords.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplateTileSource {
    pub template: String,
}

impl UrlTemplateTileSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl Default for UrlTemplateTileSource {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_URL)
    }
}

impl TileSource for UrlTemplateTileSource {
    fn tile_url(&self, detail_level: u32, x: u32, y: u32) -> String {
        self.template
            .replace("{z}", &detail_level.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osm_template() {
        let source = UrlTemplateTileSource::default();
        assert_eq!(
            source.tile_url(9, 272, 307),
            "https://tile.openstreetmap.org/9/272/307.png"
        );
    }

    #[test]
    fn test_url_for_uses_detail_level() {
        let source = UrlTemplateTileSource::new("http://tiles.local/{z}-{x}-{y}");
        let coords = TileCoords { x: 1, y: 2, z: 3 };
        assert_eq!(source.url_for(coords), "http://tiles.local/3-1-2");
    }
}
