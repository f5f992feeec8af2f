// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::geo::format_distance;
use crate::locations::StudyLocation;
use serde::{Deserialize, Serialize};

pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Distance,
    Name,
    Members,
    Within100m,
    Within500m,
    Within1km,
}

impl SortMode {
    pub const ALL: [SortMode; 6] = [
        SortMode::Distance,
        SortMode::Name,
        SortMode::Members,
        SortMode::Within100m,
        SortMode::Within500m,
        SortMode::Within1km,
    ];

    /// Radius filter in metres, if this mode filters at all.
    pub fn radius(&self) -> Option<f64> {
        match self {
            SortMode::Within100m => Some(100.0),
            SortMode::Within500m => Some(500.0),
            SortMode::Within1km => Some(1000.0),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SortMode::Distance => "SORT BY DISTANCE",
            SortMode::Name => "SORT BY NAME",
            SortMode::Members => "SORT BY MEMBERS",
            SortMode::Within100m => "WITHIN 100 M",
            SortMode::Within500m => "WITHIN 500 M",
            SortMode::Within1km => "WITHIN 1 KM",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "distance" => Ok(SortMode::Distance),
            "name" => Ok(SortMode::Name),
            "members" => Ok(SortMode::Members),
            "within_100m" | "100m" => Ok(SortMode::Within100m),
            "within_500m" | "500m" => Ok(SortMode::Within500m),
            "within_1km" | "1km" => Ok(SortMode::Within1km),
            other => Err(format!("unknown sort mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

/// Locations to show for `mode`. Distances must already be current.
pub fn filtered_and_sorted(locations: &[StudyLocation], mode: SortMode) -> Vec<StudyLocation> {
    let mut out: Vec<StudyLocation> = match mode.radius() {
        Some(limit) => locations
            .iter()
            .filter(|l| l.distance_from_user <= limit)
            .cloned()
            .collect(),
        None => locations.to_vec(),
    };

    match mode {
        SortMode::Name => out.sort_by(|a, b| {
            a.group_name
                .to_lowercase()
                .cmp(&b.group_name.to_lowercase())
        }),
        SortMode::Members => out.sort_by(|a, b| b.member_count.cmp(&a.member_count)),
        _ => out.sort_by(|a, b| a.distance_from_user.total_cmp(&b.distance_from_user)),
    }
    out
}

/// Splits locations into rows of [`GRID_COLUMNS`] cards.
pub fn grid_rows(locations: &[StudyLocation]) -> Vec<&[StudyLocation]> {
    locations.chunks(GRID_COLUMNS).collect()
}

pub fn summary_line(location: &StudyLocation) -> String {
    format!(
        "{} - {}",
        format_distance(location.distance_from_user),
        location.building
    )
}

pub fn members_line(location: &StudyLocation) -> String {
    format!("{} MEMBERS", location.member_count)
}

/// Multi-line description shown when a group marker is clicked.
pub fn info_text(location: &StudyLocation) -> String {
    format!(
        "Group: {}\nLocation: {}\nBuilding: {}\nMembers: {}\nDistance: {}",
        location.group_name,
        location.location_name,
        location.building,
        location.member_count,
        format_distance(location.distance_from_user)
    )
}
