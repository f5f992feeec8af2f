// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use study_map_core::geo::GeoCoordinate;
use study_map_core::locations::StudyLocation;
use study_map_core::markers::{MarkerRole, MarkerSet, HIT_TOLERANCE_PX};
use study_map_core::projection::PixelPoint;
use study_map_core::viewport::Viewport;

fn single_marker() -> (MarkerSet, Viewport, PixelPoint) {
    let spot = GeoCoordinate::new(-33.9249, 18.4241);
    let location = StudyLocation::new(42, "Night Owls", "Library", "Library Building", spot, 8);
    // User far away so the user marker never sits near the probe points.
    let user = GeoCoordinate::new(-26.2041, 28.0473);
    let markers = MarkerSet::rebuild(user, &[location]);
    let vp = Viewport::new(spot, 5, 800.0, 600.0);
    let p = vp.coordinate_to_point(spot);
    (markers, vp, p)
}

#[test]
fn test_hit_at_projected_point() {
    let (markers, vp, p) = single_marker();
    let hit = markers.hit_test(p, &vp, HIT_TOLERANCE_PX).expect("marker under cursor");
    assert_eq!(hit.role, MarkerRole::StudyLocation);
    assert_eq!(hit.location.as_ref().map(|l| l.id), Some(42));
}

#[test]
fn test_hit_within_19px() {
    let (markers, vp, p) = single_marker();
    for (dx, dy) in [(19.0, 0.0), (-19.0, 0.0), (0.0, 19.0), (0.0, -19.0)] {
        assert!(
            markers.hit_test(p.offset(dx, dy), &vp, HIT_TOLERANCE_PX).is_some(),
            "expected a hit at offset ({}, {})",
            dx,
            dy
        );
    }
}

#[test]
fn test_miss_beyond_21px() {
    let (markers, vp, p) = single_marker();
    for (dx, dy) in [(21.0, 0.0), (-21.0, 0.0), (0.0, 21.0), (0.0, -21.0)] {
        assert!(
            markers.hit_test(p.offset(dx, dy), &vp, HIT_TOLERANCE_PX).is_none(),
            "unexpected hit at offset ({}, {})",
            dx,
            dy
        );
    }
}

#[test]
fn test_rebuild_replaces_by_value() {
    let spot = GeoCoordinate::new(-33.9249, 18.4241);
    let location = StudyLocation::new(1, "A", "Lab", "B", spot, 3);

    let first = MarkerSet::rebuild(spot, &[location.clone()]);
    let second = MarkerSet::rebuild(spot, &[location]);
    assert_eq!(first, second);

    let moved = MarkerSet::rebuild(GeoCoordinate::new(0.0, 0.0), &[]);
    assert_eq!(moved.len(), 1);
    assert_eq!(moved.user_marker().unwrap().position, GeoCoordinate::new(0.0, 0.0));
}

#[test]
fn test_rebuild_counts_for_many_locations() {
    let user = GeoCoordinate::new(0.0, 0.0);
    for n in [0usize, 1, 7, 50] {
        let locations: Vec<StudyLocation> = (0..n)
            .map(|i| {
                StudyLocation::new(
                    i as u32,
                    &format!("Group {}", i),
                    "Room",
                    "Block",
                    GeoCoordinate::new(i as f64 * 0.01, 0.0),
                    2,
                )
            })
            .collect();
        let set = MarkerSet::rebuild(user, &locations);
        assert_eq!(set.len(), n + 1);
        assert_eq!(set.iter().filter(|m| m.role == MarkerRole::UserLocation).count(), 1);
    }
}
