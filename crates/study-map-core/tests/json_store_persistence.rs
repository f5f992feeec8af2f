// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use study_map_core::geo::GeoCoordinate;
use study_map_core::interaction::PointerEvent;
use study_map_core::locations::DEFAULT_USER_LOCATION;
use study_map_core::projection::PixelPoint;
use study_map_core::store::{JsonStore, LocationProvider, PersistenceSink};
use study_map_core::MapSession;
use tempfile::tempdir;

fn assert_close(a: GeoCoordinate, b: GeoCoordinate) {
    assert!(
        (a.latitude - b.latitude).abs() < 1e-12 && (a.longitude - b.longitude).abs() < 1e-12,
        "{} != {}",
        a,
        b
    );
}

#[test]
fn test_saved_location_survives_restart() {
    let dir = tempdir().unwrap();
    let picked = {
        let store = JsonStore::new(dir.path());
        let (mut session, _) =
            MapSession::load_blocking(&store, DEFAULT_USER_LOCATION, 8, 800.0, 600.0);
        assert_eq!(session.user_coordinate(), DEFAULT_USER_LOCATION);

        session.handle(PointerEvent::EnterLocationSelect);
        session.handle(PointerEvent::SingleClick(PixelPoint::new(300.0, 200.0)));
        let effects = session.handle(PointerEvent::Confirm);
        session.apply_blocking(effects, &store);
        session.user_coordinate()
    };

    // Fresh store over the same directory, as after an app restart.
    let store = JsonStore::new(dir.path());
    let (session, notices) =
        MapSession::load_blocking(&store, DEFAULT_USER_LOCATION, 8, 800.0, 600.0);
    assert!(notices.is_empty());
    assert_close(session.user_coordinate(), picked);

    let saved = store.load_saved_user_location().unwrap().unwrap();
    assert_close(saved.coordinate, picked);
}

#[test]
fn test_overwrite_keeps_latest_location() {
    let dir = tempdir().unwrap();
    let store = JsonStore::new(dir.path());

    store
        .save_user_coordinate(GeoCoordinate::new(-33.9, 18.4))
        .unwrap();
    let first = store.load_saved_user_location().unwrap().unwrap();

    let latest = GeoCoordinate::new(-34.0, 18.5);
    store.save_user_coordinate(latest).unwrap();
    let second = store.load_saved_user_location().unwrap().unwrap();

    assert_close(store.load_user_coordinate().unwrap().unwrap(), latest);
    assert!(second.updated_at >= first.updated_at);
}

#[test]
fn test_edited_locations_file_is_picked_up() {
    let dir = tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    let mut locations = store.load_locations(DEFAULT_USER_LOCATION).unwrap();
    locations.truncate(2);
    locations[0].member_count = 40;
    store.save_locations(&locations).unwrap();

    let reloaded = store.load_locations(DEFAULT_USER_LOCATION).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.iter().any(|l| l.member_count == 40));
}
