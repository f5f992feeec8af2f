// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use study_map_core::geo::GeoCoordinate;
use study_map_core::interaction::{InteractionState, PointerEvent};
use study_map_core::locations::{sample_locations, DEFAULT_USER_LOCATION};
use study_map_core::markers::MarkerRole;
use study_map_core::projection::PixelPoint;
use study_map_core::store::{LocationProvider, MemoryStore};
use study_map_core::{Effect, MapSession, Notice};

const P1: PixelPoint = PixelPoint { x: 120.0, y: 80.0 };
const P2: PixelPoint = PixelPoint { x: 640.0, y: 410.0 };

fn loaded_session(store: &MemoryStore) -> MapSession {
    let (session, notices) =
        MapSession::load_blocking(store, DEFAULT_USER_LOCATION, 8, 800.0, 600.0);
    assert!(notices.is_empty(), "unexpected notices: {:?}", notices);
    session
}

fn notices(effects: &[Effect]) -> Vec<&Notice> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Notice(n) => Some(n),
            _ => None,
        })
        .collect()
}

#[test]
fn test_cancel_restores_original_location() {
    let saved = GeoCoordinate::new(-33.9311, 18.4173);
    let store = MemoryStore::new(sample_locations(), Some(saved));
    let mut session = loaded_session(&store);
    assert_eq!(session.user_coordinate(), saved);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P1));
    session.handle(PointerEvent::SingleClick(P2));
    assert!(session.pending_coordinate().is_some());

    let effects = session.handle(PointerEvent::Cancel);
    assert!(effects.contains(&Effect::ReloadUserCoordinate));
    let remaining = session.apply_blocking(effects, &store);

    assert_eq!(session.user_coordinate(), saved);
    assert_eq!(session.markers().user_marker().unwrap().position, saved);
    assert_eq!(session.interaction_state(), InteractionState::Idle);
    assert_eq!(store.save_count(), 0);
    assert!(notices(&remaining).iter().all(|n| !n.is_error()));
}

#[test]
fn test_cancel_without_saved_location_uses_default() {
    let store = MemoryStore::with_sample_data();
    let mut session = loaded_session(&store);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P1));
    let effects = session.handle(PointerEvent::Cancel);
    session.apply_blocking(effects, &store);

    assert_eq!(session.user_coordinate(), DEFAULT_USER_LOCATION);
}

#[test]
fn test_confirm_saves_last_clicked_point() {
    let store = MemoryStore::with_sample_data();
    let mut session = loaded_session(&store);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P1));
    let expected = session.viewport().point_to_coordinate(P1);

    let effects = session.handle(PointerEvent::Confirm);
    assert_eq!(effects, vec![Effect::SaveUserCoordinate(expected)]);
    let remaining = session.apply_blocking(effects, &store);

    assert_eq!(session.user_coordinate(), expected);
    assert_eq!(store.saved_coordinate(), Some(expected));
    assert_eq!(store.load_user_coordinate().unwrap(), Some(expected));
    assert_eq!(store.save_count(), 1);

    let shown = notices(&remaining);
    assert_eq!(shown.len(), 1);
    assert!(!shown[0].is_error());
    assert!(shown[0].message().starts_with("Location saved successfully!"));
}

#[test]
fn test_failed_save_keeps_new_location_active() {
    let store = MemoryStore::with_sample_data();
    store.set_fail_saves(true);
    let mut session = loaded_session(&store);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P2));
    let expected = session.viewport().point_to_coordinate(P2);
    let effects = session.handle(PointerEvent::Confirm);
    let remaining = session.apply_blocking(effects, &store);

    assert_eq!(session.user_coordinate(), expected);
    assert_eq!(store.saved_coordinate(), None);
    assert_eq!(store.save_count(), 1);

    let shown = notices(&remaining);
    assert_eq!(shown.len(), 1);
    assert!(shown[0].is_error());
}

#[test]
fn test_distances_follow_confirmed_location() {
    let store = MemoryStore::with_sample_data();
    let mut session = loaded_session(&store);
    let before: Vec<f64> = session
        .locations()
        .iter()
        .map(|l| l.distance_from_user)
        .collect();

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P1));
    let effects = session.handle(PointerEvent::Confirm);
    session.apply_blocking(effects, &store);

    let user = session.user_coordinate();
    for (location, old) in session.locations().iter().zip(before) {
        assert!((location.distance_from_user - location.coordinate.distance_to(&user)).abs() < 1e-6);
        assert_ne!(location.distance_from_user, old);
    }
}

#[test]
fn test_markers_rebuilt_after_load() {
    let store = MemoryStore::with_sample_data();
    let session = loaded_session(&store);
    let markers = session.markers();

    assert_eq!(markers.len(), sample_locations().len() + 1);
    assert_eq!(
        markers
            .iter()
            .filter(|m| m.role == MarkerRole::UserLocation)
            .count(),
        1
    );
}

#[test]
fn test_late_cancel_reload_does_not_undo_confirm() {
    let saved = GeoCoordinate::new(-33.9311, 18.4173);
    let store = MemoryStore::new(sample_locations(), Some(saved));
    let mut session = loaded_session(&store);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::SingleClick(P1));
    let cancel_effects = session.handle(PointerEvent::Cancel);
    assert!(cancel_effects.contains(&Effect::ReloadUserCoordinate));

    // The reload is still in flight while the user picks again.
    session.handle(PointerEvent::EnterLocationSelect);
    let target = PixelPoint::new(700.0, 500.0);
    session.handle(PointerEvent::SingleClick(target));
    let confirmed = session.viewport().point_to_coordinate(target);
    let effects = session.handle(PointerEvent::Confirm);
    session.apply_blocking(effects, &store);
    assert_eq!(session.user_coordinate(), confirmed);

    let notice = session.user_coordinate_reloaded::<String>(Ok(Some(saved)));
    assert!(notice.is_none());
    assert_eq!(session.user_coordinate(), confirmed);
    assert_eq!(session.markers().user_marker().unwrap().position, confirmed);
    let user = session.user_coordinate();
    for location in session.locations() {
        assert!((location.distance_from_user - location.coordinate.distance_to(&user)).abs() < 1e-6);
    }
}

#[test]
fn test_reload_after_second_selection_started_is_ignored() {
    let saved = GeoCoordinate::new(-33.9311, 18.4173);
    let store = MemoryStore::new(sample_locations(), Some(saved));
    let mut session = loaded_session(&store);

    session.handle(PointerEvent::EnterLocationSelect);
    session.handle(PointerEvent::Cancel);
    session.handle(PointerEvent::EnterLocationSelect);

    let elsewhere = GeoCoordinate::new(-30.0, 20.0);
    session.user_coordinate_reloaded::<String>(Ok(Some(elsewhere)));
    assert_eq!(session.user_coordinate(), saved);
}
