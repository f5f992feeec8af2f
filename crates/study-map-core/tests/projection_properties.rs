// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use study_map_core::geo::GeoCoordinate;
use study_map_core::projection::{Projector, MAX_LATITUDE, MAX_ZOOM, MIN_ZOOM};
use study_map_core::viewport::Viewport;

const TOLERANCE_DEG: f64 = 1e-6;

#[test]
fn test_round_trip_random_coordinates() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0001);
    let projector = Projector::default();

    for _ in 0..1000 {
        let c = GeoCoordinate::new(
            rng.gen_range(-MAX_LATITUDE..=MAX_LATITUDE),
            rng.gen_range(-180.0..180.0),
        );
        for zoom in MIN_ZOOM..=MAX_ZOOM {
            let back = projector.to_coordinate(projector.to_pixel(c, zoom), zoom);
            assert!(
                (back.latitude - c.latitude).abs() < TOLERANCE_DEG
                    && (back.longitude - c.longitude).abs() < TOLERANCE_DEG,
                "round trip drifted at zoom {}: {:?} -> {:?}",
                zoom,
                c,
                back
            );
        }
    }
}

#[test]
fn test_pan_steps_sum_to_single_pan() {
    let start = GeoCoordinate::new(-33.93080102488844, 18.430230425585137);

    let mut stepped = Viewport::new(start, 8, 830.0, 200.0);
    for _ in 0..3 {
        stepped.pan_by(10.0, 0.0);
    }

    let mut single = Viewport::new(start, 8, 830.0, 200.0);
    single.pan_by(30.0, 0.0);

    let a = stepped.center();
    let b = single.center();
    assert!((a.latitude - b.latitude).abs() < TOLERANCE_DEG);
    assert!((a.longitude - b.longitude).abs() < TOLERANCE_DEG);
}

#[test]
fn test_random_pan_sequences_commute() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0002);

    for _ in 0..200 {
        let start = GeoCoordinate::new(rng.gen_range(-70.0..70.0), rng.gen_range(-170.0..170.0));
        let zoom = rng.gen_range(MIN_ZOOM..=MAX_ZOOM);
        let steps: Vec<(f64, f64)> = (0..rng.gen_range(1..12))
            .map(|_| (rng.gen_range(-15.0..15.0), rng.gen_range(-15.0..15.0)))
            .collect();

        let mut stepped = Viewport::new(start, zoom, 640.0, 480.0);
        for (dx, dy) in &steps {
            stepped.pan_by(*dx, *dy);
        }

        let (sx, sy) = steps
            .iter()
            .fold((0.0, 0.0), |(ax, ay), (dx, dy)| (ax + dx, ay + dy));
        let mut single = Viewport::new(start, zoom, 640.0, 480.0);
        single.pan_by(sx, sy);

        let a = stepped.center();
        let b = single.center();
        assert!((a.latitude - b.latitude).abs() < TOLERANCE_DEG, "{:?} vs {:?}", a, b);
        assert!((a.longitude - b.longitude).abs() < TOLERANCE_DEG, "{:?} vs {:?}", a, b);
    }
}

#[test]
fn test_zoom_clamp() {
    let mut vp = Viewport::new(GeoCoordinate::new(0.0, 0.0), 8, 100.0, 100.0);
    let center = vp.center();

    assert_eq!(vp.set_zoom(0), center);
    assert_eq!(vp.zoom(), 8);
    vp.set_zoom(16);
    assert_eq!(vp.zoom(), 8);

    vp.set_zoom(MIN_ZOOM);
    vp.zoom_in();
    assert_eq!(vp.zoom(), MIN_ZOOM);

    vp.set_zoom(MAX_ZOOM);
    vp.zoom_out();
    assert_eq!(vp.zoom(), MAX_ZOOM);
    assert_eq!(vp.center(), center);
}
