// Ease curve and camera flight behavior.

use app_core::{
    ease_out_cubic, project, CameraFlight, CameraOrbit, CAMERA_DISTANCE_FACTOR, CAMERA_FLIGHT_MS,
    CAMERA_MAX_DISTANCE_FACTOR, CAMERA_MIN_DISTANCE_FACTOR, GLOBE_RADIUS,
};
use glam::Vec3;

#[test]
fn ease_endpoints() {
    assert!((ease_out_cubic(0.0) - 0.0).abs() < 1e-6);
    assert!((ease_out_cubic(1.0) - 1.0).abs() < 1e-6);
}

#[test]
fn ease_is_monotonic_on_unit_interval() {
    let mut prev = ease_out_cubic(0.0);
    for i in 1..=1000 {
        let e = ease_out_cubic(i as f32 / 1000.0);
        assert!(e >= prev, "ease decreased at step {i}");
        prev = e;
    }
}

#[test]
fn flight_starts_at_start_and_ends_at_target() {
    let start = Vec3::new(0.0, 0.0, 2.5);
    let target = Vec3::new(2.5, 0.0, 0.0);
    let mut flight = CameraFlight::new(start, target, 1000.0);

    let first = flight.step(0.0);
    assert!((first - start).length() < 1e-5);

    // 60 fps for well over the duration
    let mut last = first;
    for _ in 0..120 {
        last = flight.step(1000.0 / 60.0);
    }
    assert!(flight.finished());
    assert!((last - target).length() < 1e-4, "{last:?}");
}

#[test]
fn flight_clamps_past_duration() {
    let start = Vec3::ZERO;
    let target = Vec3::new(1.0, 2.0, 3.0);
    let mut flight = CameraFlight::new(start, target, 100.0);
    let eye = flight.step(10_000.0);
    assert!(flight.finished());
    assert!((eye - target).length() < 1e-6);
    // Further steps stay pinned at the target.
    let eye2 = flight.step(1000.0);
    assert!((eye2 - target).length() < 1e-6);
}

#[test]
fn flight_toward_marker_targets_distance_factor() {
    let marker = project(48.86, 2.35, GLOBE_RADIUS);
    let flight = CameraFlight::toward_marker(Vec3::new(0.0, 0.0, 2.5), marker, GLOBE_RADIUS);
    let target = flight.target();
    let expected_dist = GLOBE_RADIUS * CAMERA_DISTANCE_FACTOR;
    assert!((target.length() - expected_dist).abs() < 1e-4);
    // Target lies along the marker direction.
    let cos = target.normalize().dot(marker.normalize());
    assert!(cos > 0.9999, "target not aligned with marker: cos={cos}");
}

#[test]
fn default_flight_duration_is_one_second() {
    assert!((CAMERA_FLIGHT_MS - 1000.0).abs() < f32::EPSILON);
}

#[test]
fn orbit_roundtrips_the_eye_position() {
    let eye = Vec3::new(1.2, 0.8, -1.7);
    let orbit = CameraOrbit::from_eye(eye);
    assert!((orbit.eye() - eye).length() < 1e-4, "{:?}", orbit.eye());
    assert!((orbit.distance() - eye.length()).abs() < 1e-5);
}

#[test]
fn orbit_drag_preserves_distance() {
    let mut orbit = CameraOrbit::from_eye(Vec3::new(0.0, 0.0, 2.5));
    orbit.rotate(0.7, -0.3);
    assert!((orbit.eye().length() - 2.5).abs() < 1e-4);
}

#[test]
fn orbit_pitch_stays_off_the_poles() {
    let mut orbit = CameraOrbit::from_eye(Vec3::new(0.0, 0.0, 2.5));
    // Drag way past the top of the globe.
    for _ in 0..100 {
        orbit.rotate(0.0, 1.0);
    }
    let eye = orbit.eye();
    // A sideways component must survive so the view up vector stays valid.
    let lateral = (eye.x * eye.x + eye.z * eye.z).sqrt();
    assert!(lateral > 1e-3, "eye collapsed onto the pole: {eye:?}");
}

#[test]
fn orbit_zoom_clamps_to_distance_range() {
    let mut orbit = CameraOrbit::from_eye(Vec3::new(0.0, 0.0, 2.5));

    for _ in 0..50 {
        orbit.zoom(0.5, GLOBE_RADIUS);
    }
    let min = GLOBE_RADIUS * CAMERA_MIN_DISTANCE_FACTOR;
    assert!((orbit.distance() - min).abs() < 1e-5);

    for _ in 0..50 {
        orbit.zoom(2.0, GLOBE_RADIUS);
    }
    let max = GLOBE_RADIUS * CAMERA_MAX_DISTANCE_FACTOR;
    assert!((orbit.distance() - max).abs() < 1e-5);
}

#[test]
fn replacing_a_flight_restarts_from_the_new_start() {
    // A second fix arriving mid-flight replaces the flight wholesale; the
    // new flight begins wherever the camera currently is.
    let mut first = CameraFlight::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 1000.0);
    let mid = first.step(300.0);
    assert!(!first.finished());

    let mut second = CameraFlight::new(mid, Vec3::new(10.0, 0.0, 0.0), 1000.0);
    let resumed = second.step(0.0);
    assert!((resumed - mid).length() < 1e-5);
}
