// Marker pulse bounds and the precise-location state machine.

use app_core::{
    GeoFix, LocationPhase, LocationState, LookupResponse, MarkerPulse, Provenance,
    MARKER_SCALE_MAX, MARKER_SCALE_MIN,
};

fn approximate_fix() -> GeoFix {
    let resp = LookupResponse {
        latitude: "35.68".into(),
        longitude: "139.69".into(),
        country: "Japan".into(),
        ..Default::default()
    };
    GeoFix::from_lookup(&resp).expect("valid fix")
}

#[test]
fn pulse_stays_within_bounds_indefinitely() {
    let mut pulse = MarkerPulse::default();
    for step in 0..100_000 {
        let s = pulse.step();
        assert!(
            (MARKER_SCALE_MIN..=MARKER_SCALE_MAX).contains(&s),
            "escaped bounds at step {step}: {s}"
        );
    }
}

#[test]
fn pulse_actually_oscillates() {
    let mut pulse = MarkerPulse::default();
    let mut hit_max = false;
    let mut hit_min_after_max = false;
    for _ in 0..1000 {
        let s = pulse.step();
        if (s - MARKER_SCALE_MAX).abs() < 1e-6 {
            hit_max = true;
        }
        if hit_max && (s - MARKER_SCALE_MIN).abs() < 1e-6 {
            hit_min_after_max = true;
        }
    }
    assert!(hit_max && hit_min_after_max);
}

#[test]
fn lookup_success_moves_to_approximate() {
    let mut state = LocationState::default();
    assert_eq!(state.phase(), LocationPhase::NoFix);
    assert!(state.fix().is_none());

    state.lookup_succeeded(approximate_fix());
    assert_eq!(state.phase(), LocationPhase::Approximate);
    assert_eq!(state.fix().unwrap().provenance, Provenance::Approximate);
}

#[test]
fn precise_request_without_sensor_is_a_no_op() {
    let mut state = LocationState::default();
    state.lookup_succeeded(approximate_fix());

    assert!(!state.request_precise(false));
    assert_eq!(state.phase(), LocationPhase::Approximate);
}

#[test]
fn precise_request_before_any_fix_is_rejected() {
    let mut state = LocationState::default();
    assert!(!state.request_precise(true));
    assert_eq!(state.phase(), LocationPhase::NoFix);
}

#[test]
fn precise_success_replaces_fix_wholesale() {
    let mut state = LocationState::default();
    state.lookup_succeeded(approximate_fix());
    assert!(state.request_precise(true));
    assert_eq!(state.phase(), LocationPhase::AwaitingPrecise);

    state.precise_succeeded(35.6586, 139.7454);
    assert_eq!(state.phase(), LocationPhase::Precise);
    let fix = state.fix().unwrap();
    assert_eq!(fix.provenance, Provenance::Precise);
    // Replacement is total: lookup metadata from the approximate fix is gone.
    assert!(fix.lookup.is_none());
}

#[test]
fn precise_failure_abandons_back_to_approximate() {
    let mut state = LocationState::default();
    state.lookup_succeeded(approximate_fix());
    assert!(state.request_precise(true));

    state.precise_failed();
    assert_eq!(state.phase(), LocationPhase::Approximate);
    // The approximate fix is untouched.
    assert_eq!(state.fix().unwrap().provenance, Provenance::Approximate);
}

#[test]
fn stray_sensor_callbacks_are_ignored_outside_awaiting() {
    let mut state = LocationState::default();
    state.lookup_succeeded(approximate_fix());

    // No request in flight; callbacks must not change anything.
    state.precise_succeeded(0.0, 0.0);
    assert_eq!(state.phase(), LocationPhase::Approximate);
    state.precise_failed();
    assert_eq!(state.phase(), LocationPhase::Approximate);
}
