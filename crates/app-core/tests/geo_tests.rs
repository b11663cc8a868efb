// Projection and marker-transform properties.

use app_core::{marker_transform, project, GeoFix, LookupResponse, Provenance, GLOBE_RADIUS};
use glam::{Vec3, Vec4};

const EPS: f32 = 1e-3;

#[test]
fn projected_points_lie_on_the_sphere() {
    let radius = 2.5;
    for lat_step in 0..=36 {
        for long_step in 0..=72 {
            let lat = -90.0 + lat_step as f32 * 5.0;
            let long = -180.0 + long_step as f32 * 5.0;
            let p = project(lat, long, radius);
            assert!(
                (p.length() - radius).abs() < EPS,
                "off-sphere at lat={lat} long={long}: |p|={}",
                p.length()
            );
        }
    }
}

#[test]
fn north_pole_maps_to_plus_y_for_any_longitude() {
    for long in [-180.0, -90.0, 0.0, 45.0, 180.0] {
        let p = project(90.0, long, 1.0);
        assert!((p - Vec3::new(0.0, 1.0, 0.0)).length() < EPS, "long={long}: {p:?}");
    }
}

#[test]
fn south_pole_is_antipodal_to_north() {
    for long in [-120.0, 0.0, 60.0] {
        let p = project(-90.0, long, 1.0);
        assert!((p - Vec3::new(0.0, -1.0, 0.0)).length() < EPS, "long={long}: {p:?}");
    }
}

#[test]
fn reference_meridian_matches_texture_orientation() {
    // (0, 0) sits on the equator; with the chosen sign conventions it lands
    // at +x on the seam side of the texture.
    let p = project(0.0, 0.0, 1.0);
    assert!(p.y.abs() < EPS, "equator point off the equator: {p:?}");
    assert!((p.x - 1.0).abs() < EPS && p.z.abs() < EPS, "{p:?}");
    // A quarter turn east lands on -z.
    let q = project(0.0, 90.0, 1.0);
    assert!((q.z + 1.0).abs() < EPS && q.x.abs() < EPS, "{q:?}");
}

#[test]
fn opposite_longitudes_are_mirrored() {
    let a = project(30.0, 45.0, 1.0);
    let b = project(30.0, -135.0, 1.0);
    // Same latitude band, opposite side of the axis.
    assert!((a.y - b.y).abs() < EPS);
    assert!((a.x + b.x).abs() < EPS);
    assert!((a.z + b.z).abs() < EPS);
}

#[test]
fn marker_transform_places_origin_at_projected_point() {
    for (lat, long) in [(0.0, 0.0), (51.5, -0.1), (-33.9, 151.2), (90.0, 10.0)] {
        let m = marker_transform(lat, long, GLOBE_RADIUS);
        let placed = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let expected = project(lat, long, GLOBE_RADIUS);
        assert!(
            (placed.truncate() - expected).length() < EPS,
            "lat={lat} long={long}: {placed:?} vs {expected:?}"
        );
    }
}

#[test]
fn lookup_response_parses_string_coordinates() {
    let resp = LookupResponse {
        latitude: "52.520".into(),
        longitude: "13.405".into(),
        organization_name: "Example Org".into(),
        asn: Some(64512),
        country: "Germany".into(),
        timezone: "Europe/Berlin".into(),
        ip: "203.0.113.7".into(),
    };
    let fix = GeoFix::from_lookup(&resp).expect("parse");
    assert_eq!(fix.provenance, Provenance::Approximate);
    assert!((fix.lat - 52.52).abs() < 1e-9);
    assert!((fix.long - 13.405).abs() < 1e-9);
    let info = fix.lookup.expect("lookup metadata");
    assert_eq!(info.asn, Some(64512));
    assert_eq!(info.ip, "203.0.113.7");
}

#[test]
fn lookup_response_rejects_bad_coordinates() {
    let mut resp = LookupResponse {
        latitude: "not-a-number".into(),
        longitude: "0".into(),
        ..Default::default()
    };
    assert!(GeoFix::from_lookup(&resp).is_err());

    resp.latitude = "91.0".into();
    assert!(GeoFix::from_lookup(&resp).is_err());

    resp.latitude = "45.0".into();
    resp.longitude = "-181.0".into();
    assert!(GeoFix::from_lookup(&resp).is_err());
}

#[test]
fn precise_fix_carries_no_lookup_metadata() {
    let fix = GeoFix::precise(10.0, 20.0);
    assert_eq!(fix.provenance, Provenance::Precise);
    assert!(fix.lookup.is_none());
}
