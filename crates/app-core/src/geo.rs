//! Geographic fixes and the sphere projection used by the globe.

use glam::{Mat4, Vec3};
use serde::Deserialize;
use thiserror::Error;

/// How a [`GeoFix`] was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    /// Approximate, derived from an IP geolocation lookup.
    Approximate,
    /// Precise, reported by the platform's location sensor.
    Precise,
}

/// Auxiliary metadata carried by an approximate fix.
#[derive(Clone, Debug, PartialEq)]
pub struct LookupInfo {
    pub organization: String,
    pub asn: Option<u32>,
    pub country: String,
    pub timezone: String,
    pub ip: String,
}

/// A located point. Only one fix is live at a time; replacement is total.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoFix {
    pub lat: f64,
    pub long: f64,
    pub provenance: Provenance,
    pub lookup: Option<LookupInfo>,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("coordinate is not a number: {0:?}")]
    NotANumber(String),
    #[error("latitude out of range: {0}")]
    LatitudeOutOfRange(f64),
    #[error("longitude out of range: {0}")]
    LongitudeOutOfRange(f64),
}

/// Payload returned by the IP geolocation service (via `/api/ip`).
///
/// Coordinates arrive as strings; everything else is optional and defaulted
/// so a sparse upstream answer still parses.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LookupResponse {
    pub latitude: String,
    pub longitude: String,
    #[serde(default)]
    pub organization_name: String,
    #[serde(default)]
    pub asn: Option<u32>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub ip: String,
}

impl GeoFix {
    /// Build an approximate fix from a lookup response, validating ranges.
    pub fn from_lookup(resp: &LookupResponse) -> Result<Self, LookupError> {
        let lat: f64 = resp
            .latitude
            .trim()
            .parse()
            .map_err(|_| LookupError::NotANumber(resp.latitude.clone()))?;
        let long: f64 = resp
            .longitude
            .trim()
            .parse()
            .map_err(|_| LookupError::NotANumber(resp.longitude.clone()))?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(LookupError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&long) {
            return Err(LookupError::LongitudeOutOfRange(long));
        }
        Ok(Self {
            lat,
            long,
            provenance: Provenance::Approximate,
            lookup: Some(LookupInfo {
                organization: resp.organization_name.clone(),
                asn: resp.asn,
                country: resp.country.clone(),
                timezone: resp.timezone.clone(),
                ip: resp.ip.clone(),
            }),
        })
    }

    /// Build a precise fix from the location sensor. Carries no lookup data.
    pub fn precise(lat: f64, long: f64) -> Self {
        Self {
            lat,
            long,
            provenance: Provenance::Precise,
            lookup: None,
        }
    }
}

/// Project latitude/longitude onto a sphere of the given radius.
///
/// The sign conventions here match the equirectangular earth texture's
/// orientation; changing them moves the marker to the wrong hemisphere or
/// meridian relative to the texture.
#[inline]
pub fn project(lat: f32, long: f32, radius: f32) -> Vec3 {
    let polar = (90.0 - lat).to_radians();
    let azimuth = (long + 180.0).to_radians();
    Vec3::new(
        -(radius * polar.sin() * azimuth.cos()),
        radius * polar.cos(),
        radius * polar.sin() * azimuth.sin(),
    )
}

/// Model transform for the surface marker: sit at the projected point, face
/// the sphere centre, then a quarter turn about the local X axis so the
/// visible face lies tangent to the surface.
pub fn marker_transform(lat: f32, long: f32, radius: f32) -> Mat4 {
    let pos = project(lat, long, radius);
    // look_at needs an up vector that is not parallel to the view direction;
    // at the poles the position is collinear with +Y.
    let up = if pos.cross(Vec3::Y).length_squared() < 1e-8 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let orient = Mat4::look_at_rh(pos, Vec3::ZERO, up).inverse();
    orient * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2)
}
