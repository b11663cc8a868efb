//! State machine for the precise-location upgrade.

use crate::geo::GeoFix;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LocationPhase {
    NoFix,
    Approximate,
    AwaitingPrecise,
    Precise,
}

/// Owns the single live [`GeoFix`] and the upgrade phase.
///
/// Transitions: lookup success moves NoFix to Approximate; an explicit user
/// request moves Approximate to AwaitingPrecise, gated on sensor
/// availability; the sensor callback then either replaces the fix wholesale
/// (Precise) or abandons the request (back to Approximate). No timeouts
/// beyond the platform's, no automatic retry.
#[derive(Clone, Debug)]
pub struct LocationState {
    phase: LocationPhase,
    fix: Option<GeoFix>,
}

impl Default for LocationState {
    fn default() -> Self {
        Self {
            phase: LocationPhase::NoFix,
            fix: None,
        }
    }
}

impl LocationState {
    pub fn phase(&self) -> LocationPhase {
        self.phase
    }

    pub fn fix(&self) -> Option<&GeoFix> {
        self.fix.as_ref()
    }

    /// External lookup answered. Only meaningful before any fix exists.
    pub fn lookup_succeeded(&mut self, fix: GeoFix) {
        if self.phase == LocationPhase::NoFix {
            self.fix = Some(fix);
            self.phase = LocationPhase::Approximate;
        }
    }

    /// User asked for a precise fix. Returns whether a sensor request should
    /// be issued; without a sensor this is a terminal no-op.
    pub fn request_precise(&mut self, sensor_available: bool) -> bool {
        if self.phase != LocationPhase::Approximate {
            return false;
        }
        if !sensor_available {
            log::error!("geolocation sensor not available");
            return false;
        }
        self.phase = LocationPhase::AwaitingPrecise;
        true
    }

    /// Sensor callback succeeded; the fix is replaced wholesale, not merged.
    pub fn precise_succeeded(&mut self, lat: f64, long: f64) {
        if self.phase == LocationPhase::AwaitingPrecise {
            self.fix = Some(GeoFix::precise(lat, long));
            self.phase = LocationPhase::Precise;
        }
    }

    /// Sensor callback failed; the request is abandoned.
    pub fn precise_failed(&mut self) {
        if self.phase == LocationPhase::AwaitingPrecise {
            self.phase = LocationPhase::Approximate;
        }
    }
}
