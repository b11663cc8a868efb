//! Camera state and the time-boxed flight toward a fix.

use crate::constants::{
    CAMERA_DISTANCE_FACTOR, CAMERA_FLIGHT_MS, CAMERA_MAX_DISTANCE_FACTOR,
    CAMERA_MIN_DISTANCE_FACTOR,
};
use glam::{Mat4, Vec3};

// Keep the orbit pitch off the poles so the view up vector stays valid.
const ORBIT_PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Simple right-handed camera, always aimed at the sphere centre.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    pub fn view_matrix(&self) -> Mat4 {
        // Up flips near the poles would need handling if the eye could reach
        // them; the distance factor keeps the eye off the Y axis in practice.
        let up = if self.eye.cross(Vec3::Y).length_squared() < 1e-8 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        Mat4::look_at_rh(self.eye, Vec3::ZERO, up)
    }
}

/// Pointer-driven orbit of the camera eye around the sphere centre.
///
/// Built from the current eye each gesture, mutated by drag deltas and wheel
/// zoom, then read back as an eye position. Zoom is clamped to the min/max
/// distance factors; pitch is clamped short of the poles.
#[derive(Clone, Debug)]
pub struct CameraOrbit {
    yaw: f32,
    pitch: f32,
    distance: f32,
}

impl CameraOrbit {
    pub fn from_eye(eye: Vec3) -> Self {
        let distance = eye.length().max(1e-4);
        let pitch = (eye.y / distance).clamp(-1.0, 1.0).asin();
        let yaw = eye.x.atan2(eye.z);
        Self {
            yaw,
            pitch,
            distance,
        }
    }

    pub fn rotate(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// Scale the orbit distance, clamped to the allowed range for `radius`.
    pub fn zoom(&mut self, factor: f32, radius: f32) {
        let min = radius * CAMERA_MIN_DISTANCE_FACTOR;
        let max = radius * CAMERA_MAX_DISTANCE_FACTOR;
        self.distance = (self.distance * factor.max(1e-4)).clamp(min, max);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        )
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Cubic ease-out: fast initially, slowing near completion.
#[inline]
pub fn ease_out_cubic(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(3)
}

/// A fixed-duration interpolation of the camera eye from a start position to
/// a target position. Stepped once per frame; self-terminating.
///
/// A new fix replaces the whole flight: the frame context stores an
/// `Option<CameraFlight>` and overwrites it, so two flights never race over
/// the camera position.
#[derive(Clone, Debug)]
pub struct CameraFlight {
    start: Vec3,
    target: Vec3,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl CameraFlight {
    pub fn new(start: Vec3, target: Vec3, duration_ms: f32) -> Self {
        Self {
            start,
            target,
            duration_ms: duration_ms.max(1.0),
            elapsed_ms: 0.0,
        }
    }

    /// Flight from the current eye toward a marker: the target lies along the
    /// marker's direction at a fixed multiple of the sphere radius.
    pub fn toward_marker(start: Vec3, marker_pos: Vec3, radius: f32) -> Self {
        let distance = radius * CAMERA_DISTANCE_FACTOR;
        let target = (marker_pos / radius) * distance;
        Self::new(start, target, CAMERA_FLIGHT_MS)
    }

    /// Advance by `dt_ms` and return the interpolated eye position.
    pub fn step(&mut self, dt_ms: f32) -> Vec3 {
        self.elapsed_ms += dt_ms;
        let progress = (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        let eased = ease_out_cubic(progress);
        self.start.lerp(self.target, eased)
    }

    pub fn finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}
