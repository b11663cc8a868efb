// Shared visual tuning constants used by the web frontend.

// Globe
pub const GLOBE_RADIUS: f32 = 1.0; // world-space sphere radius
pub const MARKER_RADIUS_FACTOR: f32 = 0.03; // marker sphere radius relative to the globe

// Marker pulse (bounded triangle wave, one step per frame)
pub const MARKER_SCALE_MIN: f32 = 1.0;
pub const MARKER_SCALE_MAX: f32 = 1.5;
pub const MARKER_SCALE_STEP: f32 = 0.02;

// Camera
pub const CAMERA_FOV_DEG: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_DISTANCE_FACTOR: f32 = 2.5; // resting distance as a multiple of the globe radius
pub const CAMERA_MIN_DISTANCE_FACTOR: f32 = 1.5;
pub const CAMERA_MAX_DISTANCE_FACTOR: f32 = 4.0;

// Camera flight duration in milliseconds
pub const CAMERA_FLIGHT_MS: f32 = 1000.0;

// Colors
pub const MARKER_COLOR: [f32; 3] = [0.0, 1.0, 0.0];
pub const BACKGROUND_COLOR: [f32; 3] = [0.039, 0.039, 0.039];
