//! The capability snapshot: a structured record of what the invoking browser
//! exposes, built once per page load.
//!
//! Every field is either a concrete value or the explicit "Not available"
//! sentinel. The display layer renders all fields unconditionally, so
//! absence is never a missing field. Probe failures degrade the affected
//! field to the sentinel; nothing here ever aborts the rest of the probe.

use serde::ser::Serializer;
use serde::Serialize;
use std::fmt;

/// Sentinel text substituted when a value cannot be obtained.
pub const NOT_AVAILABLE: &str = "Not available";

/// A probed value: concrete, or the explicit unavailability sentinel.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Probed<T> {
    Value(T),
    #[default]
    NotAvailable,
}

impl<T> Probed<T> {
    pub fn is_available(&self) -> bool {
        matches!(self, Probed::Value(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Probed::Value(v) => Some(v),
            Probed::NotAvailable => None,
        }
    }
}

impl<T> From<Option<T>> for Probed<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Probed::Value(v),
            None => Probed::NotAvailable,
        }
    }
}

impl<T: Serialize> Serialize for Probed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Probed::Value(v) => v.serialize(serializer),
            Probed::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Probed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probed::Value(v) => v.fmt(f),
            Probed::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct NavigatorFacts {
    pub user_agent: Probed<String>,
    pub language: Probed<String>,
    pub languages: Vec<String>,
    pub online: bool,
    pub hardware_concurrency: Probed<u32>,
    pub max_touch_points: i32,
    pub pdf_viewer_enabled: Probed<bool>,
    pub cookie_enabled: bool,
    pub device_memory_gb: Probed<f64>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ViewportGeometry {
    pub inner_width: Probed<f64>,
    pub inner_height: Probed<f64>,
    pub outer_width: Probed<f64>,
    pub outer_height: Probed<f64>,
    pub scroll_x: Probed<f64>,
    pub scroll_y: Probed<f64>,
    pub device_pixel_ratio: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ScreenGeometry {
    pub width: Probed<i32>,
    pub height: Probed<i32>,
    pub avail_width: Probed<i32>,
    pub avail_height: Probed<i32>,
    pub color_depth: Probed<u32>,
    pub pixel_depth: Probed<u32>,
    pub orientation_type: Probed<String>,
    pub orientation_angle: Probed<u16>,
}

/// Network-quality hint from the connection API, when exposed.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NetworkInfo {
    pub effective_type: Probed<String>,
    pub downlink_mbps: Probed<f64>,
    pub rtt_ms: Probed<f64>,
    pub save_data: Probed<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BatteryInfo {
    pub charging: bool,
    pub charging_time_sec: f64,
    pub discharging_time_sec: f64,
    pub level: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct HeapInfo {
    pub js_heap_size_limit: f64,
    pub total_js_heap_size: f64,
    pub used_js_heap_size: f64,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct StorageInfo {
    pub quota_bytes: Probed<f64>,
    pub usage_bytes: Probed<f64>,
    pub persisted: Probed<bool>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct WebGlInfo {
    pub vendor: Probed<String>,
    pub renderer: Probed<String>,
    pub version: Probed<String>,
    pub shading_language_version: Probed<String>,
    pub extensions: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CanvasInfo {
    pub available: bool,
    pub data_url: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SensorFlags {
    pub device_orientation: bool,
    pub device_motion: bool,
    pub absolute_orientation: bool,
    pub accelerometer: bool,
    pub gyroscope: bool,
    pub magnetometer: bool,
    pub ambient_light: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct HardwareFlags {
    pub bluetooth: bool,
    pub usb: bool,
    pub serial: bool,
    pub hid: bool,
    pub nfc: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct SpeechFlags {
    pub recognition: bool,
    pub synthesis: bool,
    pub voices: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct GamepadInfo {
    pub api: bool,
    pub connected: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct WebShareFlags {
    pub share: bool,
    pub share_files: bool,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct CredentialFlags {
    pub api: bool,
    pub platform_authenticator: bool,
}

/// Immutable-once-resolved record of the invoking environment.
///
/// Constructed exactly once per page load, after the asynchronous
/// sub-queries (storage estimate, persistence grant, battery) resolve.
#[derive(Clone, Debug, Serialize)]
pub struct CapabilitySnapshot {
    pub navigator: NavigatorFacts,
    pub viewport: ViewportGeometry,
    pub screen: ScreenGeometry,
    pub connection: Probed<NetworkInfo>,
    pub battery: Probed<BatteryInfo>,
    pub heap_memory: Probed<HeapInfo>,
    pub media_devices: bool,
    pub storage: StorageInfo,
    pub webgl: Probed<WebGlInfo>,
    pub canvas: Probed<CanvasInfo>,
    pub timezone: Probed<String>,
    pub sensors: SensorFlags,
    pub hardware: HardwareFlags,
    pub speech: SpeechFlags,
    pub payment_request: bool,
    pub gamepad: GamepadInfo,
    pub local_fonts_api: bool,
    pub vibration: bool,
    pub web_share: WebShareFlags,
    pub xr: bool,
    pub credentials: CredentialFlags,
}

impl CapabilitySnapshot {
    /// A snapshot with every probed field at its sentinel and every flag
    /// false: the defensive base the probe fills in field by field.
    pub fn unavailable() -> Self {
        Self {
            navigator: NavigatorFacts::default(),
            viewport: ViewportGeometry::default(),
            screen: ScreenGeometry::default(),
            connection: Probed::NotAvailable,
            battery: Probed::NotAvailable,
            heap_memory: Probed::NotAvailable,
            media_devices: false,
            storage: StorageInfo::default(),
            webgl: Probed::NotAvailable,
            canvas: Probed::NotAvailable,
            timezone: Probed::NotAvailable,
            sensors: SensorFlags::default(),
            hardware: HardwareFlags::default(),
            speech: SpeechFlags::default(),
            payment_request: false,
            gamepad: GamepadInfo::default(),
            local_fonts_api: false,
            vibration: false,
            web_share: WebShareFlags::default(),
            xr: false,
            credentials: CredentialFlags::default(),
        }
    }

    /// Names of all top-level groups, in display order. The panel iterates
    /// this list so every group renders unconditionally.
    pub const GROUPS: &'static [&'static str] = &[
        "navigator",
        "viewport",
        "screen",
        "connection",
        "battery",
        "heap_memory",
        "media_devices",
        "storage",
        "webgl",
        "canvas",
        "timezone",
        "sensors",
        "hardware",
        "speech",
        "payment_request",
        "gamepad",
        "local_fonts_api",
        "vibration",
        "web_share",
        "xr",
        "credentials",
    ];
}
