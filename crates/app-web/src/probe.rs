//! The capability probe: one best-effort pass over the browser environment.
//!
//! Presence questions go through a [`CapabilityRegistry`] captured once from
//! the live `navigator`/`window` objects; every leaf value is probed
//! defensively and independently, so a failure degrades that one field to
//! the "Not available" sentinel without touching the rest. The snapshot is
//! published only after the asynchronous sub-queries (storage estimate,
//! persistence grant, battery) have resolved, and is immutable afterwards.

use app_core::{
    BatteryInfo, CanvasInfo, CapabilitySnapshot, CredentialFlags, GamepadInfo, HardwareFlags,
    HeapInfo, NavigatorFacts, NetworkInfo, Probed, ScreenGeometry, SensorFlags, SpeechFlags,
    StorageInfo, ViewportGeometry, WebGlInfo, WebShareFlags,
};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Presence answers for optional platform capabilities, captured once.
///
/// Dynamic `"x" in navigator` checks live here instead of being scattered
/// through the probe; the boolean answers are cached into the immutable
/// snapshot and never re-evaluated.
pub struct CapabilityRegistry {
    navigator: JsValue,
    window: JsValue,
}

impl CapabilityRegistry {
    pub fn capture(window: &web::Window) -> Self {
        Self {
            navigator: window.navigator().into(),
            window: window.clone().into(),
        }
    }

    pub fn in_navigator(&self, name: &str) -> bool {
        Reflect::has(&self.navigator, &JsValue::from_str(name)).unwrap_or(false)
    }

    pub fn in_window(&self, name: &str) -> bool {
        Reflect::has(&self.window, &JsValue::from_str(name)).unwrap_or(false)
    }

    /// A property value off `navigator`, filtered to be actually usable.
    pub fn navigator_value(&self, name: &str) -> Option<JsValue> {
        usable(Reflect::get(&self.navigator, &JsValue::from_str(name)).ok()?)
    }

    pub fn window_value(&self, name: &str) -> Option<JsValue> {
        usable(Reflect::get(&self.window, &JsValue::from_str(name)).ok()?)
    }

    /// Call a zero-argument method on `navigator`, e.g. `getBattery()`.
    pub fn call_navigator0(&self, method: &str) -> Option<JsValue> {
        let f = Reflect::get(&self.navigator, &JsValue::from_str(method)).ok()?;
        let f: Function = f.dyn_into().ok()?;
        f.call0(&self.navigator).ok()
    }
}

#[inline]
fn usable(v: JsValue) -> Option<JsValue> {
    if v.is_undefined() || v.is_null() {
        None
    } else {
        Some(v)
    }
}

#[inline]
fn get_f64(obj: &JsValue, key: &str) -> Option<f64> {
    Reflect::get(obj, &JsValue::from_str(key)).ok().and_then(|v| v.as_f64())
}

#[inline]
fn get_bool(obj: &JsValue, key: &str) -> Option<bool> {
    Reflect::get(obj, &JsValue::from_str(key)).ok().and_then(|v| v.as_bool())
}

#[inline]
fn get_string(obj: &JsValue, key: &str) -> Option<String> {
    Reflect::get(obj, &JsValue::from_str(key)).ok().and_then(|v| v.as_string())
}

/// Run the probe once and resolve its async sub-queries. Never throws; a
/// missing window yields the all-sentinel snapshot.
pub async fn collect() -> CapabilitySnapshot {
    let mut snap = CapabilitySnapshot::unavailable();
    let Some(window) = web::window() else {
        return snap;
    };
    let registry = CapabilityRegistry::capture(&window);

    snap.navigator = probe_navigator(&window, &registry);
    snap.viewport = probe_viewport(&window);
    snap.screen = probe_screen(&window);
    snap.connection = probe_connection(&registry);
    snap.heap_memory = probe_heap_memory(&window);
    snap.media_devices = registry.in_navigator("mediaDevices");
    if let Some(document) = window.document() {
        snap.webgl = probe_webgl(&document);
        snap.canvas = probe_canvas(&document);
    }
    snap.timezone = probe_timezone();
    snap.sensors = SensorFlags {
        device_orientation: registry.in_window("DeviceOrientationEvent"),
        device_motion: registry.in_window("DeviceMotionEvent"),
        absolute_orientation: registry.in_window("AbsoluteOrientationSensor"),
        accelerometer: registry.in_window("Accelerometer"),
        gyroscope: registry.in_window("Gyroscope"),
        magnetometer: registry.in_window("Magnetometer"),
        ambient_light: registry.in_window("AmbientLightSensor"),
    };
    snap.hardware = HardwareFlags {
        bluetooth: registry.in_navigator("bluetooth"),
        usb: registry.in_navigator("usb"),
        serial: registry.in_navigator("serial"),
        hid: registry.in_navigator("hid"),
        nfc: registry.in_navigator("nfc"),
    };
    snap.speech = probe_speech(&registry);
    snap.payment_request = registry.in_window("PaymentRequest");
    snap.gamepad = probe_gamepads(&window, &registry);
    snap.local_fonts_api = registry.in_window("queryLocalFonts");
    snap.vibration = registry.in_navigator("vibrate");
    snap.web_share = WebShareFlags {
        share: registry.in_navigator("share"),
        share_files: registry.in_navigator("share") && registry.in_navigator("canShare"),
    };
    snap.xr = registry.navigator_value("xr").is_some();
    snap.credentials = CredentialFlags {
        api: registry.in_navigator("credentials"),
        platform_authenticator: registry.window_value("PublicKeyCredential").is_some(),
    };

    // Awaited before the snapshot is published; each defaults independently.
    let (quota_bytes, usage_bytes) = probe_storage_estimate(&window, &registry).await;
    let persisted = probe_persistence(&window, &registry).await;
    snap.storage = StorageInfo {
        quota_bytes,
        usage_bytes,
        persisted,
    };
    snap.battery = probe_battery(&registry).await;

    snap
}

fn probe_navigator(window: &web::Window, registry: &CapabilityRegistry) -> NavigatorFacts {
    let nav = window.navigator();
    let concurrency = nav.hardware_concurrency();
    NavigatorFacts {
        user_agent: nav.user_agent().ok().into(),
        language: nav.language().into(),
        languages: nav.languages().iter().filter_map(|v| v.as_string()).collect(),
        online: nav.on_line(),
        hardware_concurrency: if concurrency > 0.0 {
            Probed::Value(concurrency as u32)
        } else {
            Probed::NotAvailable
        },
        max_touch_points: nav.max_touch_points(),
        pdf_viewer_enabled: registry
            .navigator_value("pdfViewerEnabled")
            .and_then(|v| v.as_bool())
            .into(),
        cookie_enabled: nav.cookie_enabled(),
        device_memory_gb: registry
            .navigator_value("deviceMemory")
            .and_then(|v| v.as_f64())
            .into(),
    }
}

fn probe_viewport(window: &web::Window) -> ViewportGeometry {
    let dim = |r: Result<JsValue, JsValue>| r.ok().and_then(|v| v.as_f64()).into();
    ViewportGeometry {
        inner_width: dim(window.inner_width()),
        inner_height: dim(window.inner_height()),
        outer_width: dim(window.outer_width()),
        outer_height: dim(window.outer_height()),
        scroll_x: window.scroll_x().ok().into(),
        scroll_y: window.scroll_y().ok().into(),
        device_pixel_ratio: window.device_pixel_ratio(),
    }
}

fn probe_screen(window: &web::Window) -> ScreenGeometry {
    let Ok(screen) = window.screen() else {
        return ScreenGeometry::default();
    };
    let orientation = screen.orientation();
    ScreenGeometry {
        width: screen.width().ok().into(),
        height: screen.height().ok().into(),
        avail_width: screen.avail_width().ok().into(),
        avail_height: screen.avail_height().ok().into(),
        color_depth: screen.color_depth().ok().into(),
        pixel_depth: screen.pixel_depth().ok().into(),
        orientation_type: orientation
            .type_()
            .ok()
            .map(|t| orientation_type_name(t).to_string())
            .into(),
        orientation_angle: orientation.angle().ok().into(),
    }
}

fn orientation_type_name(t: web::OrientationType) -> &'static str {
    match t {
        web::OrientationType::PortraitPrimary => "portrait-primary",
        web::OrientationType::PortraitSecondary => "portrait-secondary",
        web::OrientationType::LandscapePrimary => "landscape-primary",
        web::OrientationType::LandscapeSecondary => "landscape-secondary",
        _ => "unknown",
    }
}

fn probe_connection(registry: &CapabilityRegistry) -> Probed<NetworkInfo> {
    let Some(conn) = registry.navigator_value("connection") else {
        return Probed::NotAvailable;
    };
    let info = NetworkInfo {
        effective_type: get_string(&conn, "effectiveType").into(),
        downlink_mbps: get_f64(&conn, "downlink").into(),
        rtt_ms: get_f64(&conn, "rtt").into(),
        save_data: get_bool(&conn, "saveData").into(),
    };
    // An object exposing none of the fields degrades like a missing one.
    if !info.effective_type.is_available()
        && !info.downlink_mbps.is_available()
        && !info.rtt_ms.is_available()
        && !info.save_data.is_available()
    {
        return Probed::NotAvailable;
    }
    Probed::Value(info)
}

fn probe_heap_memory(window: &web::Window) -> Probed<HeapInfo> {
    let Some(perf) = window.performance() else {
        return Probed::NotAvailable;
    };
    let perf: JsValue = perf.into();
    let Some(mem) = Reflect::get(&perf, &JsValue::from_str("memory")).ok().and_then(usable)
    else {
        return Probed::NotAvailable;
    };
    match (
        get_f64(&mem, "jsHeapSizeLimit"),
        get_f64(&mem, "totalJSHeapSize"),
        get_f64(&mem, "usedJSHeapSize"),
    ) {
        (Some(limit), Some(total), Some(used)) => Probed::Value(HeapInfo {
            js_heap_size_limit: limit,
            total_js_heap_size: total,
            used_js_heap_size: used,
        }),
        _ => Probed::NotAvailable,
    }
}

fn probe_webgl(document: &web::Document) -> Probed<WebGlInfo> {
    let Some(canvas) = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        return Probed::NotAvailable;
    };
    let ctx = canvas
        .get_context("webgl")
        .ok()
        .flatten()
        .or_else(|| canvas.get_context("experimental-webgl").ok().flatten());
    let Some(gl) = ctx.and_then(|o| o.dyn_into::<web::WebGlRenderingContext>().ok()) else {
        return Probed::NotAvailable;
    };
    let param = |p: u32| gl.get_parameter(p).ok().and_then(|v| v.as_string());
    Probed::Value(WebGlInfo {
        vendor: param(web::WebGlRenderingContext::VENDOR).into(),
        renderer: param(web::WebGlRenderingContext::RENDERER).into(),
        version: param(web::WebGlRenderingContext::VERSION).into(),
        shading_language_version: param(web::WebGlRenderingContext::SHADING_LANGUAGE_VERSION).into(),
        extensions: gl
            .get_supported_extensions()
            .map(|a| a.iter().filter_map(|v| v.as_string()).collect())
            .unwrap_or_default(),
    })
}

fn probe_canvas(document: &web::Document) -> Probed<CanvasInfo> {
    let Some(canvas) = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlCanvasElement>().ok())
    else {
        return Probed::NotAvailable;
    };
    canvas.set_width(200);
    canvas.set_height(50);
    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|o| o.dyn_into::<web::CanvasRenderingContext2d>().ok())
    else {
        return Probed::NotAvailable;
    };
    ctx.set_font("18px Arial");
    if ctx.fill_text("Browser Info", 10.0, 30.0).is_err() {
        return Probed::NotAvailable;
    }
    Probed::Value(CanvasInfo {
        available: true,
        data_url: "Canvas data available (not shown for privacy)".to_string(),
    })
}

fn probe_timezone() -> Probed<String> {
    let options = js_sys::Intl::DateTimeFormat::new(&Array::new(), &Object::new()).resolved_options();
    get_string(options.as_ref(), "timeZone").into()
}

fn probe_speech(registry: &CapabilityRegistry) -> SpeechFlags {
    let synthesis = registry.in_window("speechSynthesis");
    let voices = if synthesis {
        registry
            .window_value("speechSynthesis")
            .and_then(|synth| {
                let f: Function = Reflect::get(&synth, &JsValue::from_str("getVoices"))
                    .ok()?
                    .dyn_into()
                    .ok()?;
                f.call0(&synth).ok()
            })
            .and_then(|arr| arr.dyn_into::<Array>().ok())
            .map(|a| a.length())
            .unwrap_or(0)
    } else {
        0
    };
    SpeechFlags {
        recognition: registry.in_window("SpeechRecognition")
            || registry.in_window("webkitSpeechRecognition"),
        synthesis,
        voices,
    }
}

fn probe_gamepads(window: &web::Window, registry: &CapabilityRegistry) -> GamepadInfo {
    let api = registry.in_navigator("getGamepads");
    let connected = if api {
        window
            .navigator()
            .get_gamepads()
            .map(|pads| {
                pads.iter()
                    .filter(|p| !p.is_null() && !p.is_undefined())
                    .count() as u32
            })
            .unwrap_or(0)
    } else {
        0
    };
    GamepadInfo { api, connected }
}

async fn probe_storage_estimate(
    window: &web::Window,
    registry: &CapabilityRegistry,
) -> (Probed<f64>, Probed<f64>) {
    if !registry.in_navigator("storage") {
        return (Probed::NotAvailable, Probed::NotAvailable);
    }
    let Ok(promise) = window.navigator().storage().estimate() else {
        return (Probed::NotAvailable, Probed::NotAvailable);
    };
    match JsFuture::from(promise).await {
        Ok(estimate) => (
            get_f64(&estimate, "quota").into(),
            get_f64(&estimate, "usage").into(),
        ),
        Err(err) => {
            log::warn!("storage estimate failed: {err:?}");
            (Probed::NotAvailable, Probed::NotAvailable)
        }
    }
}

async fn probe_persistence(
    window: &web::Window,
    registry: &CapabilityRegistry,
) -> Probed<bool> {
    if !registry.in_navigator("storage") {
        return Probed::NotAvailable;
    }
    let Ok(promise) = window.navigator().storage().persist() else {
        return Probed::NotAvailable;
    };
    match JsFuture::from(promise).await {
        Ok(granted) => granted.as_bool().into(),
        Err(err) => {
            log::warn!("persistence query failed: {err:?}");
            Probed::NotAvailable
        }
    }
}

// Unsupported platforms degrade to the same sentinel as every other probe.
async fn probe_battery(registry: &CapabilityRegistry) -> Probed<BatteryInfo> {
    let Some(promise) = registry
        .call_navigator0("getBattery")
        .and_then(|p| p.dyn_into::<Promise>().ok())
    else {
        return Probed::NotAvailable;
    };
    match JsFuture::from(promise).await {
        Ok(battery) => match (
            get_bool(&battery, "charging"),
            get_f64(&battery, "chargingTime"),
            get_f64(&battery, "dischargingTime"),
            get_f64(&battery, "level"),
        ) {
            (Some(charging), Some(charging_time), Some(discharging_time), Some(level)) => {
                Probed::Value(BatteryInfo {
                    charging,
                    charging_time_sec: charging_time,
                    discharging_time_sec: discharging_time,
                    level,
                })
            }
            _ => Probed::NotAvailable,
        },
        Err(err) => {
            log::warn!("battery query failed: {err:?}");
            Probed::NotAvailable
        }
    }
}
