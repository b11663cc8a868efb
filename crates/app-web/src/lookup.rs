//! Startup IP-geolocation lookup against the server's `/api/ip` proxy.

use crate::frame::FrameContext;
use crate::{dom, overlay};
use app_core::{GeoFix, LookupResponse};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

async fn fetch_lookup() -> Result<LookupResponse, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let resp_value = JsFuture::from(window.fetch_with_str("/api/ip")).await?;
    let resp: web::Response = resp_value.dyn_into()?;
    if !resp.ok() {
        return Err(JsValue::from_str(&format!(
            "lookup returned status {}",
            resp.status()
        )));
    }
    let text = JsFuture::from(resp.text()?)
        .await?
        .as_string()
        .ok_or_else(|| JsValue::from_str("lookup body not text"))?;
    serde_json::from_str(&text).map_err(|e| JsValue::from_str(&format!("lookup parse: {e}")))
}

/// Resolve the visitor's approximate position once at startup. Failure is
/// logged and leaves the globe idle with no marker.
pub async fn run(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let response = match fetch_lookup().await {
        Ok(r) => r,
        Err(e) => {
            log::error!("ip lookup failed: {:?}", e);
            return;
        }
    };
    let fix = match GeoFix::from_lookup(&response) {
        Ok(f) => f,
        Err(e) => {
            log::error!("ip lookup rejected: {e}");
            return;
        }
    };
    let mut ctx = frame_ctx.borrow_mut();
    ctx.location.lookup_succeeded(fix.clone());
    ctx.apply_fix(&fix);
    drop(ctx);
    if let Some(document) = dom::window_document() {
        overlay::show_approximate(&document, &fix);
    }
}
