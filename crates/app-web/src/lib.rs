#![cfg(target_arch = "wasm32")]

pub mod dom;
pub mod events;
pub mod frame;
pub mod identity;
pub mod lookup;
pub mod overlay;
pub mod panel;
pub mod probe;
pub mod render;

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const EARTH_TEXTURE_URL: &str = "/earth.jpg";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("app-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    dom::sync_canvas_backing_size(&canvas);
    events::wire_canvas_resize(&canvas);

    identity::install(&document);
    overlay::show_searching(&document);

    // Capability probe first; it reads browser surface only and the panel is
    // useful even if rendering or the lookup fail below.
    let snapshot = probe::collect().await;
    panel::render(&document, &snapshot);

    let gpu = frame::init_gpu(&canvas).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(canvas, gpu)));
    frame::start_loop(frame_ctx.clone());

    // Earth texture arrives whenever it arrives; the fallback renders until.
    {
        let ctx = frame_ctx.clone();
        spawn_local(async move {
            if let Some((pixels, w, h)) = render::load_earth_texture(EARTH_TEXTURE_URL).await {
                if let Some(g) = ctx.borrow_mut().gpu.as_mut() {
                    g.set_earth_texture(&pixels, w, h);
                }
            }
        });
    }

    events::wire_orbit_controls(&canvas, frame_ctx.clone());
    events::wire_precise_button(&document, frame_ctx.clone());
    lookup::run(frame_ctx).await;
    Ok(())
}
