//! DOM event wiring: the precise-location upgrade button, globe orbit
//! controls, and canvas resize.

use crate::frame::FrameContext;
use crate::{dom, overlay};
use app_core::{CameraOrbit, GLOBE_RADIUS};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

const ORBIT_RADIANS_PER_PX: f32 = 0.005;
const WHEEL_ZOOM_STEP: f32 = 0.001;

#[derive(Default)]
struct DragState {
    active: bool,
    last_x: f32,
    last_y: f32,
}

fn geolocation_sensor() -> Option<web::Geolocation> {
    web::window()?.navigator().geolocation().ok()
}

fn request_precise_fix(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let sensor = geolocation_sensor();
    if !frame_ctx
        .borrow_mut()
        .location
        .request_precise(sensor.is_some())
    {
        return;
    }
    let sensor = match sensor {
        Some(s) => s,
        None => return,
    };
    if let Some(document) = dom::window_document() {
        overlay::show_precise_loading(&document);
    }

    let ctx_ok = frame_ctx.clone();
    let on_success = Closure::wrap(Box::new(move |pos: web::Position| {
        let coords = pos.coords();
        let mut ctx = ctx_ok.borrow_mut();
        ctx.location
            .precise_succeeded(coords.latitude(), coords.longitude());
        if let Some(fix) = ctx.location.fix().cloned() {
            ctx.apply_fix(&fix);
            drop(ctx);
            if let Some(document) = dom::window_document() {
                overlay::show_precise(&document, &fix);
            }
        }
    }) as Box<dyn FnMut(web::Position)>);

    let ctx_err = frame_ctx.clone();
    let on_error = Closure::wrap(Box::new(move |err: web::PositionError| {
        log::error!("precise location failed: {} ({})", err.message(), err.code());
        ctx_err.borrow_mut().location.precise_failed();
        if let Some(document) = dom::window_document() {
            overlay::clear_precise_loading(&document);
        }
    }) as Box<dyn FnMut(web::PositionError)>);

    let options = web::PositionOptions::new();
    options.set_enable_high_accuracy(true);
    if let Err(e) = sensor.get_current_position_with_error_callback_and_options(
        on_success.as_ref().unchecked_ref(),
        Some(on_error.as_ref().unchecked_ref()),
        &options,
    ) {
        log::error!("geolocation request rejected: {:?}", e);
        frame_ctx.borrow_mut().location.precise_failed();
        if let Some(document) = dom::window_document() {
            overlay::clear_precise_loading(&document);
        }
    }
    on_success.forget();
    on_error.forget();
}

pub fn wire_precise_button(document: &web::Document, frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    dom::add_click_listener(document, overlay::PRECISE_BUTTON_ID, move || {
        request_precise_fix(frame_ctx.clone());
    });
}

/// Drag to orbit the camera around the globe, wheel to zoom. A drag takes
/// over from any camera flight still in progress.
pub fn wire_orbit_controls(
    canvas: &web::HtmlCanvasElement,
    frame_ctx: Rc<RefCell<FrameContext<'static>>>,
) {
    let drag_state = Rc::new(RefCell::new(DragState::default()));

    let canvas_down = canvas.clone();
    let ds_down = drag_state.clone();
    let on_down = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let mut ds = ds_down.borrow_mut();
        ds.active = true;
        ds.last_x = ev.client_x() as f32;
        ds.last_y = ev.client_y() as f32;
        _ = canvas_down.set_pointer_capture(ev.pointer_id());
        ev.prevent_default();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("pointerdown", on_down.as_ref().unchecked_ref());
    on_down.forget();

    let ds_move = drag_state.clone();
    let ctx_move = frame_ctx.clone();
    let on_move = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        let (dx, dy) = {
            let mut ds = ds_move.borrow_mut();
            if !ds.active {
                return;
            }
            let x = ev.client_x() as f32;
            let y = ev.client_y() as f32;
            let delta = (x - ds.last_x, y - ds.last_y);
            ds.last_x = x;
            ds.last_y = y;
            delta
        };
        let mut ctx = ctx_move.borrow_mut();
        ctx.flight = None;
        let mut orbit = CameraOrbit::from_eye(ctx.cam_eye);
        orbit.rotate(-dx * ORBIT_RADIANS_PER_PX, dy * ORBIT_RADIANS_PER_PX);
        ctx.cam_eye = orbit.eye();
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref());
    }
    on_move.forget();

    let ds_up = drag_state.clone();
    let on_up = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
        ds_up.borrow_mut().active = false;
    }) as Box<dyn FnMut(_)>);
    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref());
    }
    on_up.forget();

    let ctx_wheel = frame_ctx.clone();
    let on_wheel = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        ev.prevent_default();
        let factor = (1.0 + ev.delta_y() as f32 * WHEEL_ZOOM_STEP).clamp(0.5, 2.0);
        let mut ctx = ctx_wheel.borrow_mut();
        ctx.flight = None;
        let mut orbit = CameraOrbit::from_eye(ctx.cam_eye);
        orbit.zoom(factor, GLOBE_RADIUS);
        ctx.cam_eye = orbit.eye();
    }) as Box<dyn FnMut(_)>);
    _ = canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref());
    on_wheel.forget();
}

pub fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    let canvas = canvas.clone();
    dom::add_window_listener("resize", move || {
        dom::sync_canvas_backing_size(&canvas);
    });
}
