use crate::render;
use app_core::{
    marker_transform, CameraFlight, GeoFix, LocationState, MarkerPulse, CAMERA_DISTANCE_FACTOR,
    GLOBE_RADIUS, MARKER_RADIUS_FACTOR,
};
use glam::{Mat4, Vec3};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub location: LocationState,
    pub pulse: MarkerPulse,
    pub flight: Option<CameraFlight>,
    pub cam_eye: Vec3,
    pub marker_base: Option<Mat4>,

    pub last_instant: Instant,
}

impl<'a> FrameContext<'a> {
    pub fn new(canvas: web::HtmlCanvasElement, gpu: Option<render::GpuState<'a>>) -> Self {
        Self {
            canvas,
            gpu,
            location: LocationState::default(),
            pulse: MarkerPulse::default(),
            flight: None,
            cam_eye: Vec3::new(0.0, 0.0, GLOBE_RADIUS * CAMERA_DISTANCE_FACTOR),
            marker_base: None,
            last_instant: Instant::now(),
        }
    }

    /// Coordinate update entry point. Re-projects the marker from the fix
    /// and replaces any camera flight still in progress. Callers drive the
    /// [`LocationState`] transition separately, before calling this.
    pub fn apply_fix(&mut self, fix: &GeoFix) {
        let base = marker_transform(fix.lat as f32, fix.long as f32, GLOBE_RADIUS);
        self.marker_base = Some(base);
        let marker_pos = base.transform_point3(Vec3::ZERO);
        self.flight = Some(CameraFlight::toward_marker(
            self.cam_eye,
            marker_pos,
            GLOBE_RADIUS,
        ));
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_ms = (now - self.last_instant).as_secs_f32() * 1000.0;
        self.last_instant = now;

        self.pulse.step();
        let mut arrived = false;
        if let Some(flight) = self.flight.as_mut() {
            self.cam_eye = flight.step(dt_ms);
            arrived = flight.finished();
        }
        if arrived {
            self.flight = None;
        }

        if let Some(g) = &mut self.gpu {
            g.set_camera(self.cam_eye);
            if let Some(base) = self.marker_base {
                let scale = MARKER_RADIUS_FACTOR * self.pulse.scale();
                g.set_marker(base * Mat4::from_scale(Vec3::splat(scale)));
            }
            g.resize_if_needed(self.canvas.width(), self.canvas.height());
            if let Err(e) = g.render() {
                log::error!("render error: {:?}", e);
            }
        }
    }
}

pub async fn init_gpu(canvas: &web::HtmlCanvasElement) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            let _ = w.request_animation_frame(
                tick_clone
                    .borrow()
                    .as_ref()
                    .unwrap()
                    .as_ref()
                    .unchecked_ref(),
            );
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        let _ = w.request_animation_frame(tick.borrow().as_ref().unwrap().as_ref().unchecked_ref());
    }
}
