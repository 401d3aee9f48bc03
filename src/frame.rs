use crate::render;
use crate::state::AppState;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tree_core::tree_transform;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext<'a> {
    pub state: Rc<RefCell<AppState>>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,

    pub start_instant: Instant,
    pub last_instant: Instant,
    // What the GPU currently holds
    pub uploaded_field_revision: u64,
    pub uploaded_colors_revision: u64,
}

impl<'a> FrameContext<'a> {
    pub fn new(
        state: Rc<RefCell<AppState>>,
        canvas: web::HtmlCanvasElement,
        gpu: Option<render::GpuState<'a>>,
    ) -> Self {
        let (field_rev, colors_rev) = {
            let s = state.borrow();
            (s.field_revision, s.colors.revision())
        };
        let now = Instant::now();
        Self {
            state,
            canvas,
            gpu,
            start_instant: now,
            last_instant: now,
            uploaded_field_revision: field_rev,
            uploaded_colors_revision: colors_rev,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant).as_secs_f32();
        self.last_instant = now;
        let t = (now - self.start_instant).as_secs_f32();

        let mut state = self.state.borrow_mut();
        let playing = state.music_playing;
        state.camera.advance(dt_sec, playing);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        gpu.resize_if_needed(self.canvas.width(), self.canvas.height());

        if state.field_revision != self.uploaded_field_revision {
            gpu.upload_points(&state.scene_points());
            self.uploaded_field_revision = state.field_revision;
            self.uploaded_colors_revision = state.colors.revision();
        } else if state.colors.revision() != self.uploaded_colors_revision {
            gpu.upload_tree_colors(state.colors.active());
            self.uploaded_colors_revision = state.colors.revision();
        }

        match gpu.render(&state.camera, tree_transform(t), t) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    state: &Rc<RefCell<AppState>>,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    let points = state.borrow().scene_points();
    match render::GpuState::new(leaked_canvas, &points).await {
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
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
