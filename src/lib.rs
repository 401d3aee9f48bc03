#![cfg(target_arch = "wasm32")]
use crate::constants::{CANVAS_ID, MUSIC_TOGGLE_ID, MUSIC_URL};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use tree_core::FieldConfig;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod audio;
mod constants;
mod controls;
mod dom;
mod events;
mod frame;
mod input;
mod overlay;
mod render;
mod state;
mod upload;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

fn wire_overlay_buttons(controls: &controls::Controls) {
    let controls_music = controls.clone();
    dom::add_click_listener(&controls.document, MUSIC_TOGGLE_ID, move || {
        controls_music.toggle_music();
    });
    upload::wire_photo_controls(controls);
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tree-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let state = Rc::new(RefCell::new(state::AppState::new(FieldConfig::default())?));
    {
        let s = state.borrow();
        log::info!(
            "[field] particles={} height={:.1} radius={:.1} turns={:.0}",
            s.field.len(),
            s.config.height,
            s.config.base_radius,
            s.config.spiral_turns
        );
    }

    let controls = controls::Controls {
        state: state.clone(),
        player: Rc::new(audio::MusicPlayer::new(MUSIC_URL)?),
        document: document.clone(),
        canvas: canvas.clone(),
    };
    overlay::set_has_photo(&document, false);
    overlay::set_music_playing(&document, false);
    overlay::set_status(&document, None);

    wire_overlay_buttons(&controls);
    events::wire_global_keydown(controls.clone());
    events::wire_input_handlers(events::pointer::InputWiring {
        canvas: canvas.clone(),
        state: state.clone(),
        drag: Rc::new(RefCell::new(input::DragState::default())),
    });

    let gpu = frame::init_gpu(&canvas, &state).await;
    if gpu.is_none() {
        overlay::set_status(&document, Some("WebGPU is not available in this browser."));
    }
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        state.clone(),
        canvas.clone(),
        gpu,
    )));
    frame::start_loop(frame_ctx);

    Ok(())
}
