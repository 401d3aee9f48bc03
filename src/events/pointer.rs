use crate::input::{self, DragState};
use crate::state::AppState;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone)]
pub struct InputWiring {
    pub canvas: web::HtmlCanvasElement,
    pub state: Rc<RefCell<AppState>>,
    pub drag: Rc<RefCell<DragState>>,
}

#[inline]
fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width().max(1.0) as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height().max(1.0) as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

pub fn wire_input_handlers(w: InputWiring) {
    wire_pointerdown(&w);
    wire_pointermove(&w);
    wire_pointerup(&w);
    wire_wheel(&w);
}

fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
    canvas: &web::HtmlCanvasElement,
    event: &str,
    handler: impl FnMut(E) + 'static,
) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

fn wire_pointerdown(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "pointerdown", move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &w.canvas);
        w.drag.borrow_mut().begin(ev.pointer_id(), pos);
        _ = w.canvas.set_pointer_capture(ev.pointer_id());
    });
}

fn wire_pointermove(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "pointermove", move |ev: web::PointerEvent| {
        let pos = pointer_canvas_px(&ev, &w.canvas);
        let delta = w.drag.borrow_mut().update(ev.pointer_id(), pos);
        if let Some(delta) = delta {
            let (d_az, d_polar) = input::orbit_delta(delta, w.canvas.height() as f32);
            w.state.borrow_mut().camera.rotate(d_az, d_polar);
        }
    });
}

fn wire_pointerup(w: &InputWiring) {
    for event in ["pointerup", "pointercancel"] {
        let w = w.clone();
        let canvas = w.canvas.clone();
        listen(&canvas, event, move |ev: web::PointerEvent| {
            w.drag.borrow_mut().end(ev.pointer_id());
            _ = w.canvas.release_pointer_capture(ev.pointer_id());
        });
    }
}

fn wire_wheel(w: &InputWiring) {
    let w = w.clone();
    let canvas = w.canvas.clone();
    listen(&canvas, "wheel", move |ev: web::WheelEvent| {
        ev.prevent_default();
        let factor = input::wheel_zoom_factor(ev.delta_y());
        w.state.borrow_mut().camera.zoom(factor);
    });
}
