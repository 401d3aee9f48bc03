use crate::controls::Controls;
use crate::input::{action_for_key, KeyAction};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_global_keydown(ev: &web::KeyboardEvent, controls: &Controls) {
    // Leave typing in form fields alone
    if let Some(target) = ev.target() {
        if target.dyn_ref::<web::HtmlInputElement>().is_some() {
            return;
        }
    }
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    match action {
        KeyAction::ToggleMusic => {
            controls.toggle_music();
            ev.prevent_default();
        }
        KeyAction::ClearPhoto => controls.clear_photo(),
        KeyAction::Regenerate => controls.regenerate(),
        KeyAction::Fullscreen => {
            controls.toggle_fullscreen();
            ev.prevent_default();
        }
    }
}

pub fn wire_global_keydown(controls: Controls) {
    let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        handle_global_keydown(&ev, &controls);
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}
