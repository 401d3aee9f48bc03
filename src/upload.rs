use crate::constants::{PHOTO_INPUT_ID, REMOVE_PHOTO_ID};
use crate::controls::Controls;
use crate::dom;
use crate::overlay;
use tree_core::UploadOutcome;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

async fn read_file_bytes(file: &web::File) -> anyhow::Result<Vec<u8>> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| anyhow::anyhow!("file read error: {:?}", e))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Read, decode and sample one selected photo.
///
/// The ticket is taken before the asynchronous read so that a selection made
/// later, or a Remove click, wins over this one if it finishes first.
fn handle_selection(controls: &Controls, file: web::File) {
    let ticket = controls.state.borrow_mut().begin_photo();
    overlay::set_status(&controls.document, Some("Loading photo…"));
    let controls = controls.clone();
    spawn_local(async move {
        let bytes = match read_file_bytes(&file).await {
            Ok(b) => b,
            Err(e) => {
                log::error!("[upload] {}: {:?}", file.name(), e);
                let (current, pending) = {
                    let mut state = controls.state.borrow_mut();
                    let current = state.abandon_photo(ticket);
                    (current, state.photo_pending())
                };
                if !pending {
                    let message = current.then_some("Could not read that file.");
                    overlay::set_status(&controls.document, message);
                }
                return;
            }
        };
        let (outcome, pending) = {
            let mut state = controls.state.borrow_mut();
            let outcome = state.apply_photo(ticket, &bytes);
            (outcome, state.photo_pending())
        };
        // A newer selection still loading owns the status line
        match outcome {
            Ok(UploadOutcome::Applied) => {
                log::info!("[upload] applied {} ({} bytes)", file.name(), bytes.len());
                overlay::set_has_photo(&controls.document, true);
                if !pending {
                    overlay::set_status(&controls.document, None);
                }
            }
            Ok(UploadOutcome::Stale) => {
                log::debug!("[upload] {} superseded", file.name());
                if !pending {
                    overlay::set_status(&controls.document, None);
                }
            }
            Err(e) => {
                log::error!("[upload] {}: {}", file.name(), e);
                let has_photo = controls.state.borrow().has_photo();
                overlay::set_has_photo(&controls.document, has_photo);
                if !pending {
                    overlay::set_status(
                        &controls.document,
                        Some("That image could not be decoded. Colors left unchanged."),
                    );
                }
            }
        }
    });
}

pub fn wire_photo_controls(controls: &Controls) {
    let Some(input) = controls
        .document
        .get_element_by_id(PHOTO_INPUT_ID)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    else {
        log::warn!("missing #{}; photo upload disabled", PHOTO_INPUT_ID);
        return;
    };

    let controls_change = controls.clone();
    let input_change = input.clone();
    let closure = Closure::wrap(Box::new(move |_ev: web::Event| {
        let file = input_change.files().and_then(|list| list.get(0));
        // Reset so picking the same file again still fires `change`
        input_change.set_value("");
        if let Some(file) = file {
            handle_selection(&controls_change, file);
        }
    }) as Box<dyn FnMut(_)>);
    _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
    closure.forget();

    let controls_remove = controls.clone();
    dom::add_click_listener(&controls.document, REMOVE_PHOTO_ID, move || {
        controls_remove.clear_photo();
    });
}
