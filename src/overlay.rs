use crate::constants::{MUSIC_TOGGLE_ID, PHOTO_LABEL_ID, REMOVE_PHOTO_ID, STATUS_ID};
use web_sys as web;

#[inline]
fn set_hidden(document: &web::Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        if hidden {
            _ = cl.add_1("hidden");
            // fallback for environments without CSS class
            _ = el.set_attribute("style", "display:none");
        } else {
            _ = cl.remove_1("hidden");
            _ = el.set_attribute("style", "");
        }
    }
}

/// Switch the upload card between "Upload Photo" and "Change / Remove".
pub fn set_has_photo(document: &web::Document, has_photo: bool) {
    set_hidden(document, REMOVE_PHOTO_ID, !has_photo);
    if let Some(el) = document.get_element_by_id(PHOTO_LABEL_ID) {
        el.set_text_content(Some(if has_photo { "Change" } else { "Upload Photo" }));
    }
}

pub fn set_music_playing(document: &web::Document, playing: bool) {
    if let Some(el) = document.get_element_by_id(MUSIC_TOGGLE_ID) {
        let cl = el.class_list();
        _ = if playing {
            cl.add_1("playing")
        } else {
            cl.remove_1("playing")
        };
        _ = el.set_attribute("aria-pressed", if playing { "true" } else { "false" });
    }
}

/// Show a short status line; `None` hides it.
pub fn set_status(document: &web::Document, message: Option<&str>) {
    if let Some(el) = document.get_element_by_id(STATUS_ID) {
        el.set_text_content(message);
    }
    set_hidden(document, STATUS_ID, message.is_none());
}
