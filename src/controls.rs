use crate::audio::MusicPlayer;
use crate::dom;
use crate::overlay;
use crate::state::AppState;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// User-facing actions shared by buttons and keyboard shortcuts.
#[derive(Clone)]
pub struct Controls {
    pub state: Rc<RefCell<AppState>>,
    pub player: Rc<MusicPlayer>,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
}

impl Controls {
    pub fn toggle_music(&self) {
        let playing = self.state.borrow_mut().toggle_music();
        self.player.set_playing(playing);
        overlay::set_music_playing(&self.document, playing);
        log::info!("[music] {}", if playing { "playing" } else { "paused" });
    }

    pub fn clear_photo(&self) {
        self.state.borrow_mut().clear_photo();
        overlay::set_has_photo(&self.document, false);
        overlay::set_status(&self.document, None);
    }

    pub fn regenerate(&self) {
        let result = self.state.borrow_mut().regenerate();
        match result {
            Ok(()) => {
                overlay::set_has_photo(&self.document, false);
                overlay::set_status(&self.document, None);
                log::info!("[field] regenerated");
            }
            Err(e) => log::error!("[field] regenerate failed: {}", e),
        }
    }

    pub fn toggle_fullscreen(&self) {
        dom::toggle_fullscreen(&self.canvas);
    }
}
