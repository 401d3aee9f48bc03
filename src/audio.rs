use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// Looping background track behind the music toggle.
pub struct MusicPlayer {
    element: web::HtmlAudioElement,
}

impl MusicPlayer {
    pub fn new(src: &str) -> anyhow::Result<Self> {
        let element = web::HtmlAudioElement::new_with_src(src)
            .map_err(|e| anyhow::anyhow!("audio element error: {:?}", e))?;
        element.set_loop(true);
        element.set_preload("auto");
        Ok(Self { element })
    }

    pub fn play(&self) {
        match self.element.play() {
            Ok(promise) => spawn_local(async move {
                // Browsers reject play() without a user gesture
                if let Err(e) = JsFuture::from(promise).await {
                    log::info!("Autoplay blocked: {:?}", e);
                }
            }),
            Err(e) => log::error!("audio play error: {:?}", e),
        }
    }

    pub fn pause(&self) {
        if let Err(e) = self.element.pause() {
            log::error!("audio pause error: {:?}", e);
        }
    }

    pub fn set_playing(&self, playing: bool) {
        if playing {
            self.play();
        } else {
            self.pause();
        }
    }
}
