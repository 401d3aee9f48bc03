use crate::constants::{ORBIT_TURNS_PER_HEIGHT, WHEEL_ZOOM_STEP};
use glam::Vec2;

/// Pointer drag in canvas pixels.
#[derive(Default, Clone, Copy, Debug)]
pub struct DragState {
    pub active: bool,
    pub pointer_id: i32,
    pub last: Vec2,
}

impl DragState {
    pub fn begin(&mut self, pointer_id: i32, pos: Vec2) {
        self.active = true;
        self.pointer_id = pointer_id;
        self.last = pos;
    }

    /// Movement since the previous sample, if this pointer is dragging.
    pub fn update(&mut self, pointer_id: i32, pos: Vec2) -> Option<Vec2> {
        if !self.active || pointer_id != self.pointer_id {
            return None;
        }
        let delta = pos - self.last;
        self.last = pos;
        Some(delta)
    }

    pub fn end(&mut self, pointer_id: i32) {
        if pointer_id == self.pointer_id {
            self.active = false;
        }
    }
}

/// Map a drag delta to `(d_azimuth, d_polar)` radians. Dragging right spins
/// the camera to the left of the tree; dragging down raises it.
#[inline]
pub fn orbit_delta(delta_px: Vec2, canvas_height: f32) -> (f32, f32) {
    let h = canvas_height.max(1.0);
    let k = std::f32::consts::TAU * ORBIT_TURNS_PER_HEIGHT / h;
    (-delta_px.x * k, -delta_px.y * k)
}

/// Distance multiplier for one wheel event. Scrolling down moves away.
#[inline]
pub fn wheel_zoom_factor(delta_y: f64) -> f32 {
    if delta_y > 0.0 {
        1.0 / WHEEL_ZOOM_STEP
    } else if delta_y < 0.0 {
        WHEEL_ZOOM_STEP
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleMusic,
    ClearPhoto,
    Regenerate,
    Fullscreen,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "m" | "M" => Some(KeyAction::ToggleMusic),
        "x" | "X" => Some(KeyAction::ClearPhoto),
        "r" | "R" => Some(KeyAction::Regenerate),
        "Enter" => Some(KeyAction::Fullscreen),
        _ => None,
    }
}
