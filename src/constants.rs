// Front-end tuning constants.
//
// Shape and palette defaults live in `tree_core::constants`; these cover
// what only the browser side cares about (DOM ids, sprite sizes, input
// sensitivity).

// DOM element ids (see index.html)
pub const CANVAS_ID: &str = "app-canvas";
pub const PHOTO_INPUT_ID: &str = "photo-input";
pub const PHOTO_LABEL_ID: &str = "photo-label";
pub const REMOVE_PHOTO_ID: &str = "remove-photo";
pub const MUSIC_TOGGLE_ID: &str = "music-toggle";
pub const STATUS_ID: &str = "status";

pub const MUSIC_URL: &str = "https://actions.google.com/sounds/v1/holidays/jingle_bells.ogg";

// Sprite world sizes
pub const TREE_POINT_SIZE: f32 = 0.08;
pub const STAR_POINT_SIZE: f32 = 0.6;
pub const SPARKLE_POINT_SIZE: f32 = 0.12;
pub const STARFIELD_POINT_SIZE: f32 = 0.5;

// Additive blend weights
pub const TREE_OPACITY: f32 = 0.9;
pub const SPARKLE_OPACITY: f32 = 0.5;
// Alpha of the black floor disc (alpha blended, not additive)
pub const FLOOR_OPACITY: f32 = 0.5;

// Background (#050b14)
pub const CLEAR_COLOR: [f64; 3] = [0.020, 0.043, 0.078];

// Pointer orbit: a drag across the full canvas height is one full turn
pub const ORBIT_TURNS_PER_HEIGHT: f32 = 1.0;
// Wheel dolly factor per notch
pub const WHEEL_ZOOM_STEP: f32 = 0.95;
