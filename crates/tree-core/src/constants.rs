// Visual design constants shared by the generator, sampler and front-end.
// Config structs take their `Default` values from here.

// Tree shape
pub const DEFAULT_PARTICLE_COUNT: usize = 4000;
pub const DEFAULT_TREE_HEIGHT: f32 = 6.0;
pub const DEFAULT_BASE_RADIUS: f32 = 2.5;
pub const DEFAULT_SPIRAL_TURNS: f32 = 8.0; // wraps of the spiral band from base to apex
pub const HEIGHT_BIAS_EXPONENT: f32 = 0.8; // < 1 packs particles toward the base
pub const SHELL_THICKNESS: f32 = 0.3; // max inward scatter from the cone surface

// Default palette (sRGB, 0..1)
pub const FOLIAGE_DARK: [f32; 3] = [0.063, 0.369, 0.149]; // #105e26
pub const FOLIAGE_BRIGHT: [f32; 3] = [0.220, 0.690, 0.0]; // #38b000
pub const ORNAMENT_GOLD: [f32; 3] = [1.0, 0.843, 0.0]; // #ffd700
pub const ORNAMENT_RED: [f32; 3] = [1.0, 0.0, 0.0]; // #ff0000
pub const ORNAMENT_PROBABILITY: f32 = 0.08;

// Photo sampling
pub const SAMPLE_GRID_SIZE: u32 = 128; // square grid every upload is resized to

// Scene layout
pub const TREE_BASE_OFFSET: [f32; 3] = [0.0, -2.5, 0.0]; // world-space offset of the tree group
pub const TREE_SPIN_RAD_PER_SEC: f32 = 0.1;
pub const TREE_PULSE_AMPLITUDE: f32 = 0.01;
pub const TREE_PULSE_RATE: f32 = 2.0; // rad/s of the breathing pulse
pub const STAR_LIFT: f32 = 0.1; // topper height above the apex
pub const STAR_COLOR: [f32; 3] = [1.0, 1.0, 0.667]; // #ffffaa

// Camera
pub const CAMERA_START_EYE: [f32; 3] = [0.0, 2.0, 8.0];
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 400.0;
pub const ORBIT_MIN_POLAR: f32 = std::f32::consts::FRAC_PI_4;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI / 1.8;
pub const ORBIT_MIN_DISTANCE: f32 = 4.0;
pub const ORBIT_MAX_DISTANCE: f32 = 15.0;
pub const AUTO_ROTATE_SPEED: f32 = 0.5; // 1.0 == one full orbit per minute

// Backdrop
pub const STARFIELD_COUNT: usize = 5000;
pub const STARFIELD_RADIUS: f32 = 100.0;
pub const STARFIELD_DEPTH: f32 = 50.0;
pub const SPARKLE_COUNT: usize = 50;
pub const SPARKLE_EXTENT: f32 = 8.0;
pub const SPARKLE_COLOR: [f32; 3] = ORNAMENT_GOLD;
pub const STARFIELD_TWINKLE_SPEED: f32 = 1.0; // rad/s of each star's size/brightness cycle
pub const STARFIELD_TWINKLE_DEPTH: f32 = 0.25; // fraction of size lost at the dim end
pub const SPARKLE_DRIFT_SPEED: f32 = 0.4; // rad/s of the wander cycle
pub const SPARKLE_DRIFT_AMPLITUDE: f32 = 0.2; // max wander from the spawn point

// Dark disc under the tree, in tree-group space
pub const FLOOR_RADIUS: f32 = 4.0;
pub const FLOOR_HEIGHT: f32 = -0.1;
