pub mod backdrop;
pub mod colors;
pub mod constants;
pub mod error;
pub mod field;
pub mod sampler;
pub mod scene;

pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");

pub use backdrop::*;
pub use colors::*;
pub use constants::*;
pub use error::*;
pub use field::*;
pub use sampler::*;
pub use scene::*;
