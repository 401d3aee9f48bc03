//! Procedural particle tree.
//!
//! Particles are scattered through a spiral-banded cone shell. Every particle
//! also gets a surface coordinate `(u, v)` on the cone's unwrapped lateral
//! surface; that coordinate is the only link between the 3D layout and photo
//! sampling, so it is fixed at generation time alongside the position.

use crate::colors::ColorBuffer;
use crate::constants::*;
use crate::error::TreeError;
use glam::{Vec2, Vec3};
use rand::prelude::*;
use std::f32::consts::TAU;

/// Default coloring used when no photo is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    /// Gradient endpoints; each particle picks a random point between them.
    pub foliage: [[f32; 3]; 2],
    /// Accent colors, chosen uniformly for ornament particles.
    pub ornaments: Vec<[f32; 3]>,
    pub ornament_probability: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foliage: [FOLIAGE_DARK, FOLIAGE_BRIGHT],
            ornaments: vec![ORNAMENT_GOLD, ORNAMENT_RED],
            ornament_probability: ORNAMENT_PROBABILITY,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub count: usize,
    pub height: f32,
    pub base_radius: f32,
    pub spiral_turns: f32,
    pub height_bias_exponent: f32,
    pub shell_thickness: f32,
    pub palette: Palette,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            height: DEFAULT_TREE_HEIGHT,
            base_radius: DEFAULT_BASE_RADIUS,
            spiral_turns: DEFAULT_SPIRAL_TURNS,
            height_bias_exponent: HEIGHT_BIAS_EXPONENT,
            shell_thickness: SHELL_THICKNESS,
            palette: Palette::default(),
        }
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), TreeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TreeError::InvalidConfig(format!(
            "{name} must be a positive finite number, got {value}"
        )))
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.count == 0 {
            return Err(TreeError::InvalidConfig(
                "count must be greater than zero".to_string(),
            ));
        }
        require_positive("height", self.height)?;
        require_positive("base_radius", self.base_radius)?;
        require_positive("spiral_turns", self.spiral_turns)?;
        require_positive("height_bias_exponent", self.height_bias_exponent)?;
        if !(self.shell_thickness.is_finite() && self.shell_thickness >= 0.0) {
            return Err(TreeError::InvalidConfig(format!(
                "shell_thickness must be zero or positive, got {}",
                self.shell_thickness
            )));
        }
        let p = self.palette.ornament_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(TreeError::InvalidConfig(format!(
                "ornament_probability must be within [0, 1], got {p}"
            )));
        }
        if p > 0.0 && self.palette.ornaments.is_empty() {
            return Err(TreeError::InvalidConfig(
                "ornament_probability is positive but no ornament colors are configured"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Immutable point cloud produced by [`generate_field`].
///
/// `positions`, `surface_coords` and `default_colors` are index-aligned and
/// always hold the same number of entries.
#[derive(Clone, Debug)]
pub struct ParticleField {
    positions: Vec<Vec3>,
    surface_coords: Vec<Vec2>,
    default_colors: ColorBuffer,
    height: f32,
}

impl ParticleField {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Tree height the field was generated with.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions as `x, y, z, x, y, z, ...` for vertex upload.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn surface_coords(&self) -> &[Vec2] {
        &self.surface_coords
    }

    pub fn default_colors(&self) -> &ColorBuffer {
        &self.default_colors
    }
}

/// Generate a tree with the thread-local RNG. Results differ run to run.
pub fn generate_field(config: &FieldConfig) -> Result<ParticleField, TreeError> {
    generate_field_with_rng(config, &mut thread_rng())
}

pub fn generate_field_with_rng<R: Rng + ?Sized>(
    config: &FieldConfig,
    rng: &mut R,
) -> Result<ParticleField, TreeError> {
    config.validate()?;

    let n = config.count;
    let mut positions = Vec::with_capacity(n);
    let mut surface_coords = Vec::with_capacity(n);
    let mut colors = Vec::with_capacity(n);

    for _ in 0..n {
        // (0, 1] rather than [0, 1) keeps v strictly below 1
        let r = 1.0 - rng.gen::<f32>();
        let y_norm = 1.0 - r.powf(config.height_bias_exponent);
        let y = y_norm * config.height;

        let cone_r = (1.0 - y_norm) * config.base_radius;
        let angle = y_norm * TAU * config.spiral_turns + rng.gen_range(0.0..TAU);
        let thickness = if config.shell_thickness > 0.0 {
            rng.gen_range(0.0..config.shell_thickness)
        } else {
            0.0
        };
        let final_r = cone_r - thickness;

        positions.push(Vec3::new(angle.cos() * final_r, y, angle.sin() * final_r));
        surface_coords.push(Vec2::new(wrap_unit(angle / TAU), y_norm));
        colors.push(default_color(&config.palette, rng));
    }

    log::debug!(
        "[field] generated {} particles (height={:.2} radius={:.2} turns={:.1})",
        n,
        config.height,
        config.base_radius,
        config.spiral_turns
    );

    Ok(ParticleField {
        positions,
        surface_coords,
        default_colors: ColorBuffer::new(colors),
        height: config.height,
    })
}

/// Fractional part in [0, 1), guarding the rounding case that lands on 1.0.
#[inline]
fn wrap_unit(x: f32) -> f32 {
    let u = x.rem_euclid(1.0);
    if u >= 1.0 {
        0.0
    } else {
        u
    }
}

fn default_color<R: Rng + ?Sized>(palette: &Palette, rng: &mut R) -> [f32; 3] {
    let t = rng.gen::<f32>();
    let [a, b] = palette.foliage;
    let foliage = Vec3::from(a).lerp(Vec3::from(b), t).to_array();
    if rng.gen::<f32>() < palette.ornament_probability {
        if let Some(accent) = palette.ornaments.choose(rng) {
            return *accent;
        }
    }
    foliage
}
