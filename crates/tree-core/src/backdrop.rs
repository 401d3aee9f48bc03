//! Ambient points around the tree: a distant starfield and a few gold
//! sparkles floating near it.

use crate::colors::ColorBuffer;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Loose set of colored points with no surface mapping.
#[derive(Clone, Debug, Default)]
pub struct PointSet {
    pub positions: Vec<Vec3>,
    pub colors: ColorBuffer,
}

impl PointSet {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Unit vector uniformly distributed on the sphere.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let phi = rng.gen_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * phi.cos(), z, r * phi.sin())
}

/// Stars in a spherical shell between `radius` and `radius + depth`.
pub fn starfield<R: Rng + ?Sized>(count: usize, radius: f32, depth: f32, rng: &mut R) -> PointSet {
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        let d = radius + rng.gen::<f32>() * depth.max(0.0);
        positions.push(random_direction(rng) * d);
        let level = rng.gen_range(0.6..1.0);
        colors.push([level; 3]);
    }
    PointSet {
        positions,
        colors: ColorBuffer::new(colors),
    }
}

/// Points in an axis-aligned cube of side `extent` centred on the origin.
pub fn sparkles<R: Rng + ?Sized>(
    count: usize,
    extent: f32,
    color: [f32; 3],
    rng: &mut R,
) -> PointSet {
    let half = extent.abs() * 0.5;
    let mut coord = || {
        if half > 0.0 {
            rng.gen_range(-half..half)
        } else {
            0.0
        }
    };
    let positions = (0..count)
        .map(|_| Vec3::new(coord(), coord(), coord()))
        .collect();
    PointSet {
        positions,
        colors: ColorBuffer::new(vec![color; count]),
    }
}
