//! Scene motion and camera state shared with the front-end.
//!
//! These types avoid platform APIs so they can be exercised on the host. The
//! web renderer turns them into uniforms each frame.

use crate::constants::*;
use glam::{Mat4, Vec3};
use std::f32::consts::TAU;

/// World-space offset of the tree group (base sits below the orbit target).
#[inline]
pub fn tree_group_offset() -> Vec3 {
    Vec3::from(TREE_BASE_OFFSET)
}

/// Breathing scale of the tree at time `t` seconds.
#[inline]
pub fn pulse_scale(t: f32) -> f32 {
    1.0 + (t * TREE_PULSE_RATE).sin() * TREE_PULSE_AMPLITUDE
}

/// Model matrix for the tree particles at time `t` seconds: slow spin about
/// the trunk plus a small breathing pulse, inside the tree group offset.
pub fn tree_transform(t: f32) -> Mat4 {
    Mat4::from_translation(tree_group_offset())
        * Mat4::from_rotation_y(t * TREE_SPIN_RAD_PER_SEC)
        * Mat4::from_scale(Vec3::splat(pulse_scale(t)))
}

/// Topper position in tree-group space. The star does not spin or pulse.
#[inline]
pub fn star_position(tree_height: f32) -> Vec3 {
    Vec3::new(0.0, tree_height + STAR_LIFT, 0.0)
}

/// Model matrix for the floor disc: a unit disc in the XZ plane scaled to
/// the floor radius, just under the tree base. It shares the group offset
/// but neither spins nor pulses.
pub fn floor_transform() -> Mat4 {
    Mat4::from_translation(tree_group_offset() + Vec3::new(0.0, FLOOR_HEIGHT, 0.0))
        * Mat4::from_scale(Vec3::new(FLOOR_RADIUS, 1.0, FLOOR_RADIUS))
}

/// Orbit camera around a fixed target: drag rotates, wheel zooms, no pan.
///
/// Angles follow the usual spherical convention: `polar` is measured from +Y,
/// `azimuth` around Y starting at +Z.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub azimuth: f32,
    pub polar: f32,
    pub distance: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye(Vec3::from(CAMERA_START_EYE), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let mut cam = Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        };
        cam.rotate(0.0, 0.0);
        cam.zoom(1.0);
        cam
    }

    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(TAU);
        self.polar = (self.polar + d_polar).clamp(ORBIT_MIN_POLAR, ORBIT_MAX_POLAR);
    }

    /// Multiply the orbit distance by `factor` (< 1 moves closer).
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        }
    }

    /// Step time forward; while music plays the camera drifts around the tree.
    pub fn advance(&mut self, dt_sec: f32, auto_rotate: bool) {
        if auto_rotate && dt_sec > 0.0 {
            self.rotate(-auto_rotate_rate() * dt_sec, 0.0);
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, aspect.max(1e-3), self.znear, self.zfar)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Auto-rotate angular speed in rad/s.
#[inline]
pub fn auto_rotate_rate() -> f32 {
    TAU / 60.0 * AUTO_ROTATE_SPEED
}
