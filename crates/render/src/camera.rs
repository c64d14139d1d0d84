use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI, TAU};

use ghostmaze_common::{mat4_rotate_x, mat4_rotate_y, mat4_rotate_z, mat4_translate};

use crate::config::RenderConfig;

/// Third-person camera orbiting above the player.
///
/// `yaw` stays in `[0, 2π)`; `pitch` is clamped to `[−π/2, π/2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub eye: Vec3,
    pub zoom: f32,
    pub sensitivity: f32,
    scale: f32,
    light: Vec3,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 1.0,
            eye: Vec3::new(0.0, -1.0, 2.0),
            zoom: config.zoom,
            sensitivity: config.pointer_sensitivity,
            scale: config.world_scale,
            light: Vec3::ZERO,
        }
    }

    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        let yaw = (self.yaw + dx * self.sensitivity).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs.
        self.yaw = if yaw >= TAU { 0.0 } else { yaw };
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Place the eye above `player` (level units, already interpolated) and
    /// move the player light with it.
    pub fn follow(&mut self, player: Vec2) {
        let s = self.scale;
        self.eye = Vec3::new(-player.x * s, -1.0 - self.zoom, 1.0 + player.y * s);
        self.light = Vec3::new(-player.x * s, 0.0, player.y * s);
    }

    pub fn player_light(&self) -> Vec3 {
        self.light
    }

    pub fn view_matrix(&self) -> Mat4 {
        view_matrix(self.eye, self.yaw, self.pitch)
    }
}

/// `Rx(pitch) · Ry(yaw) · Rz(π) · T(-eye)`.
pub fn view_matrix(eye: Vec3, yaw: f32, pitch: f32) -> Mat4 {
    let m = mat4_rotate_x(Mat4::IDENTITY, pitch);
    let m = mat4_rotate_y(m, yaw);
    let m = mat4_rotate_z(m, PI);
    mat4_translate(m, -eye)
}

pub fn projection_matrix(aspect: f32, fov_degrees: f32, z_near: f32, z_far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_degrees.to_radians(), aspect, z_near, z_far)
}

/// Perspective projection, rebuilt only when the aspect ratio changes.
#[derive(Debug, Clone)]
pub struct Projection {
    fov_degrees: f32,
    z_near: f32,
    z_far: f32,
    aspect: Option<f32>,
    matrix: Mat4,
}

impl Projection {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            z_near: config.z_near,
            z_far: config.z_far,
            aspect: None,
            matrix: Mat4::IDENTITY,
        }
    }

    /// Returns `true` if the matrix was rebuilt.
    pub fn update(&mut self, aspect: f32) -> bool {
        if !aspect.is_finite() || aspect <= 0.0 || self.aspect == Some(aspect) {
            return false;
        }
        self.aspect = Some(aspect);
        self.matrix = projection_matrix(aspect, self.fov_degrees, self.z_near, self.z_far);
        tracing::debug!(aspect, "projection rebuilt");
        true
    }

    pub fn aspect(&self) -> Option<f32> {
        self.aspect
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_clamped() {
        let mut cam = OrbitCamera::default();
        cam.apply_pointer_delta(0.0, 1_000.0);
        assert_eq!(cam.pitch, FRAC_PI_2);
        cam.apply_pointer_delta(0.0, -1_000.0);
        assert_eq!(cam.pitch, -FRAC_PI_2);
    }

    #[test]
    fn yaw_wraps() {
        let mut cam = OrbitCamera::default();
        cam.apply_pointer_delta(-10.0, 0.0);
        assert!((cam.yaw - (TAU - 0.1)).abs() < 1e-5);
        cam.apply_pointer_delta(20.0, 0.0);
        assert!((cam.yaw - 0.1).abs() < 1e-5);
        cam.apply_pointer_delta(10_000.0, 0.0);
        assert!((0.0..TAU).contains(&cam.yaw));
    }

    #[test]
    fn follow_positions_eye_and_light() {
        let mut cam = OrbitCamera::default();
        cam.follow(Vec2::new(100.0, 200.0));
        assert!((cam.eye - Vec3::new(-1.0, -2.5, 3.0)).length() < 1e-6);
        assert!((cam.player_light() - Vec3::new(-1.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let cam = OrbitCamera {
            eye: Vec3::new(0.3, -2.0, 4.0),
            ..OrbitCamera::default()
        };
        let p = cam.view_matrix().transform_point3(cam.eye);
        assert!(p.length() < 1e-5);
    }

    #[test]
    fn view_composition_order() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let expected = Mat4::from_rotation_x(0.4)
            * Mat4::from_rotation_y(1.2)
            * Mat4::from_rotation_z(PI)
            * Mat4::from_translation(-eye);
        assert!(view_matrix(eye, 1.2, 0.4).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn projection_rebuilt_only_on_change() {
        let mut proj = Projection::new(&RenderConfig::default());
        assert!(proj.update(16.0 / 9.0));
        assert!(!proj.update(16.0 / 9.0));
        assert!(proj.update(1.0));
        assert!(!proj.update(0.0));
        assert_eq!(proj.aspect(), Some(1.0));
        assert_ne!(proj.matrix(), Mat4::IDENTITY);
    }
}
