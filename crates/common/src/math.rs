//! Vector and matrix helpers on top of `glam`.
//!
//! `glam` supplies the value types (`Vec2`, `Vec3`, `Mat4`) and their
//! add/sub/mul/cross operations. What lives here is the handful of operations
//! the maze renderer needs in a specific shape: the segment normal used for
//! wall and door slabs, the post-multiplying matrix builders used for the view
//! and sprite transforms, and the clamped scalar/angle blends used by every
//! animation channel.

use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

/// Extra operations on [`Vec2`] used by the geometry builder.
pub trait Vec2Ext {
    /// Unit perpendicular `(y, -x) / |v|`. Zero for a zero-length vector.
    fn normal(self) -> Vec2;
}

impl Vec2Ext for Vec2 {
    fn normal(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(self.y / len, -self.x / len)
    }
}

/// `m * translation(v)`.
pub fn mat4_translate(m: Mat4, v: Vec3) -> Mat4 {
    m * Mat4::from_translation(v)
}

/// `m * rotation_x(angle)`.
pub fn mat4_rotate_x(m: Mat4, angle: f32) -> Mat4 {
    m * Mat4::from_rotation_x(angle)
}

/// `m * rotation_y(angle)`.
pub fn mat4_rotate_y(m: Mat4, angle: f32) -> Mat4 {
    m * Mat4::from_rotation_y(angle)
}

/// `m * rotation_z(angle)`.
pub fn mat4_rotate_z(m: Mat4, angle: f32) -> Mat4 {
    m * Mat4::from_rotation_z(angle)
}

/// Linear blend from `a` to `b`. `t` is clamped to `[0, 1]`, so a step of 1 or
/// more lands exactly on `b`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Blend between two angles (radians) along the shortest arc.
///
/// The result is not wrapped; callers feed it back in as the next `a`, and the
/// shortest-arc difference is recomputed from scratch each time.
pub fn angle_lerp(a: f32, b: f32, t: f32) -> f32 {
    let da = (b - a) % TAU;
    let shortest = (2.0 * da) % TAU - da;
    a + shortest * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn normal_is_unit_perpendicular() {
        let n = Vec2::new(10.0, 0.0).normal();
        assert!(approx(n.x, 0.0));
        assert!(approx(n.y, -1.0));
        assert!(approx(n.dot(Vec2::new(10.0, 0.0)), 0.0));
    }

    #[test]
    fn normal_of_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normal(), Vec2::ZERO);
    }

    #[test]
    fn lerp_clamps_step() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 4.0), 10.0);
        assert_eq!(lerp(3.0, 10.0, -1.0), 3.0);
    }

    #[test]
    fn angle_lerp_takes_short_way_across_pi() {
        let from = 179.0_f32.to_radians();
        let to = (-179.0_f32).to_radians();
        let halfway = angle_lerp(from, to, 0.5);
        // Passes through 180 degrees, never back through 0.
        assert!(approx(halfway, PI), "got {halfway}");
        let step = angle_lerp(from, to, 0.1);
        assert!(step > from);
    }

    #[test]
    fn angle_lerp_full_step_reaches_target_direction() {
        let from = 179.0_f32.to_radians();
        let to = (-179.0_f32).to_radians();
        let end = angle_lerp(from, to, 1.0);
        assert!(approx(end.cos(), to.cos()));
        assert!(approx(end.sin(), to.sin()));
    }

    #[test]
    fn angle_lerp_plain_case() {
        assert!(approx(angle_lerp(0.0, FRAC_PI_2, 0.5), FRAC_PI_2 / 2.0));
    }

    #[test]
    fn post_multiplied_chain_applies_last_op_first() {
        let m = mat4_translate(Mat4::IDENTITY, Vec3::new(1.0, 0.0, 0.0));
        let m = mat4_rotate_y(m, FRAC_PI_2);
        // Rotate first, then translate.
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p.x, 1.0));
        assert!(approx(p.z, -1.0));
    }

    #[test]
    fn rotate_z_by_pi_flips_x_and_y() {
        let m = mat4_rotate_z(Mat4::IDENTITY, PI);
        let p = m.transform_point3(Vec3::new(1.0, 2.0, 3.0));
        assert!(approx(p.x, -1.0));
        assert!(approx(p.y, -2.0));
        assert!(approx(p.z, 3.0));
    }

    #[test]
    fn rotate_x_quarter_turn() {
        let m = mat4_rotate_x(Mat4::IDENTITY, FRAC_PI_2);
        let p = m.transform_point3(Vec3::Y);
        assert!(approx(p.z, 1.0));
    }
}
