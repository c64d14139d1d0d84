use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Linear RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([1.0, 1.0, 1.0]);
    pub const BLACK: Rgb = Rgb([0.0, 0.0, 0.0]);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    /// Build from 0-255 channel values.
    pub const fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::from_array(self.0)
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        c.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_scales_to_unit_range() {
        let c = Rgb::from_bytes(255, 0, 51);
        assert_eq!(c.0[0], 1.0);
        assert_eq!(c.0[1], 0.0);
        assert!((c.0[2] - 0.2).abs() < 1e-6);
    }
}
