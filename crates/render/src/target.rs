use glam::{Mat4, Vec3};

use ghostmaze_geometry::DrawRange;

/// Vertex attributes, in buffer-location order.
pub const VERTEX_ATTRIBUTES: [&str; 3] = ["position", "normal", "color"];

/// One write to the shading program's uniform slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Projection(Mat4),
    /// View matrix, or model-view for sprites.
    View(Mat4),
    PlayerLight(Vec3),
    Ambient(Vec3),
    Translation(Vec3),
    /// How strongly surfaces react to the player light; 0 is unlit.
    SurfaceSensitivity(f32),
}

impl Uniform {
    pub fn slot_name(&self) -> &'static str {
        match self {
            Uniform::Projection(_) => "projection",
            Uniform::View(_) => "view",
            Uniform::PlayerLight(_) => "player_light",
            Uniform::Ambient(_) => "ambient",
            Uniform::Translation(_) => "translation",
            Uniform::SurfaceSensitivity(_) => "surface_sensitivity",
        }
    }
}

/// Current value of every uniform slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformState {
    pub projection: Mat4,
    pub view: Mat4,
    pub player_light: Vec3,
    pub ambient: Vec3,
    pub translation: Vec3,
    pub surface_sensitivity: f32,
}

impl Default for UniformState {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            player_light: Vec3::ZERO,
            ambient: Vec3::ONE,
            translation: Vec3::ZERO,
            surface_sensitivity: 0.0,
        }
    }
}

impl UniformState {
    pub fn apply(&mut self, uniform: Uniform) {
        match uniform {
            Uniform::Projection(m) => self.projection = m,
            Uniform::View(m) => self.view = m,
            Uniform::PlayerLight(v) => self.player_light = v,
            Uniform::Ambient(v) => self.ambient = v,
            Uniform::Translation(v) => self.translation = v,
            Uniform::SurfaceSensitivity(s) => self.surface_sensitivity = s,
        }
    }
}

/// Where the maze renderer sends its work. Implemented by the GPU backend
/// and by [`crate::DrawLog`] for tests and text output.
///
/// Uniform writes stick until overwritten. A draw renders `range` of the
/// uploaded index buffer with whatever uniforms are current.
pub trait DrawTarget {
    fn clear(&mut self, color: [f32; 4]);
    fn set_uniform(&mut self, uniform: Uniform);
    fn draw(&mut self, range: DrawRange);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_updates_one_slot() {
        let mut state = UniformState::default();
        state.apply(Uniform::SurfaceSensitivity(0.4));
        state.apply(Uniform::Translation(Vec3::X));
        assert_eq!(state.surface_sensitivity, 0.4);
        assert_eq!(state.translation, Vec3::X);
        assert_eq!(state.ambient, Vec3::ONE);
    }

    #[test]
    fn slot_names_distinct() {
        let names = [
            Uniform::Projection(Mat4::IDENTITY).slot_name(),
            Uniform::View(Mat4::IDENTITY).slot_name(),
            Uniform::PlayerLight(Vec3::ZERO).slot_name(),
            Uniform::Ambient(Vec3::ZERO).slot_name(),
            Uniform::Translation(Vec3::ZERO).slot_name(),
            Uniform::SurfaceSensitivity(0.0).slot_name(),
        ];
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }
}
