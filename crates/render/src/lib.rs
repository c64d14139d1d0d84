//! Renderer-agnostic maze render core.
//!
//! # Invariants
//! - The renderer never mutates simulation state; it reads [`FrameSnapshot`]s.
//! - Draw ranges and mesh handles are replaced together, never separately.
//! - Uniforms are neutral (no translation, white ambient, unlit) after every
//!   level pass.
//!
//! Backends implement [`DrawTarget`] and [`MeshUploader`]. [`DrawLog`] is the
//! in-memory backend used for text output and tests.
//!
//! [`FrameSnapshot`]: ghostmaze_level::FrameSnapshot

pub mod animation;
pub mod camera;
pub mod config;
pub mod debug;
pub mod error;
pub mod interpolate;
mod renderer;
pub mod store;
pub mod target;

pub use animation::{LevelAnimation, PadAnimation};
pub use camera::{OrbitCamera, Projection, projection_matrix, view_matrix};
pub use config::RenderConfig;
pub use debug::{DrawCall, DrawLog, MeshSummary};
pub use error::{ConfigError, ProgramError};
pub use interpolate::{HeadingTracker, Interpolator, sprite_yaw, target_heading};
pub use renderer::MazeRenderer;
pub use store::{MeshStore, MeshUploader};
pub use target::{DrawTarget, Uniform, UniformState, VERTEX_ATTRIBUTES};

pub fn crate_info() -> &'static str {
    "ghostmaze-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
