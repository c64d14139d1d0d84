//! wgpu render backend for the maze renderer.
//!
//! Uploads the built maze mesh once and replays frames recorded by
//! `ghostmaze_render::MazeRenderer` into a [`ghostmaze_render::DrawLog`].
//!
//! # Invariants
//! - One shader program serves every draw; only uniforms change between draws.
//! - Draws that fall outside the uploaded index buffer are skipped, never issued.

mod buffers;
mod gpu;
mod program;
mod shaders;

pub use buffers::{MeshBuffers, WgpuUploader};
pub use gpu::{FrameStats, GpuUniforms, WgpuRenderer};
pub use program::ShaderProgram;
pub use shaders::MAZE_SHADER;
