//! Geometry Builder: turns level polygons into one batched, GPU-ready mesh.
//!
//! A build pass walks every level of a set (static walls and floor, then that
//! level's door panels) and finishes with the shared sprite meshes. The output
//! is a single vertex/index mesh plus a [`DrawRanges`] table locating each
//! drawable inside the shared index buffer.
//!
//! # Invariants
//! - Position, normal and colour arrays always have the same length.
//! - Every recorded range lies inside the index buffer and only references
//!   vertices of the same pass; ranges of distinct keys never overlap.
//! - Malformed input (zero-length segments, non-convex floors) degrades the
//!   picture, never the build.

mod builder;
mod maze;
mod ranges;

pub use builder::{MeshBuilder, MeshData, at_height, hexagon_points};
pub use maze::{MeshBuildOutput, build, build_with_scale, palette};
pub use ranges::{DrawKey, DrawRange, DrawRanges, SpriteKind};

pub fn crate_info() -> &'static str {
    "ghostmaze-geometry v0.1.0"
}
