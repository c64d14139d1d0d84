//! Shared types for the ghostmaze workspace: ids, colours and the small amount
//! of vector/matrix glue the geometry builder and renderer have in common.
//!
//! # Invariants
//! - Ids are plain copyable newtypes; the simulation assigns them.
//! - Matrix helpers post-multiply (`m = m * op`), so a chain of calls reads in
//!   the order the transforms are written.

pub mod color;
pub mod math;
pub mod types;

pub use color::Rgb;
pub use math::{
    Vec2Ext, angle_lerp, lerp, mat4_rotate_x, mat4_rotate_y, mat4_rotate_z, mat4_translate,
};
pub use types::{ActorId, LevelId, SwitchUid};

/// Level units to world units. Level data is authored in "pixels"; one world
/// unit is a hundred of them.
pub const WORLD_SCALE: f32 = 1.0 / 100.0;

pub fn crate_info() -> &'static str {
    "ghostmaze-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
