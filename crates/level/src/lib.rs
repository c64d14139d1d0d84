//! Maze level data and simulation snapshots.
//!
//! Levels are produced by the game simulation (or loaded from a level-set
//! file) and are read-only to the renderer. Door `open` flags, switch
//! `pressed` flags and actor positions are the only fields the simulation
//! changes between frames.
//!
//! # Invariants
//! - Level ids are unique within a level set.
//! - Switch uids are unique within a level.
//! - Nothing in this crate knows about GPU buffers or draw ranges.

pub mod level;
pub mod loader;
pub mod sample;
pub mod script;
pub mod snapshot;

pub use level::{Door, Level, LevelSet, Switch};
pub use loader::{LevelError, load_level_set, parse_level_set};
pub use sample::demo_level_set;
pub use script::{DemoRun, FixedStep};
pub use snapshot::{Actor, FrameSnapshot};

pub fn crate_info() -> &'static str {
    "ghostmaze-level v0.1.0"
}
