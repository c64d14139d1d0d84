//! Pointer input for the maze camera.
//!
//! # Invariants
//! - Camera deltas are produced only while the pointer is locked.
//! - Lock state changes only on platform confirmation, never on request.

pub mod pointer;

pub use pointer::{LockRequest, PointerButton, PointerEvent, PointerGate, PointerResponse};

pub fn crate_info() -> &'static str {
    "ghostmaze-input v0.1.0"
}
