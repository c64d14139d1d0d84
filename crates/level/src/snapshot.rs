use glam::Vec2;
use serde::{Deserialize, Serialize};

use ghostmaze_common::ActorId;

use crate::level::Level;

/// A moving actor (player or ghost) as last reported by the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    /// Position after the most recent completed tick.
    pub position: Vec2,
    /// Displacement covered during that tick.
    #[serde(default)]
    pub movement: Vec2,
    /// Direction the sprite should face, if it differs from `movement`.
    #[serde(default)]
    pub facing: Option<Vec2>,
    #[serde(default)]
    pub dead: bool,
}

impl Actor {
    pub fn new(id: ActorId, position: Vec2) -> Self {
        Self {
            id,
            position,
            movement: Vec2::ZERO,
            facing: None,
            dead: false,
        }
    }

    /// Direction used for the sprite heading. `None` means "no direction".
    pub fn heading_vector(&self) -> Option<Vec2> {
        let v = self.facing.unwrap_or(self.movement);
        (v != Vec2::ZERO).then_some(v)
    }
}

/// Everything the renderer needs from the simulation for one display frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    pub level: &'a Level,
    pub player: &'a Actor,
    pub ghosts: &'a [Actor],
    /// Seconds since the simulation started; drives pulsing lights.
    pub frame_time: f32,
    /// Seconds since the previous display frame.
    pub time_delta: f32,
    /// Seconds elapsed since the last completed tick.
    pub accumulator: f32,
}
