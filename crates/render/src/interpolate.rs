use glam::Vec2;
use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use ghostmaze_common::{ActorId, angle_lerp};

/// How fast sprite headings turn toward their movement direction, per second.
pub const HEADING_RATE: f32 = 12.0;

/// Draws actors between simulation ticks.
///
/// The simulation reports each actor's position after the last tick and the
/// displacement of that tick. Displayed position backs off along the
/// displacement by the part of the tick that has not yet elapsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolator {
    pub ticks_per_second: f32,
    accumulator: f32,
}

impl Interpolator {
    pub fn new(ticks_per_second: f32) -> Self {
        Self {
            ticks_per_second,
            accumulator: 0.0,
        }
    }

    /// Seconds elapsed since the last completed tick.
    pub fn set_accumulator(&mut self, seconds: f32) {
        self.accumulator = seconds;
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Fraction of the last tick's movement not yet shown.
    pub fn remaining(&self) -> f32 {
        1.0 - self.ticks_per_second * self.accumulator
    }

    pub fn position(&self, position: Vec2, movement: Vec2) -> Vec2 {
        position - movement * self.remaining()
    }
}

/// Heading an actor should face for `direction`. `None` faces angle 0.
pub fn target_heading(direction: Option<Vec2>) -> f32 {
    match direction {
        Some(d) => (-d.y).atan2(d.x),
        None => 0.0,
    }
}

/// Rotation about the vertical axis that turns a sprite to `heading`.
pub fn sprite_yaw(heading: f32) -> f32 {
    FRAC_PI_2 - heading
}

/// Smoothed per-actor headings, kept across frames.
#[derive(Debug, Clone, Default)]
pub struct HeadingTracker {
    headings: HashMap<ActorId, f32>,
}

impl HeadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn `id` toward `direction` and return its new heading. An actor seen
    /// for the first time snaps straight to its target.
    pub fn update(&mut self, id: ActorId, direction: Option<Vec2>, time_delta: f32) -> f32 {
        let target = target_heading(direction);
        let heading = match self.headings.get(&id) {
            Some(&current) => angle_lerp(current, target, time_delta * HEADING_RATE),
            None => target,
        };
        self.headings.insert(id, heading);
        heading
    }

    pub fn get(&self, id: ActorId) -> Option<f32> {
        self.headings.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn clear(&mut self) {
        self.headings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn tick_start_shows_previous_position() {
        let interp = Interpolator::new(10.0);
        let p = interp.position(Vec2::new(50.0, 50.0), Vec2::new(5.0, 0.0));
        assert_eq!(p, Vec2::new(45.0, 50.0));
    }

    #[test]
    fn tick_end_shows_reported_position() {
        let mut interp = Interpolator::new(10.0);
        interp.set_accumulator(0.1);
        let p = interp.position(Vec2::new(50.0, 50.0), Vec2::new(5.0, 0.0));
        assert!((p - Vec2::new(50.0, 50.0)).length() < 1e-5);
    }

    #[test]
    fn halfway_through_tick() {
        let mut interp = Interpolator::new(10.0);
        interp.set_accumulator(0.05);
        let p = interp.position(Vec2::ZERO, Vec2::new(0.0, 8.0));
        assert!((p - Vec2::new(0.0, -4.0)).length() < 1e-5);
    }

    #[test]
    fn target_heading_directions() {
        assert_eq!(target_heading(None), 0.0);
        assert_eq!(target_heading(Some(Vec2::X)), 0.0);
        // Level y grows downward, so moving +y faces -π/2.
        assert!((target_heading(Some(Vec2::Y)) + FRAC_PI_2).abs() < 1e-6);
        assert!((target_heading(Some(Vec2::NEG_X)) - PI).abs() < 1e-6);
    }

    #[test]
    fn first_sighting_snaps() {
        let mut tracker = HeadingTracker::new();
        let h = tracker.update(ActorId(3), Some(Vec2::NEG_X), 0.0);
        assert!((h - PI).abs() < 1e-6);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn heading_turns_gradually() {
        let mut tracker = HeadingTracker::new();
        tracker.update(ActorId(1), Some(Vec2::X), 0.0);
        let h = tracker.update(ActorId(1), Some(Vec2::new(0.0, -1.0)), 1.0 / 60.0);
        let expected = FRAC_PI_2 * (12.0 / 60.0);
        assert!((h - expected).abs() < 1e-5);
        // A large step lands on the target.
        let h = tracker.update(ActorId(1), Some(Vec2::new(0.0, -1.0)), 1.0);
        assert!((h - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn actors_tracked_independently() {
        let mut tracker = HeadingTracker::new();
        tracker.update(ActorId(1), Some(Vec2::X), 0.0);
        tracker.update(ActorId(2), Some(Vec2::NEG_X), 0.0);
        assert_eq!(tracker.get(ActorId(1)), Some(0.0));
        assert!((tracker.get(ActorId(2)).unwrap() - PI).abs() < 1e-6);
    }

    #[test]
    fn sprite_yaw_offsets_heading() {
        assert_eq!(sprite_yaw(0.0), FRAC_PI_2);
        assert_eq!(sprite_yaw(FRAC_PI_2), 0.0);
    }
}
