//! Per-level light animation for switch pads and the end pad.
//!
//! Every channel eases toward a target with `lerp(current, target, dt * rate)`.
//! State is keyed by the active level and dropped whenever the level changes.

use std::collections::HashMap;

use ghostmaze_common::{LevelId, SwitchUid, lerp};

const RED_RATE: f32 = 4.0;
const GLOW_RATE: f32 = 5.0;
const LIFT_RATE: f32 = 8.0;
const END_GLOW_RATE: f32 = 4.0;

/// Pulse frequency of an idle switch's red light.
const SWITCH_PULSE: f32 = 3.0;
/// Pulse frequency of the end pad.
const END_PULSE: f32 = 1.5;

/// Height a pressed switch sinks to, in level units.
const PRESSED_LIFT: f32 = 3.8;

/// Light state of one switch pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadAnimation {
    pub red: f32,
    pub glow: f32,
    /// Vertical offset in world units (positive is down).
    pub lift: f32,
}

impl Default for PadAnimation {
    fn default() -> Self {
        Self {
            red: 1.0,
            glow: 0.0,
            lift: 0.0,
        }
    }
}

/// `lerp(0.7, 1, 1 - |cos(freq * t)|)`: a slow throb between 0.7 and 1.
fn pulse(frame_time: f32, frequency: f32) -> f32 {
    lerp(0.7, 1.0, 1.0 - (frequency * frame_time).cos().abs())
}

impl PadAnimation {
    fn step(&mut self, pressed: bool, frame_time: f32, time_delta: f32, scale: f32) {
        let red = if pressed { 0.1 } else { pulse(frame_time, SWITCH_PULSE) };
        let glow = if pressed { 0.3 } else { 0.0 };
        let lift = if pressed { PRESSED_LIFT * scale } else { 0.0 };
        self.red = lerp(self.red, red, time_delta * RED_RATE);
        self.glow = lerp(self.glow, glow, time_delta * GLOW_RATE);
        self.lift = lerp(self.lift, lift, time_delta * LIFT_RATE);
    }
}

#[derive(Debug, Clone)]
pub struct LevelAnimation {
    level: Option<LevelId>,
    switches: HashMap<SwitchUid, PadAnimation>,
    end_glow: f32,
    scale: f32,
}

impl LevelAnimation {
    pub fn new(scale: f32) -> Self {
        Self {
            level: None,
            switches: HashMap::new(),
            end_glow: 0.0,
            scale,
        }
    }

    pub fn level(&self) -> Option<LevelId> {
        self.level
    }

    /// Drop all pad state and make `level` the active level.
    pub fn reset(&mut self, level: LevelId) {
        self.level = Some(level);
        self.switches.clear();
        self.end_glow = 0.0;
    }

    /// Make `level` active, resetting if it differs from the current one.
    /// Returns `true` when a reset happened.
    pub fn enter(&mut self, level: LevelId) -> bool {
        if self.level == Some(level) {
            return false;
        }
        tracing::debug!(%level, previous = ?self.level, "level changed, animation reset");
        self.reset(level);
        true
    }

    pub fn switch(&self, uid: SwitchUid) -> Option<PadAnimation> {
        self.switches.get(&uid).copied()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn end_glow(&self) -> f32 {
        self.end_glow
    }

    /// Advance one switch and return the state it had *before* this step,
    /// which is what gets drawn this frame.
    pub fn step_switch(
        &mut self,
        uid: SwitchUid,
        pressed: bool,
        frame_time: f32,
        time_delta: f32,
    ) -> PadAnimation {
        let state = self.switches.entry(uid).or_default();
        let drawn = *state;
        state.step(pressed, frame_time, time_delta, self.scale);
        drawn
    }

    /// Advance the end pad glow and return the new value.
    pub fn step_end_pad(&mut self, frame_time: f32, time_delta: f32) -> f32 {
        self.end_glow = lerp(
            self.end_glow,
            pulse(frame_time, END_PULSE),
            time_delta * END_GLOW_RATE,
        );
        self.end_glow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostmaze_common::WORLD_SCALE;

    #[test]
    fn first_step_draws_defaults() {
        let mut anim = LevelAnimation::new(WORLD_SCALE);
        anim.enter(LevelId(1));
        let drawn = anim.step_switch(SwitchUid(7), true, 0.0, 0.1);
        assert_eq!(drawn, PadAnimation::default());
        let after = anim.switch(SwitchUid(7)).unwrap();
        assert!(after.red < 1.0);
        assert!(after.glow > 0.0);
        assert!(after.lift > 0.0);
    }

    #[test]
    fn pressed_switch_settles() {
        let mut anim = LevelAnimation::new(WORLD_SCALE);
        anim.enter(LevelId(1));
        for _ in 0..200 {
            anim.step_switch(SwitchUid(1), true, 0.0, 1.0 / 60.0);
        }
        let s = anim.switch(SwitchUid(1)).unwrap();
        assert!((s.red - 0.1).abs() < 1e-3);
        assert!((s.glow - 0.3).abs() < 1e-3);
        assert!((s.lift - 3.8 * WORLD_SCALE).abs() < 1e-4);
    }

    #[test]
    fn idle_switch_pulses_between_bounds() {
        let mut anim = LevelAnimation::new(WORLD_SCALE);
        anim.enter(LevelId(1));
        for i in 0..300 {
            anim.step_switch(SwitchUid(1), false, i as f32 / 60.0, 1.0 / 60.0);
            let s = anim.switch(SwitchUid(1)).unwrap();
            assert!((0.7..=1.0).contains(&s.red));
            assert_eq!(s.glow, 0.0);
        }
    }

    #[test]
    fn level_change_resets() {
        let mut anim = LevelAnimation::new(WORLD_SCALE);
        assert!(anim.enter(LevelId(1)));
        anim.step_switch(SwitchUid(1), true, 0.0, 0.5);
        anim.step_end_pad(0.0, 0.5);
        assert!(!anim.enter(LevelId(1)));
        assert_eq!(anim.switch_count(), 1);

        assert!(anim.enter(LevelId(2)));
        assert_eq!(anim.switch_count(), 0);
        assert_eq!(anim.end_glow(), 0.0);
        assert_eq!(anim.level(), Some(LevelId(2)));
    }

    #[test]
    fn end_pad_glow_snaps_on_full_step() {
        let mut anim = LevelAnimation::new(WORLD_SCALE);
        // cos(0) = 1, so the pulse target is 0.7.
        let glow = anim.step_end_pad(0.0, 1.0);
        assert!((glow - 0.7).abs() < 1e-6);
    }
}
