//! Scripted stand-in for the game simulation.
//!
//! Walks the player from the start pad over every switch to the end pad,
//! circles ghosts around the level, and moves on to the next level when the
//! player arrives. It only exists to feed the viewers with snapshots that
//! change the way real game state does: once per fixed tick.

use glam::Vec2;

use ghostmaze_common::ActorId;

use crate::level::{Level, LevelSet};
use crate::snapshot::Actor;

/// Level units per tick.
const PLAYER_SPEED: f32 = 12.0;
const GHOST_SPEED: f32 = 8.0;
const GHOST_ORBIT: f32 = 60.0;
const CATCH_DISTANCE: f32 = 15.0;
const GHOSTS_PER_LEVEL: u32 = 2;

/// Fixed-timestep clock: turns variable frame times into whole ticks and
/// keeps the leftover as the accumulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStep {
    step: f32,
    accumulator: f32,
}

impl FixedStep {
    pub fn new(ticks_per_second: f32) -> Self {
        Self {
            step: 1.0 / ticks_per_second,
            accumulator: 0.0,
        }
    }

    /// Add `dt` seconds and return how many ticks are due.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt;
        let mut ticks = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Seconds since the last tick.
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}

#[derive(Debug, Clone)]
pub struct DemoRun {
    levels: LevelSet,
    current: usize,
    player: Actor,
    ghosts: Vec<Actor>,
    route: Vec<Vec2>,
    waypoint: usize,
    ticks: u64,
}

impl DemoRun {
    /// `None` for an empty level set.
    pub fn new(levels: LevelSet) -> Option<Self> {
        let first = levels.levels.first()?;
        let mut run = Self {
            player: Actor::new(ActorId(0), first.start),
            ghosts: Vec::new(),
            route: Vec::new(),
            waypoint: 0,
            current: 0,
            ticks: 0,
            levels,
        };
        run.enter(0);
        Some(run)
    }

    pub fn level(&self) -> &Level {
        &self.levels.levels[self.current]
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn ghosts(&self) -> &[Actor] {
        &self.ghosts
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Swap in reloaded levels and restart from the first one.
    pub fn replace_levels(&mut self, levels: LevelSet) -> bool {
        if levels.is_empty() {
            return false;
        }
        self.levels = levels;
        self.enter(0);
        true
    }

    fn enter(&mut self, index: usize) {
        self.current = index;
        let level = &mut self.levels.levels[index];
        for switch in &mut level.switches {
            switch.pressed = false;
        }
        for door in &mut level.doors {
            door.open = false;
        }

        let level = &self.levels.levels[index];
        self.route = level
            .switches
            .iter()
            .map(|s| s.position)
            .chain(std::iter::once(level.end))
            .collect();
        self.waypoint = 0;
        self.player = Actor::new(ActorId(0), level.start);

        let center = (level.start + level.end) / 2.0;
        self.ghosts = (0..GHOSTS_PER_LEVEL)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::PI;
                let offset = Vec2::from_angle(angle) * GHOST_ORBIT;
                Actor::new(ActorId(i + 1), center + offset)
            })
            .collect();
        tracing::info!(level = %level.id, switches = level.switches.len(), "demo entered level");
    }

    /// Advance the scripted simulation one fixed tick.
    pub fn tick(&mut self) {
        self.ticks += 1;
        self.step_player();
        self.step_ghosts();
    }

    fn step_player(&mut self) {
        let Some(&target) = self.route.get(self.waypoint) else {
            return;
        };
        let before = self.player.position;
        let to_target = target - before;
        let arrived = to_target.length() <= PLAYER_SPEED;
        self.player.position = if arrived {
            target
        } else {
            before + to_target.normalize() * PLAYER_SPEED
        };
        let step = self.player.position - before;
        self.player.movement = step;
        if step != Vec2::ZERO {
            self.player.facing = Some(step);
        }

        if !arrived {
            return;
        }

        let switch_count = self.level().switches.len();
        if self.waypoint < switch_count {
            let level = &mut self.levels.levels[self.current];
            level.switches[self.waypoint].pressed = true;
            if level.switches.iter().all(|s| s.pressed) {
                for door in &mut level.doors {
                    door.open = true;
                }
            }
            self.waypoint += 1;
        } else {
            let next = (self.current + 1) % self.levels.len();
            self.enter(next);
        }
    }

    fn step_ghosts(&mut self) {
        let level = &self.levels.levels[self.current];
        let center = (level.start + level.end) / 2.0;
        let player = self.player.position;
        for ghost in &mut self.ghosts {
            if ghost.dead {
                ghost.movement = Vec2::ZERO;
                continue;
            }
            let before = ghost.position;
            let radial = before - center;
            let tangent = Vec2::new(-radial.y, radial.x).normalize_or_zero();
            let along = (radial + tangent * GHOST_SPEED).normalize_or_zero();
            ghost.position = center + along * GHOST_ORBIT;
            ghost.movement = ghost.position - before;
            if ghost.position.distance(player) < CATCH_DISTANCE {
                ghost.dead = true;
                tracing::debug!(ghost = %ghost.id, "ghost caught");
            }
        }
    }
}
