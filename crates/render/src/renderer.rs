use glam::{Vec2, Vec3};

use ghostmaze_common::{mat4_rotate_y, mat4_translate};
use ghostmaze_geometry::{DrawRange, MeshBuildOutput, SpriteKind};
use ghostmaze_level::{Actor, FrameSnapshot, Level};

use crate::animation::LevelAnimation;
use crate::camera::{OrbitCamera, Projection};
use crate::config::RenderConfig;
use crate::interpolate::{HeadingTracker, Interpolator, sprite_yaw};
use crate::store::{MeshStore, MeshUploader};
use crate::target::{DrawTarget, Uniform};

/// Sprites hover just above the floor so they never z-fight with it.
const PLAYER_HOVER: f32 = -0.03;
const GHOST_HOVER: f32 = -0.01;

const PAD_SENSITIVITY: f32 = 0.4;
const START_PAD_AMBIENT: Vec3 = Vec3::new(0.1, 0.0, 0.5);

/// Turns simulation snapshots into draw calls against a [`DrawTarget`].
///
/// Owns everything that persists between frames: the uploaded mesh and its
/// ranges, the camera, smoothed sprite headings and per-level pad animation.
/// Generic over the backend's mesh handles so it runs the same against the
/// GPU and against [`crate::DrawLog`].
pub struct MazeRenderer<H> {
    config: RenderConfig,
    mesh: MeshStore<H>,
    camera: OrbitCamera,
    projection: Projection,
    interpolator: Interpolator,
    headings: HeadingTracker,
    animation: LevelAnimation,
    time_delta: f32,
}

impl<H> MazeRenderer<H> {
    pub fn new(config: RenderConfig, mesh: MeshStore<H>, aspect: f32) -> Self {
        let mut projection = Projection::new(&config);
        projection.update(aspect);
        Self {
            camera: OrbitCamera::from_config(&config),
            interpolator: Interpolator::new(config.ticks_per_second),
            headings: HeadingTracker::new(),
            animation: LevelAnimation::new(config.world_scale),
            time_delta: 0.0,
            projection,
            mesh,
            config,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn mesh(&self) -> &MeshStore<H> {
        &self.mesh
    }

    /// Swap the mesh for a rebuilt one, e.g. after levels were reloaded.
    pub fn replace_mesh<U>(&mut self, uploader: &mut U, output: MeshBuildOutput)
    where
        U: MeshUploader<Handles = H>,
    {
        self.mesh.replace(uploader, output);
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn animation(&self) -> &LevelAnimation {
        &self.animation
    }

    pub fn headings(&self) -> &HeadingTracker {
        &self.headings
    }

    /// Returns `true` if the projection was rebuilt.
    pub fn set_aspect(&mut self, aspect: f32) -> bool {
        self.projection.update(aspect)
    }

    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.camera.apply_pointer_delta(dx, dy);
    }

    pub fn set_accumulator(&mut self, seconds: f32) {
        self.interpolator.set_accumulator(seconds);
    }

    /// Where `actor` is drawn this frame, in level units.
    pub fn display_position(&self, actor: &Actor) -> Vec2 {
        self.interpolator.position(actor.position, actor.movement)
    }

    pub fn set_camera(&mut self, player: &Actor) {
        let pos = self.display_position(player);
        self.camera.follow(pos);
    }

    pub fn begin_frame(&mut self, target: &mut impl DrawTarget) {
        target.clear(self.config.clear_color);
    }

    /// Static geometry, closed doors, start and end pads and switches.
    ///
    /// Uniforms are left neutral afterwards: no translation, white ambient
    /// and no player light response.
    pub fn draw_level(
        &mut self,
        target: &mut impl DrawTarget,
        level: &Level,
        frame_time: f32,
        time_delta: f32,
    ) {
        // A fresh level snaps every animated value to its target. Headings
        // snap too, so actors from the previous level are dropped.
        self.time_delta = if self.animation.enter(level.id) {
            self.headings.clear();
            1.0
        } else {
            time_delta
        };
        let s = self.config.world_scale;
        let ranges = self.mesh.ranges();

        target.set_uniform(Uniform::Translation(Vec3::ZERO));
        target.set_uniform(Uniform::Ambient(Vec3::ONE));
        target.set_uniform(Uniform::Projection(self.projection.matrix()));
        target.set_uniform(Uniform::View(self.camera.view_matrix()));
        target.set_uniform(Uniform::PlayerLight(self.camera.player_light()));
        target.set_uniform(Uniform::SurfaceSensitivity(1.0));

        match ranges.level(level.id) {
            Some(range) => target.draw(range),
            None => tracing::warn!(level = %level.id, "no geometry built for level"),
        }
        for (index, door) in level.doors.iter().enumerate() {
            if door.open {
                continue;
            }
            draw_if_built(target, ranges.door(level.id, index));
        }

        let pad = ranges.sprite(SpriteKind::Pad);
        target.set_uniform(Uniform::SurfaceSensitivity(PAD_SENSITIVITY));

        target.set_uniform(Uniform::Translation(Vec3::new(
            -level.start.x * s,
            s,
            level.start.y * s,
        )));
        target.set_uniform(Uniform::Ambient(START_PAD_AMBIENT));
        draw_if_built(target, pad);

        let glow = self.animation.step_end_pad(frame_time, self.time_delta);
        target.set_uniform(Uniform::Ambient(Vec3::new(0.0, glow / 1.3, glow)));
        target.set_uniform(Uniform::Translation(Vec3::new(
            -level.end.x * s,
            3.0 * s,
            level.end.y * s,
        )));
        draw_if_built(target, pad);

        for switch in &level.switches {
            let drawn =
                self.animation
                    .step_switch(switch.uid, switch.pressed, frame_time, self.time_delta);
            target.set_uniform(Uniform::SurfaceSensitivity(drawn.glow));
            target.set_uniform(Uniform::Translation(Vec3::new(
                -switch.position.x * s,
                drawn.lift,
                switch.position.y * s,
            )));
            target.set_uniform(Uniform::Ambient(Vec3::new(drawn.red, drawn.glow, 0.0)));
            draw_if_built(target, pad);
        }

        target.set_uniform(Uniform::SurfaceSensitivity(0.0));
        target.set_uniform(Uniform::Translation(Vec3::ZERO));
        target.set_uniform(Uniform::Ambient(Vec3::ONE));
    }

    pub fn draw_player(&mut self, target: &mut impl DrawTarget, player: &Actor) {
        self.draw_sprite(target, player, SpriteKind::Player, PLAYER_HOVER);
    }

    /// Dead ghosts are skipped; returns whether anything was drawn.
    pub fn draw_ghost(&mut self, target: &mut impl DrawTarget, ghost: &Actor) -> bool {
        if ghost.dead {
            return false;
        }
        self.draw_sprite(target, ghost, SpriteKind::Ghost, GHOST_HOVER)
    }

    fn draw_sprite(
        &mut self,
        target: &mut impl DrawTarget,
        actor: &Actor,
        kind: SpriteKind,
        hover: f32,
    ) -> bool {
        let s = self.config.world_scale;
        let pos = self.display_position(actor);
        let heading = self
            .headings
            .update(actor.id, actor.heading_vector(), self.time_delta);

        let model_view = mat4_translate(
            self.camera.view_matrix(),
            Vec3::new(-pos.x * s, hover, pos.y * s),
        );
        let model_view = mat4_rotate_y(model_view, sprite_yaw(heading));

        let Some(range) = self.mesh.ranges().sprite(kind) else {
            tracing::warn!(?kind, "sprite mesh missing");
            return false;
        };
        target.set_uniform(Uniform::View(model_view));
        target.set_uniform(Uniform::Ambient(Vec3::ONE));
        target.draw(range);
        true
    }

    /// One full display frame.
    pub fn render_frame(&mut self, target: &mut impl DrawTarget, snapshot: &FrameSnapshot<'_>) {
        self.set_accumulator(snapshot.accumulator);
        self.set_camera(snapshot.player);
        self.begin_frame(target);
        self.draw_level(
            target,
            snapshot.level,
            snapshot.frame_time,
            snapshot.time_delta,
        );
        self.draw_player(target, snapshot.player);
        for ghost in snapshot.ghosts {
            self.draw_ghost(target, ghost);
        }
    }
}

fn draw_if_built(target: &mut impl DrawTarget, range: Option<DrawRange>) {
    if let Some(range) = range {
        target.draw(range);
    }
}
