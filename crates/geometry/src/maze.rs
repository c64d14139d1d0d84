//! Level, door and sprite passes over a level set.
//!
//! All constants are in level units. The y axis points down: the top of a wall
//! slab is at y = -10 and the abyss below the floor extends to y = 1000.

use glam::{Vec2, Vec3};

use ghostmaze_common::{Rgb, Vec2Ext, WORLD_SCALE};
use ghostmaze_level::{Door, Level};

use crate::builder::{MeshBuilder, MeshData, at_height};
use crate::ranges::{DrawKey, DrawRanges, SpriteKind};

/// Colours of the static maze.
pub mod palette {
    use ghostmaze_common::Rgb;

    pub const DEEP_WALLS: Rgb = Rgb::from_bytes(0, 50, 100);
    pub const PILLARS: Rgb = Rgb::from_bytes(0, 80, 230);
    pub const SMALL_WALLS: Rgb = Rgb::from_bytes(0, 100, 255);
    pub const GROUND: Rgb = Rgb::from_bytes(20, 60, 170);
    pub const DOOR: Rgb = Rgb::from_bytes(255, 0, 0);
    pub const DOOR_SIDE: Rgb = Rgb::from_bytes(100, 100, 100);
}

const WALL_WIDTH: f32 = 5.0;
const WALL_TOP_Y: f32 = -10.0;
const WALL_BOTTOM_Y: f32 = 1.0;
const ABYSS_Y: f32 = 1000.0;
const PILLAR_RADIUS: f32 = 6.0;
const FLOOR_Y: f32 = 1.0;
const JAMB_RADIUS: f32 = 5.0;
const JAMB_TOP_Y: f32 = -22.0;
const DOOR_HALF_THICKNESS: f32 = 1.0;
/// (bottom, top) of the two shutter panels.
const DOOR_PANELS: [(f32, f32); 2] = [(-4.0, -6.0), (-14.0, -16.0)];
const PAD_RADIUS: f32 = 25.0;

/// Mesh and draw ranges of one build pass. Always replaced together.
#[derive(Debug, Clone, Default)]
pub struct MeshBuildOutput {
    pub mesh: MeshData,
    pub ranges: DrawRanges,
}

/// Build every level of the set plus the shared sprites at [`WORLD_SCALE`].
pub fn build<'a>(levels: impl IntoIterator<Item = &'a Level>) -> MeshBuildOutput {
    build_with_scale(levels, WORLD_SCALE)
}

/// Build at an explicit level-to-world scale.
pub fn build_with_scale<'a>(
    levels: impl IntoIterator<Item = &'a Level>,
    scale: f32,
) -> MeshBuildOutput {
    let _span = tracing::info_span!("mesh_build").entered();
    let mut builder = MeshBuilder::new(scale);
    let mut ranges = DrawRanges::new();

    for level in levels {
        let range = builder.span(|b| level_static(b, level));
        ranges.insert(DrawKey::LevelStatic(level.id), range);

        for (index, door) in level.doors.iter().enumerate() {
            let range = builder.span(|b| door_panel(b, door));
            ranges.insert(
                DrawKey::Door {
                    level: level.id,
                    index,
                },
                range,
            );
        }

        tracing::debug!(
            level = %level.id,
            static_indices = range.count,
            doors = level.doors.len(),
            "built level geometry"
        );
    }

    sprites(&mut builder, &mut ranges);

    let mesh = builder.finish();
    tracing::info!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        ranges = ranges.len(),
        "mesh build complete"
    );
    MeshBuildOutput { mesh, ranges }
}

/// Walls, pillars, floor and door jambs.
fn level_static(b: &mut MeshBuilder, level: &Level) {
    for ring in &level.walls {
        for (i, &a) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            wall_segment(b, a, next);
        }
    }

    for floor in &level.floors {
        b.polygon(floor, FLOOR_Y, palette::GROUND);
    }

    for door in &level.doors {
        for p in door.polygon {
            b.hexagon(
                p,
                JAMB_RADIUS,
                JAMB_TOP_Y,
                WALL_BOTTOM_Y,
                palette::DOOR_SIDE,
                palette::DOOR_SIDE,
            );
        }
    }
}

/// Abyss face, wall slab and a pillar at the segment's start.
///
/// Only the start vertex gets a pillar so joints of a closed ring are not
/// doubled; the end of an open polyline therefore has none.
fn wall_segment(b: &mut MeshBuilder, a: Vec2, c: Vec2) {
    if a.distance(c) == 0.0 {
        return;
    }

    b.quad(
        Vec3::new(a.x, ABYSS_Y, a.y),
        Vec3::new(c.x, ABYSS_Y, c.y),
        Vec3::new(c.x, WALL_BOTTOM_Y, c.y),
        Vec3::new(a.x, WALL_BOTTOM_Y, a.y),
        palette::DEEP_WALLS,
    );

    let offset = (c - a).normal() * (WALL_WIDTH / 2.0);
    let border = [a - offset, c - offset, c + offset, a + offset];
    b.frustum(
        at_height(border, WALL_BOTTOM_Y),
        at_height(border, WALL_TOP_Y),
        palette::SMALL_WALLS,
        None,
    );

    b.hexagon(
        a,
        PILLAR_RADIUS,
        WALL_TOP_Y - 2.0,
        ABYSS_Y,
        palette::PILLARS,
        palette::PILLARS,
    );
}

/// Rolling shutter: two thin stacked slabs along the hinge line.
fn door_panel(b: &mut MeshBuilder, door: &Door) {
    let [p0, p1] = door.polygon;
    let offset = (p1 - p0).normal() * DOOR_HALF_THICKNESS;
    let border = [p0 - offset, p1 - offset, p1 + offset, p0 + offset];
    for (bottom, top) in DOOR_PANELS {
        b.frustum(
            at_height(border, bottom),
            at_height(border, top),
            palette::DOOR,
            None,
        );
    }
}

fn sprites(b: &mut MeshBuilder, ranges: &mut DrawRanges) {
    let marker = [
        Vec3::new(0.0, -1.0, -10.0),
        Vec3::new(-6.0, -1.0, 5.0),
        Vec3::new(6.0, -1.0, 5.0),
    ];

    let player = b.span(|b| b.triangle(marker[0], marker[1], marker[2], Rgb::new(1.0, 0.0, 0.0)));
    ranges.insert(DrawKey::Sprite(SpriteKind::Player), player);

    let ghost = b.span(|b| b.triangle(marker[0], marker[1], marker[2], Rgb::BLACK));
    ranges.insert(DrawKey::Sprite(SpriteKind::Ghost), ghost);

    let pad = b.span(|b| {
        b.hexagon(
            Vec2::ZERO,
            PAD_RADIUS,
            -4.0,
            0.1,
            Rgb::WHITE,
            Rgb::new(0.5, 0.5, 0.5),
        )
    });
    ranges.insert(DrawKey::Sprite(SpriteKind::Pad), pad);
}
