//! Deduplicating, flat-shaded mesh builder and its primitive constructors.
//!
//! Every triangle computes its own face normal and looks its vertices up by
//! (position, colour, normal). Triangles that share a plane and a colour share
//! vertices; triangles meeting at a crease get their own copies, which gives
//! hard edges without a separate smoothing pass.

use glam::{Vec2, Vec3};
use std::collections::HashMap;

use ghostmaze_common::Rgb;

use crate::ranges::DrawRange;

/// Built vertex attributes plus the shared triangle index list.
///
/// `positions`, `normals` and `colors` are parallel arrays of equal length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Bit-exact key of one vertex: position, colour and normal.
type VertexKey = [u32; 9];

/// `-0.0` and `0.0` must map to the same vertex.
fn key_bits(v: f32) -> u32 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

fn vertex_key(p: Vec3, color: Rgb, normal: Vec3) -> VertexKey {
    let [r, g, b] = color.0;
    [
        key_bits(p.x),
        key_bits(p.y),
        key_bits(p.z),
        key_bits(r),
        key_bits(g),
        key_bits(b),
        key_bits(normal.x),
        key_bits(normal.y),
        key_bits(normal.z),
    ]
}

/// Accumulates one mesh build pass.
///
/// Inputs are in level units with y pointing down into the maze. Stored
/// positions are converted to world units as `(-x, y, z) * scale`; normals are
/// stored as the raw face cross product and normalised in the shader.
pub struct MeshBuilder {
    scale: f32,
    mesh: MeshData,
    lookup: HashMap<VertexKey, u32>,
}

impl MeshBuilder {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            mesh: MeshData::default(),
            lookup: HashMap::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn index_count(&self) -> usize {
        self.mesh.index_count()
    }

    /// Index of the vertex with this exact position, colour and normal,
    /// emitting it on first use.
    pub fn vertex(&mut self, p: Vec3, color: Rgb, normal: Vec3) -> u32 {
        let key = vertex_key(p, color, normal);
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.mesh.positions.len() as u32;
        self.mesh
            .positions
            .push([-p.x * self.scale, p.y * self.scale, p.z * self.scale]);
        self.mesh.colors.push(color.0);
        self.mesh.normals.push(normal.to_array());
        self.lookup.insert(key, index);
        index
    }

    /// Run `f` and return the index range it emitted.
    pub fn span(&mut self, f: impl FnOnce(&mut Self)) -> DrawRange {
        let start = self.index_count();
        f(self);
        DrawRange::between(start, self.index_count())
    }

    pub fn triangle(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, color: Rgb) {
        let normal = (v1 - v0).cross(v2 - v0);
        let i0 = self.vertex(v0, color, normal);
        let i1 = self.vertex(v1, color, normal);
        let i2 = self.vertex(v2, color, normal);
        self.mesh.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Two triangles, (v0, v1, v3) and (v1, v2, v3).
    pub fn quad(&mut self, v0: Vec3, v1: Vec3, v2: Vec3, v3: Vec3, color: Rgb) {
        self.triangle(v0, v1, v3, color);
        self.triangle(v1, v2, v3, color);
    }

    /// Fan-triangulate a ground-plane polygon at height `y`. Assumes a convex
    /// polygon; nothing is validated.
    pub fn polygon(&mut self, points: &[Vec2], y: f32, color: Rgb) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let a = Vec3::new(first.x, y, first.y);
        for pair in rest.windows(2) {
            let b = Vec3::new(pair[0].x, y, pair[0].y);
            let c = Vec3::new(pair[1].x, y, pair[1].y);
            self.triangle(a, b, c, color);
        }
    }

    /// A polygon at `y0` plus one wall quad per edge (wrapping) down to `y1`.
    pub fn polygon_with_walls(&mut self, points: &[Vec2], y0: f32, y1: f32, floor: Rgb, wall: Rgb) {
        self.polygon(points, y0, floor);
        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.quad(
                Vec3::new(a.x, y1, a.y),
                Vec3::new(b.x, y1, b.y),
                Vec3::new(b.x, y0, b.y),
                Vec3::new(a.x, y0, a.y),
                wall,
            );
        }
    }

    /// Hexagonal column: six points at 60 degree steps around `center`.
    pub fn hexagon(&mut self, center: Vec2, radius: f32, y0: f32, y1: f32, floor: Rgb, wall: Rgb) {
        let points = hexagon_points(center, radius);
        self.polygon_with_walls(&points, y0, y1, floor, wall);
    }

    /// Slab between two quads given anticlockwise (seen from above). Emits the
    /// top face in `color` and four sides in `side` (or `color`). The bottom
    /// face is never visible from inside the maze and is left out.
    pub fn frustum(&mut self, b: [Vec3; 4], t: [Vec3; 4], color: Rgb, side: Option<Rgb>) {
        let side = side.unwrap_or(color);
        self.quad(t[0], t[1], t[2], t[3], color);
        self.quad(b[0], b[1], t[1], t[0], side);
        self.quad(b[0], t[0], t[3], b[3], side);
        self.quad(b[3], t[3], t[2], b[2], side);
        self.quad(b[2], t[2], t[1], b[1], side);
    }

    pub fn finish(self) -> MeshData {
        self.mesh
    }
}

/// Corners of a hexagon, starting straight "down" the level's y axis.
pub fn hexagon_points(center: Vec2, radius: f32) -> [Vec2; 6] {
    std::array::from_fn(|i| {
        let angle = (i as f32 / 6.0) * std::f32::consts::TAU;
        Vec2::new(angle.sin(), angle.cos()) * radius + center
    })
}

/// Lift a ground-plane quad to height `y`.
pub fn at_height(quad: [Vec2; 4], y: f32) -> [Vec3; 4] {
    quad.map(|p| Vec3::new(p.x, y, p.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);
    const BLUE: Rgb = Rgb::new(0.0, 0.0, 1.0);

    #[test]
    fn same_key_twice_is_one_vertex() {
        let mut b = MeshBuilder::new(1.0);
        let i = b.vertex(Vec3::new(1.0, 2.0, 3.0), RED, Vec3::Y);
        let j = b.vertex(Vec3::new(1.0, 2.0, 3.0), RED, Vec3::Y);
        assert_eq!(i, j);
        assert_eq!(b.vertex_count(), 1);
    }

    #[test]
    fn different_normal_is_new_vertex() {
        let mut b = MeshBuilder::new(1.0);
        let i = b.vertex(Vec3::ONE, RED, Vec3::Y);
        let j = b.vertex(Vec3::ONE, RED, Vec3::X);
        let k = b.vertex(Vec3::ONE, BLUE, Vec3::Y);
        assert_ne!(i, j);
        assert_ne!(i, k);
        assert_eq!(b.vertex_count(), 3);
    }

    #[test]
    fn signed_zero_shares_a_vertex() {
        let mut b = MeshBuilder::new(1.0);
        let i = b.vertex(Vec3::new(0.0, 1.0, 0.0), RED, Vec3::Y);
        let j = b.vertex(Vec3::new(-0.0, 1.0, 0.0), RED, Vec3::Y);
        assert_eq!(i, j);
    }

    #[test]
    fn positions_are_mirrored_and_scaled() {
        let mut b = MeshBuilder::new(0.5);
        b.vertex(Vec3::new(2.0, 4.0, 6.0), RED, Vec3::Y);
        let mesh = b.finish();
        assert_eq!(mesh.positions[0], [-1.0, 2.0, 3.0]);
        assert_eq!(mesh.colors[0], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.normals[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn quad_splits_along_one_three() {
        let v = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let mut b = MeshBuilder::new(1.0);
        b.quad(v[0], v[1], v[2], v[3], RED);
        let mesh = b.finish();

        // Coplanar, same colour: four shared vertices, six indices.
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);

        let corner = |i: u32| {
            let [x, y, z] = mesh.positions[i as usize];
            Vec3::new(-x, y, z)
        };
        let tris: Vec<[Vec3; 3]> = mesh
            .indices
            .chunks(3)
            .map(|t| [corner(t[0]), corner(t[1]), corner(t[2])])
            .collect();
        assert_eq!(tris[0], [v[0], v[1], v[3]]);
        assert_eq!(tris[1], [v[1], v[2], v[3]]);
    }

    #[test]
    fn triangle_normal_is_face_cross_product() {
        let mut b = MeshBuilder::new(1.0);
        b.triangle(Vec3::ZERO, Vec3::X * 2.0, Vec3::Z * 3.0, RED);
        let mesh = b.finish();
        // (2,0,0) x (0,0,3) = (0,-6,0)
        assert!(mesh.normals.iter().all(|n| *n == [0.0, -6.0, 0.0]));
    }

    #[test]
    fn creased_triangles_do_not_share_vertices() {
        let mut b = MeshBuilder::new(1.0);
        // Two triangles sharing an edge but folded 90 degrees.
        b.triangle(Vec3::ZERO, Vec3::X, Vec3::Z, RED);
        b.triangle(Vec3::ZERO, Vec3::Y, Vec3::X, RED);
        assert_eq!(b.vertex_count(), 6);
    }

    #[test]
    fn polygon_fan_emits_n_minus_two_triangles() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 1.0),
        ];
        let mut b = MeshBuilder::new(1.0);
        b.polygon(&pts, 1.0, RED);
        assert_eq!(b.index_count(), 3 * 3);
    }

    #[test]
    fn degenerate_polygons_emit_nothing() {
        let mut b = MeshBuilder::new(1.0);
        b.polygon(&[], 0.0, RED);
        b.polygon(&[Vec2::ZERO, Vec2::X], 0.0, RED);
        assert_eq!(b.index_count(), 0);
    }

    #[test]
    fn hexagon_has_cap_and_six_walls() {
        let mut b = MeshBuilder::new(1.0);
        let range = b.span(|b| b.hexagon(Vec2::ZERO, 5.0, -1.0, 1.0, RED, BLUE));
        // 4 cap triangles + 6 quads of 2 triangles.
        assert_eq!(range.count, (4 + 12) * 3);
        assert_eq!(range.start, 0);
    }

    #[test]
    fn hexagon_points_are_on_the_circle() {
        let pts = hexagon_points(Vec2::new(10.0, 20.0), 6.0);
        assert!((pts[0] - Vec2::new(10.0, 26.0)).length() < 1e-4);
        for p in pts {
            assert!(((p - Vec2::new(10.0, 20.0)).length() - 6.0).abs() < 1e-4);
        }
    }

    #[test]
    fn frustum_omits_bottom_face() {
        let bottom = at_height([Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y], 1.0);
        let top = at_height([Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y], -1.0);
        let mut b = MeshBuilder::new(1.0);
        let range = b.span(|b| b.frustum(bottom, top, RED, Some(BLUE)));
        assert_eq!(range.count, 5 * 6);
        let mesh = b.finish();
        let reds = mesh.colors.iter().filter(|c| **c == RED.0).count();
        assert_eq!(reds, 4);
    }
}
