use std::fmt;

use ghostmaze_geometry::{DrawRange, MeshData};

use crate::store::MeshUploader;
use crate::target::{DrawTarget, Uniform, UniformState};

/// One recorded draw and the uniforms it was issued with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub range: DrawRange,
    pub uniforms: UniformState,
}

/// Uploaded mesh sizes, standing in for GPU buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeshSummary {
    pub vertices: usize,
    pub indices: usize,
}

/// A [`DrawTarget`] that records instead of rendering.
///
/// Used by the CLI's `frame` command and by tests that check what a frame
/// draws and with which uniforms. `Display` prints a readable dump.
#[derive(Debug, Clone, Default)]
pub struct DrawLog {
    current: UniformState,
    clears: Vec<[f32; 4]>,
    uniform_writes: usize,
    calls: Vec<DrawCall>,
}

impl DrawLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn ranges(&self) -> Vec<DrawRange> {
        self.calls.iter().map(|c| c.range).collect()
    }

    pub fn clears(&self) -> &[[f32; 4]] {
        &self.clears
    }

    pub fn uniform_writes(&self) -> usize {
        self.uniform_writes
    }

    /// Uniforms as they stand after the last write.
    pub fn current(&self) -> &UniformState {
        &self.current
    }

    /// Forget recorded calls but keep uniform state, like a new frame would.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.clears.clear();
        self.uniform_writes = 0;
    }
}

impl DrawTarget for DrawLog {
    fn clear(&mut self, color: [f32; 4]) {
        self.clears.push(color);
    }

    fn set_uniform(&mut self, uniform: Uniform) {
        self.uniform_writes += 1;
        self.current.apply(uniform);
    }

    fn draw(&mut self, range: DrawRange) {
        self.calls.push(DrawCall {
            range,
            uniforms: self.current,
        });
    }
}

impl MeshUploader for DrawLog {
    type Handles = MeshSummary;

    fn upload(&mut self, mesh: &MeshData) -> MeshSummary {
        MeshSummary {
            vertices: mesh.vertex_count(),
            indices: mesh.index_count(),
        }
    }
}

impl fmt::Display for DrawLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Frame (clears={}, uniform writes={}, draws={}) ===",
            self.clears.len(),
            self.uniform_writes,
            self.calls.len()
        )?;
        for (i, call) in self.calls.iter().enumerate() {
            let u = &call.uniforms;
            writeln!(
                f,
                "  [{i:>3}] indices {}..{} ({} tris) sens={:.2} ambient=({:.2}, {:.2}, {:.2}) translate=({:.3}, {:.3}, {:.3})",
                call.range.start,
                call.range.end(),
                call.range.count / 3,
                u.surface_sensitivity,
                u.ambient.x,
                u.ambient.y,
                u.ambient.z,
                u.translation.x,
                u.translation.y,
                u.translation.z,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn records_uniforms_at_draw_time() {
        let mut log = DrawLog::new();
        log.set_uniform(Uniform::Ambient(Vec3::new(0.5, 0.0, 0.0)));
        log.draw(DrawRange::between(0, 6));
        log.set_uniform(Uniform::Ambient(Vec3::ONE));
        log.draw(DrawRange::between(6, 12));

        assert_eq!(log.calls().len(), 2);
        assert_eq!(log.calls()[0].uniforms.ambient, Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(log.calls()[1].uniforms.ambient, Vec3::ONE);
        assert_eq!(log.uniform_writes(), 2);
    }

    #[test]
    fn display_lists_draws() {
        let mut log = DrawLog::new();
        log.clear([0.0, 0.0, 0.0, 1.0]);
        log.draw(DrawRange::between(0, 6));
        let text = log.to_string();
        assert!(text.contains("draws=1"));
        assert!(text.contains("indices 0..6 (2 tris)"));
    }

    #[test]
    fn clear_calls_keeps_state() {
        let mut log = DrawLog::new();
        log.set_uniform(Uniform::SurfaceSensitivity(0.4));
        log.draw(DrawRange::between(0, 3));
        log.clear_calls();
        assert!(log.calls().is_empty());
        assert_eq!(log.current().surface_sensitivity, 0.4);
    }
}
