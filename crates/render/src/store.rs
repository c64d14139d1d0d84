use ghostmaze_geometry::{DrawRanges, MeshBuildOutput, MeshData};

/// Moves a built mesh into backend storage.
pub trait MeshUploader {
    type Handles;

    fn upload(&mut self, mesh: &MeshData) -> Self::Handles;
}

/// Uploaded mesh handles together with the draw ranges that index them.
///
/// The two only change together, so a draw range can never point into a
/// buffer it was not built for.
#[derive(Debug)]
pub struct MeshStore<H> {
    handles: H,
    ranges: DrawRanges,
    vertex_count: usize,
    index_count: usize,
    generation: u32,
}

impl<H> MeshStore<H> {
    pub fn upload<U>(uploader: &mut U, output: MeshBuildOutput) -> Self
    where
        U: MeshUploader<Handles = H>,
    {
        let _span = tracing::info_span!("mesh_upload").entered();
        let MeshBuildOutput { mesh, ranges } = output;
        let handles = uploader.upload(&mesh);
        tracing::info!(
            vertices = mesh.vertex_count(),
            indices = mesh.index_count(),
            ranges = ranges.len(),
            "mesh uploaded"
        );
        Self {
            handles,
            ranges,
            vertex_count: mesh.vertex_count(),
            index_count: mesh.index_count(),
            generation: 0,
        }
    }

    /// Swap in a freshly built mesh. The old handles are dropped.
    pub fn replace<U>(&mut self, uploader: &mut U, output: MeshBuildOutput)
    where
        U: MeshUploader<Handles = H>,
    {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::upload(uploader, output)
        };
    }

    pub fn handles(&self) -> &H {
        &self.handles
    }

    pub fn ranges(&self) -> &DrawRanges {
        &self.ranges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Number of times the mesh has been replaced.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghostmaze_geometry::build;
    use ghostmaze_level::demo_level_set;

    #[derive(Default)]
    struct CountingUploader {
        uploads: usize,
    }

    impl MeshUploader for CountingUploader {
        type Handles = usize;

        fn upload(&mut self, mesh: &MeshData) -> usize {
            self.uploads += 1;
            mesh.index_count()
        }
    }

    #[test]
    fn upload_keeps_ranges_with_handles() {
        let levels = demo_level_set();
        let mut uploader = CountingUploader::default();
        let store = MeshStore::upload(&mut uploader, build(levels.iter()));
        assert_eq!(*store.handles(), store.index_count());
        assert!(!store.ranges().is_empty());
        assert_eq!(store.generation(), 0);
        assert_eq!(uploader.uploads, 1);
    }

    #[test]
    fn replace_swaps_both() {
        let levels = demo_level_set();
        let mut uploader = CountingUploader::default();
        let mut store = MeshStore::upload(&mut uploader, build(levels.iter()));
        let first = store.index_count();

        let one_level = levels.iter().take(1);
        store.replace(&mut uploader, build(one_level));
        assert!(store.index_count() < first);
        assert_eq!(*store.handles(), store.index_count());
        assert_eq!(store.ranges().level(levels.iter().nth(1).unwrap().id), None);
        assert_eq!(store.generation(), 1);
        assert_eq!(uploader.uploads, 2);
    }
}
