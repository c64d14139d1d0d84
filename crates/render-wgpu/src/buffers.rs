use wgpu::util::DeviceExt;

use ghostmaze_geometry::MeshData;
use ghostmaze_render::MeshUploader;

/// The maze mesh on the GPU: one buffer per attribute plus `u32` indices.
#[derive(Debug)]
pub struct MeshBuffers {
    pub(crate) positions: wgpu::Buffer,
    pub(crate) normals: wgpu::Buffer,
    pub(crate) colors: wgpu::Buffer,
    pub(crate) indices: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// Uploads built meshes through a borrowed device.
pub struct WgpuUploader<'a> {
    device: &'a wgpu::Device,
}

impl<'a> WgpuUploader<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    fn buffer(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }
}

impl MeshUploader for WgpuUploader<'_> {
    type Handles = MeshBuffers;

    fn upload(&mut self, mesh: &MeshData) -> MeshBuffers {
        let vertex = wgpu::BufferUsages::VERTEX;
        MeshBuffers {
            positions: self.buffer("maze_positions", bytemuck::cast_slice(&mesh.positions), vertex),
            normals: self.buffer("maze_normals", bytemuck::cast_slice(&mesh.normals), vertex),
            colors: self.buffer("maze_colors", bytemuck::cast_slice(&mesh.colors), vertex),
            indices: self.buffer(
                "maze_indices",
                bytemuck::cast_slice(&mesh.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: mesh.index_count() as u32,
        }
    }
}
