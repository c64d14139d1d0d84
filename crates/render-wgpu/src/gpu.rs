use bytemuck::{Pod, Zeroable};

use ghostmaze_render::{DrawLog, UniformState};

use crate::buffers::MeshBuffers;
use crate::program::{DEPTH_FORMAT, ShaderProgram};

/// `DrawUniforms` in the shader, laid out for WGSL uniform rules.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    player_light: [f32; 3],
    surface_sensitivity: f32,
    ambient: [f32; 3],
    _pad0: f32,
    translation: [f32; 3],
    _pad1: f32,
}

impl From<&UniformState> for GpuUniforms {
    fn from(u: &UniformState) -> Self {
        Self {
            projection: u.projection.to_cols_array_2d(),
            view: u.view.to_cols_array_2d(),
            player_light: u.player_light.to_array(),
            surface_sensitivity: u.surface_sensitivity,
            ambient: u.ambient.to_array(),
            _pad0: 0.0,
            translation: u.translation.to_array(),
            _pad1: 0.0,
        }
    }
}

fn align_to(size: u64, alignment: u64) -> u64 {
    size.div_ceil(alignment) * alignment
}

/// Numbers from the last submitted frame, for overlays and logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: usize,
    pub skipped: usize,
}

/// Replays recorded frames on the GPU.
///
/// Each draw gets its own slot in one uniform buffer, addressed with a
/// dynamic offset, so a whole frame uploads its uniforms in one write.
pub struct WgpuRenderer {
    program: ShaderProgram,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniform_stride: u64,
    uniform_capacity: usize,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    const INITIAL_DRAW_CAPACITY: usize = 64;

    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Self, ghostmaze_render::ProgramError> {
        let program = ShaderProgram::new(device, surface_format)?;
        let uniform_stride = align_to(
            std::mem::size_of::<GpuUniforms>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let (uniform_buffer, uniform_bind_group) = Self::create_uniforms(
            device,
            &program,
            uniform_stride,
            Self::INITIAL_DRAW_CAPACITY,
        );

        Ok(Self {
            depth_texture: Self::create_depth_texture(device, width, height),
            program,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            uniform_capacity: Self::INITIAL_DRAW_CAPACITY,
            surface_format,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Draw every call recorded in `frame` into `view`.
    pub fn submit(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        mesh: &MeshBuffers,
        frame: &DrawLog,
    ) -> FrameStats {
        let calls = frame.calls();
        let mut stats = FrameStats::default();
        self.ensure_capacity(device, calls.len());

        if !calls.is_empty() {
            let stride = self.uniform_stride as usize;
            let size = std::mem::size_of::<GpuUniforms>();
            let mut bytes = vec![0u8; stride * calls.len()];
            for (i, call) in calls.iter().enumerate() {
                let offset = i * stride;
                bytes[offset..offset + size]
                    .copy_from_slice(bytemuck::bytes_of(&GpuUniforms::from(&call.uniforms)));
            }
            queue.write_buffer(&self.uniform_buffer, 0, &bytes);
        }

        let color_load = match frame.clears().last() {
            Some(&[r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            }),
            None => wgpu::LoadOp::Load,
        };

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("maze_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("maze_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if mesh.index_count() > 0 {
                pass.set_pipeline(self.program.pipeline());
                pass.set_vertex_buffer(0, mesh.positions.slice(..));
                pass.set_vertex_buffer(1, mesh.normals.slice(..));
                pass.set_vertex_buffer(2, mesh.colors.slice(..));
                pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);

                for (i, call) in calls.iter().enumerate() {
                    if call.range.is_empty() || call.range.end() > mesh.index_count() {
                        stats.skipped += 1;
                        continue;
                    }
                    let offset = (i as u64 * self.uniform_stride) as u32;
                    pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                    pass.draw_indexed(call.range.start..call.range.end(), 0, 0..1);
                    stats.draw_calls += 1;
                }
            } else {
                stats.skipped = calls.len();
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        if stats.skipped > 0 {
            tracing::debug!(skipped = stats.skipped, "draws outside the uploaded mesh were skipped");
        }
        stats
    }

    fn ensure_capacity(&mut self, device: &wgpu::Device, draws: usize) {
        if draws <= self.uniform_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        tracing::debug!(capacity, "growing draw uniform buffer");
        let (buffer, bind_group) =
            Self::create_uniforms(device, &self.program, self.uniform_stride, capacity);
        self.uniform_buffer = buffer;
        self.uniform_bind_group = bind_group;
        self.uniform_capacity = capacity;
    }

    fn create_uniforms(
        device: &wgpu::Device,
        program: &ShaderProgram,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniform_bind_group"),
            layout: program.uniform_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<GpuUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
