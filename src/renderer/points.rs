//! Galaxy point-cloud renderer.
//!
//! Particles are drawn as instanced camera-facing quads: one instance per
//! particle, positions and colors as two per-instance vertex streams, six
//! vertices generated in the shader. Blending is additive and depth is
//! tested but never written, so overlapping particles brighten each other
//! regardless of draw order.

use wgpu::util::DeviceExt;

use crate::error::GalaxyError;
use crate::generator::ParticleBuffers;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, POINTS_SHADER};
use crate::scene::resources::{Disposable, ResourceLedger, ResourceSlot};
use crate::scene::Scene;

/// Per-frame point-cloud uniform. Must match the WGSL `PointsUniform`.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointsUniform {
    /// Rotation of the particle system.
    pub model: [[f32; 4]; 4],
    /// Point size in world units.
    pub size: f32,
    pub(crate) _pad: [f32; 3],
}

/// Vertex streams of one generated galaxy.
pub struct PointCloudBuffers {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    count: u32,
}

impl PointCloudBuffers {
    fn upload(device: &wgpu::Device, particles: &ParticleBuffers) -> Self {
        let positions =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Positions"),
                contents: bytemuck::cast_slice(&particles.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let colors =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Particle Colors"),
                contents: bytemuck::cast_slice(&particles.colors),
                usage: wgpu::BufferUsages::VERTEX,
            });
        Self {
            positions,
            colors,
            count: particles.len() as u32,
        }
    }

    /// Number of particles.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Disposable for PointCloudBuffers {
    fn resource_count(&self) -> usize {
        2
    }

    fn dispose(self) {
        self.positions.destroy();
        self.colors.destroy();
    }
}

/// Draws the particle system.
pub struct PointsRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    cloud: ResourceSlot<PointCloudBuffers>,
}

impl PointsRenderer {
    /// Build the pipeline; the cloud stays empty until [`Self::upload`].
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GalaxyError> {
        let device = &context.device;
        let uniform_buffer = pipeline_helpers::create_uniform_buffer(
            device,
            "Points Uniform",
            size_of::<PointsUniform>() as u64,
        );
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Points Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX,
                )],
            });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Points Bind Group"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = shader_composer.compose(
            device,
            "Points Shader",
            POINTS_SHADER,
            "points.wgsl",
        )?;
        let pipeline = Self::create_pipeline(
            context,
            &shader,
            &[camera_layout, &layout],
        );

        Ok(Self {
            pipeline,
            uniform_buffer,
            bind_group,
            cloud: ResourceSlot::empty(),
        })
    }

    fn create_pipeline(
        context: &RenderContext,
        shader: &wgpu::ShaderModule,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
    ) -> wgpu::RenderPipeline {
        let device = &context.device;
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Points Pipeline Layout"),
                bind_group_layouts,
                push_constant_ranges: &[],
            });

        let stride = (3 * size_of::<f32>()) as wgpu::BufferAddress;
        let vertex_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
            },
            wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![1 => Float32x3],
            },
        ];

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Points Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: Some(additive),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_helpers::depth_state(false)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Replace the uploaded particles, disposing the previous buffers
    /// first.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        particles: &ParticleBuffers,
        ledger: &mut ResourceLedger,
    ) {
        let _ = self
            .cloud
            .replace_with(ledger, || PointCloudBuffers::upload(device, particles));
    }

    /// Write this frame's rotation and point size.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene) {
        let uniform = PointsUniform {
            model: scene.particle_transform().to_cols_array_2d(),
            size: scene.particle_size(),
            _pad: [0.0; 3],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Number of particles currently uploaded.
    #[must_use]
    pub fn particle_count(&self) -> u32 {
        self.cloud.get().map_or(0, PointCloudBuffers::count)
    }

    /// Record the draw. Expects the camera bound at group 0.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(cloud) = self.cloud.get() else {
            return;
        };
        if cloud.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, cloud.positions.slice(..));
        pass.set_vertex_buffer(1, cloud.colors.slice(..));
        pass.draw(0..6, 0..cloud.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_matches_wgsl_layout() {
        // mat4x4<f32> (64) + f32, rounded up to the struct's 16-byte
        // alignment.
        assert_eq!(size_of::<PointsUniform>(), 80);
    }
}
