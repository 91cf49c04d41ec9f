//! Textured planet sphere.
//!
//! A UV sphere mesh, five material maps, and a uniform with the model
//! matrix and scene lights. Material maps start as 1×1 fallbacks and are
//! swapped in as the background loader delivers them.

use std::f32::consts::{PI, TAU};

use encase::ShaderType;
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::error::GalaxyError;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{ShaderComposer, PLANET_SHADER};
use crate::gpu::texture::GpuTexture;
use crate::options::PlanetOptions;
use crate::scene::resources::{Disposable, ResourceLedger, ResourceSlot};
use crate::scene::Scene;
use crate::textures::{DecodedTexture, TextureSlot};

/// Sphere vertex. Must match the WGSL `VertexInput`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PlanetVertex {
    /// Position on the unit sphere.
    pub position: [f32; 3],
    /// Outward normal (equal to the position).
    pub normal: [f32; 3],
    /// Direction of increasing `u`.
    pub tangent: [f32; 3],
    /// Texture coordinate, `v = 0` at the north pole.
    pub uv: [f32; 2],
}

/// Generate a unit UV sphere with `width_segments` around the equator and
/// `height_segments` from pole to pole. Seams and poles duplicate
/// vertices so every vertex has a unique UV. The pole rows contribute one
/// triangle per quad instead of two.
#[must_use]
pub fn sphere_mesh(width_segments: u32, height_segments: u32) -> (Vec<PlanetVertex>, Vec<u32>) {
    let width = width_segments.max(3);
    let height = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((width + 1) * (height + 1)) as usize);
    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        let theta = v * PI;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let phi = u * TAU;
            let position = Vec3::new(
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            );
            let tangent = Vec3::new(phi.sin(), 0.0, phi.cos());
            vertices.push(PlanetVertex {
                position: position.to_array(),
                normal: position.normalize_or(Vec3::Y).to_array(),
                tangent: tangent.to_array(),
                uv: [u, v],
            });
        }
    }

    let row = width + 1;
    let mut indices = Vec::with_capacity((width * height * 6) as usize);
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    (vertices, indices)
}

/// Planet transform and lights. Must match the WGSL `PlanetUniform`.
#[derive(Debug, Clone, Copy, ShaderType)]
pub struct PlanetUniform {
    /// Translation and uniform scale.
    pub model: Mat4,
    /// Ambient color times intensity.
    pub ambient: Vec3,
    /// How strongly the AO map darkens ambient light.
    pub ao_intensity: f32,
    /// Unit vector towards the directional light.
    pub light_direction: Vec3,
    /// Displacement map scale along the normal.
    pub displacement_scale: f32,
    /// Directional color times intensity.
    pub light_color: Vec3,
}

/// Vertex and index buffers of one sphere mesh.
pub struct PlanetMesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl PlanetMesh {
    fn upload(device: &wgpu::Device, segments: u32) -> Self {
        let (vertices, indices) = sphere_mesh(segments, segments);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Planet Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Planet Indices"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        Self {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

impl Disposable for PlanetMesh {
    fn resource_count(&self) -> usize {
        2
    }

    fn dispose(self) {
        self.vertices.destroy();
        self.indices.destroy();
    }
}

/// The five material maps and the bind group over them.
struct PlanetMaterial {
    textures: Vec<GpuTexture>,
    sampler: wgpu::Sampler,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl PlanetMaterial {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let visibility = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;
        let mut entries: Vec<_> = TextureSlot::ALL
            .iter()
            .map(|slot| pipeline_helpers::texture_2d(slot.index() as u32, visibility))
            .collect();
        entries.push(pipeline_helpers::filtering_sampler(
            TextureSlot::ALL.len() as u32,
            visibility,
        ));
        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Planet Material Layout"),
                entries: &entries,
            });

        let textures: Vec<GpuTexture> = TextureSlot::ALL
            .iter()
            .map(|slot| {
                GpuTexture::solid(device, queue, slot.file_name(), slot.fallback_pixel())
            })
            .collect();
        let sampler = pipeline_helpers::repeat_sampler(device, "Planet Sampler");
        let bind_group = Self::create_bind_group(device, &layout, &textures, &sampler);

        Self {
            textures,
            sampler,
            layout,
            bind_group,
        }
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        textures: &[GpuTexture],
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        let mut entries: Vec<_> = textures
            .iter()
            .enumerate()
            .map(|(i, texture)| wgpu::BindGroupEntry {
                binding: i as u32,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: textures.len() as u32,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Planet Material Bind Group"),
            layout,
            entries: &entries,
        })
    }

    fn set_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        decoded: &DecodedTexture,
    ) {
        let texture = GpuTexture::from_rgba(
            device,
            queue,
            decoded.slot.file_name(),
            decoded.width,
            decoded.height,
            &decoded.rgba,
        );
        if let Some(old) = self.textures.get_mut(decoded.slot.index()) {
            old.texture.destroy();
            *old = texture;
        }
        self.bind_group =
            Self::create_bind_group(device, &self.layout, &self.textures, &self.sampler);
    }
}

/// Draws the planet.
pub struct PlanetRenderer {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    material: PlanetMaterial,
    mesh: ResourceSlot<PlanetMesh>,
}

impl PlanetRenderer {
    /// Build the pipeline and fallback material; the mesh stays empty
    /// until [`Self::upload`].
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
            "Planet Uniform",
            PlanetUniform::min_size().get(),
        );
        let uniform_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Planet Uniform Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });
        let uniform_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Planet Uniform Bind Group"),
                layout: &uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });
        let material = PlanetMaterial::new(device, &context.queue);

        let shader = shader_composer.compose(
            device,
            "Planet Shader",
            PLANET_SHADER,
            "planet.wgsl",
        )?;
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Planet Pipeline Layout"),
                bind_group_layouts: &[camera_layout, &uniform_layout, &material.layout],
                push_constant_ranges: &[],
            });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Planet Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<PlanetVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x3,
                        3 => Float32x2,
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(pipeline_helpers::depth_state(true)),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            material,
            mesh: ResourceSlot::empty(),
        })
    }

    /// Replace the sphere mesh, disposing the previous buffers first.
    pub fn upload(&mut self, device: &wgpu::Device, segments: u32, ledger: &mut ResourceLedger) {
        let _ = self
            .mesh
            .replace_with(ledger, || PlanetMesh::upload(device, segments));
    }

    /// Swap a decoded map into the material.
    pub fn set_texture(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, decoded: &DecodedTexture) {
        self.material.set_texture(device, queue, decoded);
    }

    /// Write the transform and lights for this frame.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene, options: &PlanetOptions) {
        let lights = scene.lights();
        let uniform = PlanetUniform {
            model: scene.planet().transform(),
            ambient: lights.ambient,
            ao_intensity: options.ao_intensity,
            light_direction: lights.direction(),
            displacement_scale: options.displacement_scale,
            light_color: lights.directional,
        };
        let mut bytes = encase::UniformBuffer::new(Vec::<u8>::new());
        if let Err(e) = bytes.write(&uniform) {
            log::error!("failed to encode planet uniform: {e}");
            return;
        }
        queue.write_buffer(&self.uniform_buffer, 0, &bytes.into_inner());
    }

    /// Record the draw. Expects the camera bound at group 0.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(mesh) = self.mesh.get() else {
            return;
        };
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &self.uniform_bind_group, &[]);
        pass.set_bind_group(2, &self.material.bind_group, &[]);
        pass.set_vertex_buffer(0, mesh.vertices.slice(..));
        pass.set_index_buffer(mesh.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_counts_match_segments() {
        let (vertices, indices) = sphere_mesh(32, 32);
        assert_eq!(vertices.len(), 33 * 33);
        // Two triangles per quad, minus one per quad on each pole row.
        assert_eq!(indices.len(), (32 * 32 * 2 - 2 * 32) * 3);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn sphere_vertices_lie_on_unit_sphere() {
        let (vertices, _) = sphere_mesh(16, 12);
        for v in &vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.length() - 1.0).abs() < 1e-5);
            assert!((Vec3::from_array(v.normal) - p).length() < 1e-5);
            assert!(Vec3::from_array(v.tangent).dot(p).abs() < 1e-5);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        assert_eq!(vertices[0].position[1], 1.0);
        assert!((vertices.last().unwrap().position[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn triangles_wind_outward() {
        let (vertices, indices) = sphere_mesh(24, 16);
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| Vec3::from_array(vertices[i as usize].position));
            let normal = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn degenerate_segments_are_raised() {
        let (vertices, indices) = sphere_mesh(0, 0);
        assert_eq!(vertices.len(), 4 * 3);
        assert!(!indices.is_empty());
    }

    #[test]
    fn uniform_layout_size() {
        // mat4 (64) + two vec3/f32 pairs (32) + vec3 padded to 16.
        assert_eq!(PlanetUniform::min_size().get(), 112);
    }
}
