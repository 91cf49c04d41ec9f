//! Scene renderers.
//!
//! One render pass per frame: the opaque planet first, then the additive
//! point cloud, which tests against the planet's depth without writing
//! its own.

pub mod planet;
pub mod points;

use crate::error::GalaxyError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::gpu::texture::DepthTarget;
use crate::options::PlanetOptions;
use crate::scene::resources::ResourceLedger;
use crate::scene::Scene;
use crate::textures::DecodedTexture;
use planet::PlanetRenderer;
use points::PointsRenderer;

/// Planet and point-cloud renderers plus the shared depth target.
pub struct SceneRenderer {
    planet: PlanetRenderer,
    points: PointsRenderer,
    depth: DepthTarget,
}

impl SceneRenderer {
    /// Build both pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::Shader`] if a shader fails to compose.
    pub fn new(
        context: &RenderContext,
        camera_layout: &wgpu::BindGroupLayout,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, GalaxyError> {
        let (width, height) = context.size();
        Ok(Self {
            planet: PlanetRenderer::new(context, camera_layout, shader_composer)?,
            points: PointsRenderer::new(context, camera_layout, shader_composer)?,
            depth: DepthTarget::new(&context.device, width, height),
        })
    }

    /// Upload the scene's particles and planet mesh, disposing whatever
    /// the previous generation left on the GPU first.
    pub fn upload_scene(
        &mut self,
        device: &wgpu::Device,
        scene: &Scene,
        ledger: &mut ResourceLedger,
    ) {
        self.points.upload(device, scene.particles(), ledger);
        self.planet.upload(device, scene.planet().segments, ledger);
    }

    /// Swap a decoded material map into the planet.
    pub fn set_texture(&mut self, context: &RenderContext, decoded: &DecodedTexture) {
        self.planet
            .set_texture(&context.device, &context.queue, decoded);
    }

    /// Recreate the depth target if the surface size changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width > 0 && height > 0 && self.depth.size() != (width, height) {
            self.depth = DepthTarget::new(device, width, height);
        }
    }

    /// Number of particles on the GPU.
    #[must_use]
    pub fn particle_count(&self) -> u32 {
        self.points.particle_count()
    }

    /// Write per-frame uniforms.
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene, planet: &PlanetOptions) {
        self.planet.update(queue, scene, planet);
        self.points.update(queue, scene);
    }

    /// Record the frame's single render pass into `encoder`.
    pub fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Discard,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        pass.set_bind_group(0, camera_bind_group, &[]);
        self.planet.draw(&mut pass);
        self.points.draw(&mut pass);
    }
}
