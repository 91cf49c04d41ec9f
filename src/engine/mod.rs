//! The render engine: owns the GPU context, camera, scene and renderers,
//! and runs one frame per [`GalaxyEngine::update`] +
//! [`GalaxyEngine::render`] pair.

pub mod command;
mod input;
mod options;

use serde::Serialize;
use web_time::Instant;

use crate::camera::controller::CameraController;
use crate::error::GalaxyError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::input::InputProcessor;
use crate::options::Options;
use crate::renderer::SceneRenderer;
use crate::scene::resources::ResourceLedger;
use crate::scene::Scene;
use crate::textures::TextureLoader;
use crate::util::clock::Clock;
use crate::util::frame_timing::FrameTiming;
use crate::util::viewport::Viewport;

/// Live numbers for the options panel's stats block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EngineStats {
    /// Smoothed frames per second.
    pub fps: f32,
    /// Particles on the GPU.
    pub particles: u32,
    /// Live scene GPU buffers.
    pub live_buffers: usize,
    /// Seed of the current galaxy.
    pub seed: u64,
    /// Surface width in physical pixels.
    pub width: u32,
    /// Surface height in physical pixels.
    pub height: u32,
}

/// Galaxy render engine.
pub struct GalaxyEngine {
    context: RenderContext,
    camera: CameraController,
    renderer: SceneRenderer,
    scene: Scene,
    ledger: ResourceLedger,
    options: Options,
    viewport: Viewport,
    input: InputProcessor,
    textures: Option<TextureLoader>,
    clock: Clock,
    frame_timing: FrameTiming,
}

impl GalaxyEngine {
    /// Create the engine on a window or canvas surface of `size` physical
    /// pixels, generate the first galaxy and upload it.
    ///
    /// `textures` delivers the planet's material maps; without one the
    /// planet keeps its flat fallback material.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError::Gpu`] if the GPU context cannot be created
    /// and [`GalaxyError::Shader`] if a pipeline shader fails to compose.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
        textures: Option<TextureLoader>,
    ) -> Result<Self, GalaxyError> {
        let context = RenderContext::new(window, size).await?;
        let (width, height) = context.size();

        let mut shader_composer = ShaderComposer::new()?;
        let camera =
            CameraController::new(&context.device, &options.camera, width, height);
        let mut renderer =
            SceneRenderer::new(&context, &camera.layout, &mut shader_composer)?;

        let mut ledger = ResourceLedger::new();
        let scene = Scene::new(&options, rand::random());
        renderer.upload_scene(&context.device, &scene, &mut ledger);
        log::info!(
            "galaxy ready: {} particles, {width}x{height}",
            scene.particles().len()
        );

        let mut engine = Self {
            context,
            camera,
            renderer,
            scene,
            ledger,
            input: InputProcessor::with_key_bindings(options.keybindings.clone()),
            options,
            viewport: Viewport::new(width, height),
            textures,
            clock: Clock::start(),
            frame_timing: FrameTiming::new(),
        };
        engine.apply_options();
        Ok(engine)
    }

    /// Advance one frame: pick up loaded textures, spin the particles by
    /// the elapsed time, step the damped orbit, and write uniforms.
    pub fn update(&mut self) {
        self.poll_textures();

        let elapsed = self.clock.elapsed_secs();
        self.scene
            .advance(elapsed, self.options.animation.rotation_speed);

        self.camera.update();
        self.camera.update_gpu(&self.context.queue);
        self.renderer
            .update(&self.context.queue, &self.scene, &self.options.planet);
    }

    /// Draw the frame and present it.
    ///
    /// # Errors
    ///
    /// Returns the [`wgpu::SurfaceError`] from acquiring the frame. `Lost`
    /// and `Outdated` call for [`Self::reconfigure`].
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.context.create_encoder();
        self.renderer
            .encode(&mut encoder, &view, &self.camera.bind_group);
        self.context.submit(encoder);
        frame.present();

        let _ = self.frame_timing.end_frame();
        Ok(())
    }

    /// Resize the surface, depth target and camera aspect together.
    /// Ignores zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if !self.viewport.resize(width, height) {
            return;
        }
        let (width, height) = self.viewport.size();
        self.context.resize(width, height);
        self.renderer.resize(&self.context.device, width, height);
        self.camera.fit_viewport(&self.viewport);
        log::debug!("resized to {width}x{height}");
    }

    /// Reconfigure the surface at its current size.
    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Rebuild the galaxy and planet from the current options and seed.
    /// The previous GPU buffers are released before the new ones are
    /// created.
    pub fn regenerate(&mut self) {
        let started = Instant::now();
        self.scene.regenerate(&self.options);
        self.upload_scene(started);
    }

    /// Rebuild the galaxy from a new seed.
    pub fn regenerate_with_seed(&mut self, seed: u64) {
        let started = Instant::now();
        self.scene.reseed(&self.options, seed);
        self.upload_scene(started);
    }

    fn upload_scene(&mut self, started: Instant) {
        self.renderer
            .upload_scene(&self.context.device, &self.scene, &mut self.ledger);
        log::debug!(
            "generation {}: {} particles in {:.1?} ({} live scene buffers)",
            self.scene.generation(),
            self.scene.particles().len(),
            started.elapsed(),
            self.ledger.live()
        );
    }

    fn poll_textures(&mut self) {
        let Some(loader) = self.textures.as_mut() else {
            return;
        };
        for decoded in loader.poll() {
            self.renderer.set_texture(&self.context, &decoded);
        }
        if loader.is_finished() {
            self.textures = None;
        }
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Particles currently on the GPU.
    #[must_use]
    pub fn particle_count(&self) -> u32 {
        self.renderer.particle_count()
    }

    /// Live scene GPU allocations.
    #[must_use]
    pub fn resources(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// CPU-side scene state.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Snapshot of the numbers the panel shows.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        let (width, height) = self.viewport.size();
        EngineStats {
            fps: self.fps(),
            particles: self.particle_count(),
            live_buffers: self.ledger.live(),
            seed: self.scene.seed(),
            width,
            height,
        }
    }
}
