use glam::Vec2;
use wgpu::util::DeviceExt;

use super::core::{Camera, CameraUniform};
use super::orbit::OrbitControls;
use crate::gpu::pipeline_helpers;
use crate::options::CameraOptions;
use crate::util::viewport::Viewport;

/// Orbit camera plus the uniform buffer and bind group shaders read it from.
pub struct CameraController {
    /// Projection and view state.
    pub camera: Camera,
    /// Damped orbit driving `camera.eye`.
    pub orbit: OrbitControls,
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// GPU uniform buffer.
    pub buffer: wgpu::Buffer,
    /// Bind group layout (group 0 in every scene pipeline).
    pub layout: wgpu::BindGroupLayout,
    /// Bind group over `buffer`.
    pub bind_group: wgpu::BindGroup,
    viewport_height: f32,
}

impl CameraController {
    /// Create the camera for a `width × height` viewport.
    pub fn new(
        device: &wgpu::Device,
        options: &CameraOptions,
        width: u32,
        height: u32,
    ) -> Self {
        let camera = Camera::from_options(options, width, height);
        let orbit = OrbitControls::new(camera.eye, camera.target, options);

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);

        let buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                )],
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Camera Bind Group"),
        });

        Self {
            camera,
            orbit,
            uniform,
            buffer,
            layout,
            bind_group,
            viewport_height: height.max(1) as f32,
        }
    }

    /// Advance the damped orbit one frame and move the eye.
    pub fn update(&mut self) {
        let _ = self.orbit.update();
        self.camera.eye = self.orbit.eye();
        self.camera.target = self.orbit.target();
    }

    /// Write the uniform for the current camera state.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Match the projection and drag scaling to `viewport`.
    pub fn fit_viewport(&mut self, viewport: &Viewport) {
        viewport.fit_camera(&mut self.camera);
        self.viewport_height = viewport.size().1 as f32;
    }

    /// Queue an orbit drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.orbit.rotate(delta, self.viewport_height);
    }

    /// Queue a pan drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.orbit.pan(delta, self.viewport_height, self.camera.fovy);
    }

    /// Queue a dolly of `steps` wheel steps.
    pub fn zoom(&mut self, steps: f32) {
        self.orbit.zoom(steps);
    }

    /// Return to the starting view.
    pub fn reset(&mut self) {
        self.orbit.reset();
        self.camera.eye = self.orbit.eye();
        self.camera.target = self.orbit.target();
    }

    /// Apply changed camera options (projection, damping, speeds).
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.apply_options(options);
        self.orbit.apply_options(options);
    }
}
