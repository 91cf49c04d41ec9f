use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio, used to keep point quads square.
    pub aspect: f32,
}

impl Camera {
    /// Camera looking at the origin from `initial_distance` along +Z.
    #[must_use]
    pub fn from_options(options: &CameraOptions, width: u32, height: u32) -> Self {
        let mut camera = Self {
            eye: Vec3::new(0.0, 0.0, options.initial_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };
        camera.resize(width, height);
        camera
    }

    /// Take the projection parameters (field of view and clip planes)
    /// from `options`. A far plane not beyond the near one is pushed out.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.fovy = options.fovy;
        self.znear = options.znear.max(1e-4);
        self.zfar = options.zfar.max(self.znear * 2.0);
    }

    /// Set `aspect = width / height`. Ignores zero-sized dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, self.target, self.up);
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        let proj = Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        );
        proj * view
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_sets_aspect_to_width_over_height() {
        let mut camera = Camera::from_options(&CameraOptions::default(), 800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        camera.resize(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        camera.resize(500, 1000);
        assert!((camera.aspect - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_resize_is_ignored() {
        let mut camera = Camera::from_options(&CameraOptions::default(), 400, 200);
        camera.resize(0, 300);
        camera.resize(300, 0);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn apply_options_updates_projection_planes() {
        let mut camera = Camera::from_options(&CameraOptions::default(), 800, 600);
        let options = CameraOptions {
            fovy: 50.0,
            znear: 0.5,
            zfar: 40.0,
            ..CameraOptions::default()
        };
        camera.apply_options(&options);
        assert_eq!(camera.fovy, 50.0);
        assert_eq!(camera.znear, 0.5);
        assert_eq!(camera.zfar, 40.0);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);

        // A point just past the new far plane is clipped.
        let clip = camera.build_matrix() * glam::Vec4::new(0.0, 0.0, 3.0 - 41.0, 1.0);
        assert!(clip.z / clip.w > 1.0);
    }

    #[test]
    fn starts_on_positive_z_looking_at_origin() {
        let camera = Camera::from_options(&CameraOptions::default(), 1, 1);
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.target, Vec3::ZERO);
        // The origin projects to the center of the screen.
        let clip = camera.build_matrix() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
    }

    #[test]
    fn uniform_tracks_camera() {
        let camera = Camera::from_options(&CameraOptions::default(), 300, 100);
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        assert_eq!(uniform.position, [0.0, 0.0, 3.0]);
        assert!((uniform.aspect - 3.0).abs() < 1e-6);
        assert_eq!(size_of::<CameraUniform>(), 80);
    }
}
