use crate::camera::core::Camera;

/// Size of the render surface in physical pixels.
///
/// The engine keeps one of these and sizes the surface, the depth target
/// and the camera from it, so all three always agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Viewport of `width × height`, with zero dimensions raised to one.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Adopt a new size. Returns `false` and keeps the old size when
    /// either dimension is zero (a minimized window).
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// `(width, height)` in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Point `camera` at this viewport's aspect ratio.
    pub fn fit_camera(&self, camera: &mut Camera) {
        camera.resize(self.width, self.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CameraOptions;

    fn aspect(viewport: Viewport) -> f32 {
        let (w, h) = viewport.size();
        w as f32 / h as f32
    }

    #[test]
    fn zero_dimensions_keep_previous_size() {
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(0, 600));
        assert!(!viewport.resize(800, 0));
        assert_eq!(viewport.size(), (800, 600));
        assert!(viewport.resize(1024, 512));
        assert_eq!(viewport.size(), (1024, 512));
        assert!((aspect(viewport) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn camera_follows_every_resize() {
        let mut viewport = Viewport::new(640, 480);
        let mut camera = Camera::from_options(&CameraOptions::default(), 640, 480);
        for (w, h) in [(1920, 1080), (0, 700), (300, 900), (1, 1), (500, 0)] {
            if viewport.resize(w, h) {
                viewport.fit_camera(&mut camera);
            }
            assert!((camera.aspect - aspect(viewport)).abs() < 1e-6, "{w}x{h}");
        }
        assert_eq!(viewport.size(), (1, 1));
    }

    #[test]
    fn new_never_holds_zero() {
        assert_eq!(Viewport::new(0, 0).size(), (1, 1));
    }
}
