//! Damped spherical orbit around a target point.
//!
//! Input accumulates pending rotation, pan and zoom. Each [`update`]
//! applies `damping_factor` of what is pending and keeps the rest, so the
//! camera glides to a stop instead of halting when input ends.
//!
//! [`update`]: OrbitControls::update

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::options::CameraOptions;

/// Polar angle keeps this far from the poles so `look_at` stays defined.
const POLAR_EPSILON: f32 = 1e-3;
/// Per-wheel-step distance factor before `zoom_speed` is applied.
const ZOOM_STEP: f32 = 0.95;
/// Pending motion below this magnitude counts as settled.
const SETTLE_THRESHOLD: f32 = 1e-5;

/// Spherical orbit state plus pending, not yet applied, motion.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    target: Vec3,
    distance: f32,
    /// Angle about +Y, measured from +Z towards +X.
    azimuth: f32,
    /// Angle from +Y.
    polar: f32,

    pending_rotation: Vec2,
    pending_pan: Vec3,
    /// Pending change of `ln(distance)`.
    pending_zoom: f32,

    damping_factor: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,

    home_target: Vec3,
    home_eye: Vec3,
}

impl OrbitControls {
    /// Orbit placing the eye at `eye` around `target`.
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, options: &CameraOptions) -> Self {
        let mut controls = Self {
            target,
            distance: 1.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
            pending_zoom: 0.0,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::MAX,
            home_target: target,
            home_eye: eye,
        };
        controls.apply_options(options);
        controls.look_from(eye, target);
        controls
    }

    /// Pick up speed, damping and distance limits from `options`.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.damping_factor = options.damping_factor.clamp(0.01, 1.0);
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.min_distance = options.znear * 2.0;
        self.max_distance = (options.zfar * 0.9).max(self.min_distance);
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    fn look_from(&mut self, eye: Vec3, target: Vec3) {
        let offset = eye - target;
        self.target = target;
        self.distance = offset
            .length()
            .clamp(self.min_distance, self.max_distance);
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = if offset.length_squared() > 0.0 {
            (offset.y / offset.length()).clamp(-1.0, 1.0).acos()
        } else {
            PI / 2.0
        };
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Queue a rotation for a drag of `delta` pixels on a viewport
    /// `viewport_height` pixels tall. A drag of the full height turns one
    /// revolution.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.pending_rotation -= delta * (TAU / height) * self.rotate_speed;
    }

    /// Queue a pan so the point under the cursor follows a drag of `delta`
    /// pixels.
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fovy_degrees: f32) {
        let height = viewport_height.max(1.0);
        let visible = 2.0 * self.distance * (fovy_degrees.to_radians() / 2.0).tan();
        let scale = visible / height * self.pan_speed;

        let (right, up) = self.basis();
        self.pending_pan += (-right * delta.x + up * delta.y) * scale;
    }

    /// Queue a dolly of `steps` wheel steps (positive moves closer).
    pub fn zoom(&mut self, steps: f32) {
        self.pending_zoom += steps * self.zoom_speed * ZOOM_STEP.ln();
    }

    /// Apply one frame of damped motion. Returns `true` while motion is
    /// still pending.
    pub fn update(&mut self) -> bool {
        let k = self.damping_factor;

        let rotation = self.pending_rotation * k;
        self.azimuth = (self.azimuth + rotation.x).rem_euclid(TAU);
        self.polar = (self.polar + rotation.y).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.pending_rotation -= rotation;

        let pan = self.pending_pan * k;
        self.target += pan;
        self.pending_pan -= pan;

        let zoom = self.pending_zoom * k;
        self.distance = (self.distance * zoom.exp())
            .clamp(self.min_distance, self.max_distance);
        self.pending_zoom -= zoom;

        !self.is_settled()
    }

    /// Whether all pending motion has decayed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.pending_rotation.length() < SETTLE_THRESHOLD
            && self.pending_pan.length() < SETTLE_THRESHOLD
            && self.pending_zoom.abs() < SETTLE_THRESHOLD
    }

    /// Drop pending motion and return to the starting view.
    pub fn reset(&mut self) {
        self.pending_rotation = Vec2::ZERO;
        self.pending_pan = Vec3::ZERO;
        self.pending_zoom = 0.0;
        self.look_from(self.home_eye, self.home_target);
    }

    /// Orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Distance from target to eye.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let sin_polar = self.polar.sin();
        self.target
            + Vec3::new(
                sin_polar * self.azimuth.sin(),
                self.polar.cos(),
                sin_polar * self.azimuth.cos(),
            ) * self.distance
    }

    /// Screen-aligned right and up vectors.
    fn basis(&self) -> (Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);
        (right, up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, &CameraOptions::default())
    }

    #[test]
    fn eye_round_trips_through_spherical() {
        let c = controls();
        assert!((c.eye() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
        assert!((c.distance() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn damping_spreads_motion_over_frames() {
        let mut c = controls();
        let start = c.eye();
        c.rotate(Vec2::new(100.0, 0.0), 600.0);

        let _ = c.update();
        let after_one = c.eye();
        assert_ne!(after_one, start, "first frame must move");
        assert!(!c.is_settled(), "motion must not stop instantly");

        for _ in 0..1_000 {
            let _ = c.update();
        }
        assert!(c.is_settled());

        // Fully applied: azimuth moved by -100 / 600 of a revolution.
        let expected = (-(100.0 / 600.0) * TAU).rem_euclid(TAU);
        assert!((c.azimuth - expected).abs() < 1e-3);
        assert!((c.distance() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn each_frame_applies_the_damping_fraction() {
        let mut c = controls();
        c.zoom(1.0);
        let pending = c.pending_zoom;
        let _ = c.update();
        assert!((c.pending_zoom - pending * 0.95).abs() < 1e-7);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut c = controls();
        c.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        for _ in 0..2_000 {
            let _ = c.update();
        }
        assert!(c.polar >= POLAR_EPSILON);
        assert!(c.eye().is_finite());
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut c = controls();
        c.zoom(1_000.0);
        for _ in 0..2_000 {
            let _ = c.update();
        }
        assert!((c.distance() - 0.2).abs() < 1e-4);

        c.zoom(-10_000.0);
        for _ in 0..2_000 {
            let _ = c.update();
        }
        assert!((c.distance() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn pan_moves_target_against_drag() {
        let mut c = controls();
        c.pan(Vec2::new(50.0, 0.0), 500.0, 75.0);
        for _ in 0..1_000 {
            let _ = c.update();
        }
        assert!(c.target().x < 0.0);
        assert!(c.target().y.abs() < 1e-4);
    }

    #[test]
    fn reset_returns_home() {
        let mut c = controls();
        c.rotate(Vec2::new(40.0, 25.0), 300.0);
        c.zoom(3.0);
        for _ in 0..50 {
            let _ = c.update();
        }
        c.reset();
        assert!(c.is_settled());
        assert!((c.eye() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-4);
    }
}
