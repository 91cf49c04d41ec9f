//! CPU-side scene state: the generated particles, planet placement, the
//! two lights, and the animated particle rotation.
//!
//! The scene owns no GPU objects. The renderers upload from it, and the
//! [`resources`] module tracks what they allocate.

pub mod resources;

use glam::{Mat4, Vec3};

use crate::color::Rgb;
use crate::generator::{self, ParticleBuffers};
use crate::options::Options;

/// Ambient and directional light, intensities folded into the colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    /// White ambient light scaled by its intensity.
    pub ambient: Vec3,
    /// Directional light color scaled by its intensity.
    pub directional: Vec3,
    /// Directional light position; it shines towards the origin.
    pub directional_position: Vec3,
}

impl Lights {
    /// Lights for the given options. The directional light takes the
    /// galaxy's inside color and sits at `(2·radius, radius, 0)`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let galaxy = options.galaxy.sanitized();
        let lighting = &options.lighting;
        let color = Vec3::from_array(galaxy.inside_rgb().to_array());
        Self {
            ambient: Vec3::from_array(Rgb::WHITE.to_array()) * lighting.ambient_intensity,
            directional: color * lighting.directional_intensity,
            directional_position: Vec3::new(galaxy.radius * 2.0, galaxy.radius, 0.0),
        }
    }

    /// Unit vector from the origin towards the directional light.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.directional_position.normalize_or(Vec3::Y)
    }
}

/// Where and how big the planet sphere is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetPlacement {
    /// Center in world space.
    pub position: Vec3,
    /// Uniform scale of the unit sphere.
    pub scale: f32,
    /// Longitude and latitude segment count.
    pub segments: u32,
}

impl PlanetPlacement {
    /// Placement for the given options: centered at `(radius/2, 0, 0)`.
    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        let galaxy = options.galaxy.sanitized();
        Self {
            position: Vec3::new(galaxy.radius / 2.0, 0.0, 0.0),
            scale: options.planet.scale,
            segments: options.planet.segments.clamp(3, 256),
        }
    }

    /// Model matrix.
    #[must_use]
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.scale))
    }
}

/// Everything the renderers draw, minus the GPU objects.
#[derive(Debug, Clone)]
pub struct Scene {
    particles: ParticleBuffers,
    particle_size: f32,
    planet: PlanetPlacement,
    lights: Lights,
    particle_rotation: f32,
    seed: u64,
    generation: u64,
}

impl Scene {
    /// Generate the first galaxy from `seed`.
    #[must_use]
    pub fn new(options: &Options, seed: u64) -> Self {
        Self {
            particles: generator::generate_seeded(&options.galaxy, seed),
            particle_size: options.galaxy.sanitized().size,
            planet: PlanetPlacement::from_options(options),
            lights: Lights::from_options(options),
            particle_rotation: 0.0,
            seed,
            generation: 0,
        }
    }

    /// Replace the particles and planet placement with ones built from
    /// `options`, keeping the current seed.
    pub fn regenerate(&mut self, options: &Options) {
        self.particles = generator::generate_seeded(&options.galaxy, self.seed);
        self.particle_size = options.galaxy.sanitized().size;
        self.planet = PlanetPlacement::from_options(options);
        self.lights = Lights::from_options(options);
        self.generation += 1;
    }

    /// Switch to a new seed and regenerate.
    pub fn reseed(&mut self, options: &Options, seed: u64) {
        self.seed = seed;
        self.regenerate(options);
    }

    /// Recompute the lights and planet placement after a change that
    /// leaves the particles alone.
    pub fn refresh(&mut self, options: &Options) {
        self.lights = Lights::from_options(options);
        self.planet = PlanetPlacement::from_options(options);
    }

    /// Set the particle rotation for `elapsed` seconds at `speed` rad/s.
    pub fn advance(&mut self, elapsed: f32, speed: f32) {
        self.particle_rotation = elapsed * speed;
    }

    /// Generated particle buffers.
    #[must_use]
    pub fn particles(&self) -> &ParticleBuffers {
        &self.particles
    }

    /// Point size in world units.
    #[must_use]
    pub fn particle_size(&self) -> f32 {
        self.particle_size
    }

    /// Current rotation of the particle system about +Y, in radians.
    #[must_use]
    pub fn particle_rotation(&self) -> f32 {
        self.particle_rotation
    }

    /// Model matrix of the particle system.
    #[must_use]
    pub fn particle_transform(&self) -> Mat4 {
        Mat4::from_rotation_y(self.particle_rotation)
    }

    /// Planet placement.
    #[must_use]
    pub fn planet(&self) -> &PlanetPlacement {
        &self.planet
    }

    /// Scene lights.
    #[must_use]
    pub fn lights(&self) -> &Lights {
        &self.lights
    }

    /// Seed the particles were generated from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of regenerations since creation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_options() -> Options {
        let mut options = Options::default();
        options.galaxy.count = 2_000;
        options
    }

    #[test]
    fn new_scene_holds_count_particles() {
        let scene = Scene::new(&small_options(), 1);
        assert_eq!(scene.particles().len(), 2_000);
        assert_eq!(scene.generation(), 0);
        assert!((scene.particle_size() - 0.01).abs() < 1e-7);
    }

    #[test]
    fn regenerate_keeps_seed_and_follows_options() {
        let mut options = small_options();
        let mut scene = Scene::new(&options, 9);
        let before = scene.particles().clone();

        scene.regenerate(&options);
        assert_eq!(scene.particles(), &before);
        assert_eq!(scene.generation(), 1);

        options.galaxy.count = 500;
        scene.regenerate(&options);
        assert_eq!(scene.particles().positions.len(), 1_500);
        assert_eq!(scene.particles().colors.len(), 1_500);
        assert_eq!(scene.generation(), 2);
    }

    #[test]
    fn reseed_changes_particles() {
        let options = small_options();
        let mut scene = Scene::new(&options, 9);
        let before = scene.particles().clone();
        scene.reseed(&options, 10);
        assert_eq!(scene.seed(), 10);
        assert_ne!(scene.particles(), &before);
    }

    #[test]
    fn lights_follow_radius_and_inside_color() {
        let mut options = small_options();
        options.galaxy.radius = 4.0;
        options.galaxy.inside_color = "#ff0000".to_owned();
        options.lighting.directional_intensity = 2.0;
        options.lighting.ambient_intensity = 0.25;
        let lights = Lights::from_options(&options);
        assert_eq!(lights.directional_position, Vec3::new(8.0, 4.0, 0.0));
        assert_eq!(lights.directional, Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(lights.ambient, Vec3::splat(0.25));
        assert!((lights.direction().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn planet_sits_at_half_radius() {
        let options = small_options();
        let planet = PlanetPlacement::from_options(&options);
        assert_eq!(planet.position, Vec3::new(2.5, 0.0, 0.0));
        let surface = planet.transform().transform_point3(Vec3::X);
        assert!((surface - Vec3::new(2.8, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn refresh_rescales_planet_without_touching_particles() {
        let mut options = small_options();
        let mut scene = Scene::new(&options, 4);
        let before = scene.particles().clone();

        options.planet.scale = 0.6;
        scene.refresh(&options);
        assert_eq!(scene.planet().scale, 0.6);
        assert_eq!(scene.particles(), &before);
        assert_eq!(scene.generation(), 0);
        let surface = scene.planet().transform().transform_point3(Vec3::X);
        assert!((surface - Vec3::new(3.1, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn rotation_is_elapsed_times_speed() {
        let mut scene = Scene::new(&small_options(), 1);
        scene.advance(10.0, 0.1);
        assert!((scene.particle_rotation() - 1.0).abs() < 1e-6);
        let rotated = scene
            .particle_transform()
            .transform_point3(Vec3::X);
        assert!((rotated - Vec3::new(1.0_f32.cos(), 0.0, -1.0_f32.sin())).length() < 1e-5);
    }
}
