//! Procedural spiral-galaxy particle generation.
//!
//! Each particle gets a random distance from the core, sits on one of the
//! spiral branches, and is pushed off the arm by a power-shaped random
//! offset per axis. The offset amplitude is `randomness · radius` for
//! every particle, so the core is as thick as the rim. Its color blends from the inside color at the core to
//! the outside color at the rim.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Rgb;
use crate::options::GalaxyOptions;

/// Two parallel arrays of `3 × count` floats: xyz positions and rgb
/// colors. Uploaded as two separate vertex streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleBuffers {
    /// Interleaved xyz, one triple per particle.
    pub positions: Vec<f32>,
    /// Interleaved rgb, one triple per particle.
    pub colors: Vec<f32>,
}

impl ParticleBuffers {
    /// Zeroed buffers for `count` particles.
    #[must_use]
    pub fn zeroed(count: usize) -> Self {
        Self {
            positions: vec![0.0; count * 3],
            colors: vec![0.0; count * 3],
        }
    }

    /// Number of particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether there are no particles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of particle `i`.
    #[must_use]
    pub fn position(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.positions[i3], self.positions[i3 + 1], self.positions[i3 + 2]]
    }

    /// Color of particle `i`.
    #[must_use]
    pub fn color(&self, i: usize) -> [f32; 3] {
        let i3 = i * 3;
        [self.colors[i3], self.colors[i3 + 1], self.colors[i3 + 2]]
    }
}

/// Linear color blend keyed by normalized radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    /// Color at normalized radius 0.
    pub inside: Rgb,
    /// Color at normalized radius 1.
    pub outside: Rgb,
}

impl ColorRamp {
    /// Color at normalized radius `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Rgb {
        self.inside.lerp(self.outside, t)
    }
}

/// Generate particles deterministically from `seed`.
#[must_use]
pub fn generate_seeded(options: &GalaxyOptions, seed: u64) -> ParticleBuffers {
    generate_with_rng(options, &mut StdRng::seed_from_u64(seed))
}

/// Generate particles drawing randomness from `rng`.
///
/// Options are clamped into the panel's ranges first, so the output always
/// holds exactly `3 × count` positions and colors for the clamped count.
pub fn generate_with_rng<R: Rng + ?Sized>(
    options: &GalaxyOptions,
    rng: &mut R,
) -> ParticleBuffers {
    let params = options.sanitized();
    let count = params.count as usize;
    let ramp = ColorRamp {
        inside: params.inside_rgb(),
        outside: params.outside_rgb(),
    };

    let mut buffers = ParticleBuffers::zeroed(count);
    for i in 0..count {
        let i3 = i * 3;

        let radius = rng.random::<f32>() * params.radius;
        let spin_angle = radius * params.spin;
        let branch_angle = branch_angle(i, params.branches);
        let angle = branch_angle + spin_angle;

        let scatter = params.randomness * params.radius;
        let offset_x = scatter_offset(rng, params.randomness_power) * scatter;
        let offset_y = scatter_offset(rng, params.randomness_power) * scatter;
        let offset_z = scatter_offset(rng, params.randomness_power) * scatter;

        buffers.positions[i3] = angle.cos() * radius + offset_x;
        buffers.positions[i3 + 1] = offset_y;
        buffers.positions[i3 + 2] = angle.sin() * radius + offset_z;

        let color = ramp.at(radius / params.radius);
        buffers.colors[i3] = color.r;
        buffers.colors[i3 + 1] = color.g;
        buffers.colors[i3 + 2] = color.b;
    }
    buffers
}

/// Angle of the branch particle `index` belongs to, in `[0, 2π)`.
#[must_use]
pub fn branch_angle(index: usize, branches: u32) -> f32 {
    let branches = branches.max(1);
    (index % branches as usize) as f32 / branches as f32 * TAU
}

/// `U[0,1)^power` with a random sign.
fn scatter_offset<R: Rng + ?Sized>(rng: &mut R, power: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power);
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(count: u32) -> GalaxyOptions {
        GalaxyOptions {
            count,
            ..GalaxyOptions::default()
        }
    }

    #[test]
    fn buffers_hold_three_floats_per_particle() {
        for count in [100, 101, 2_500, 10_000] {
            let buffers = generate_seeded(&options(count), 7);
            assert_eq!(buffers.positions.len(), 3 * count as usize);
            assert_eq!(buffers.colors.len(), 3 * count as usize);
            assert_eq!(buffers.len(), count as usize);
        }
    }

    #[test]
    fn out_of_range_count_is_clamped_before_sizing() {
        let buffers = generate_seeded(&options(0), 1);
        assert_eq!(buffers.len(), 100);
        assert_eq!(buffers.colors.len(), 300);
    }

    #[test]
    fn ramp_endpoints_are_exact() {
        let g = GalaxyOptions::default();
        let ramp = ColorRamp {
            inside: g.inside_rgb(),
            outside: g.outside_rgb(),
        };
        assert_eq!(ramp.at(0.0), g.inside_rgb());
        let rim = ramp.at(1.0);
        let outside = g.outside_rgb();
        assert!((rim.r - outside.r).abs() < 1e-6);
        assert!((rim.g - outside.g).abs() < 1e-6);
        assert!((rim.b - outside.b).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_galaxy() {
        let a = generate_seeded(&options(1_000), 42);
        let b = generate_seeded(&options(1_000), 42);
        let c = generate_seeded(&options(1_000), 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn particles_stay_near_the_disc() {
        let g = GalaxyOptions {
            count: 5_000,
            randomness: 0.7,
            randomness_power: 1.0,
            ..GalaxyOptions::default()
        };
        let buffers = generate_seeded(&g, 3);
        let max_planar = g.radius * (1.0 + std::f32::consts::SQRT_2 * g.randomness);
        let max_height = g.randomness * g.radius;
        for i in 0..buffers.len() {
            let [x, y, z] = buffers.position(i);
            assert!((x * x + z * z).sqrt() <= max_planar + 1e-4);
            assert!(y.abs() <= max_height + 1e-4);
        }
    }

    #[test]
    fn core_particles_are_scattered_too() {
        let g = GalaxyOptions {
            count: 20_000,
            ..GalaxyOptions::default()
        };
        let buffers = generate_seeded(&g, 1);
        let inside = g.inside_rgb();
        let outside = g.outside_rgb();

        // The red channel encodes the sampled distance exactly.
        let mut core = 0;
        let mut lifted = 0;
        for i in 0..buffers.len() {
            let t = (inside.r - buffers.color(i)[0]) / (inside.r - outside.r);
            if t < 0.1 {
                core += 1;
                if buffers.position(i)[1].abs() > 0.1 {
                    lifted += 1;
                }
            }
        }
        assert!(core > 1_000, "core={core}");
        // |y| > 0.1 needs U^3 > 0.1, i.e. U > 0.464: about 54%.
        let share = f64::from(lifted) / f64::from(core);
        assert!((0.45..0.63).contains(&share), "share={share}");
    }

    #[test]
    fn without_scatter_particles_sit_on_their_branch() {
        let g = GalaxyOptions {
            count: 600,
            branches: 5,
            spin: 0.0,
            randomness: 0.0,
            ..GalaxyOptions::default()
        };
        let buffers = generate_seeded(&g, 11);
        for i in 0..buffers.len() {
            let [x, y, z] = buffers.position(i);
            assert_eq!(y, 0.0);
            let r = (x * x + z * z).sqrt();
            if r < 1e-3 {
                continue;
            }
            let expected = branch_angle(i, g.branches);
            let actual = z.atan2(x).rem_euclid(TAU);
            let diff = (actual - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "particle {i}");
        }
    }

    #[test]
    fn color_follows_normalized_radius() {
        let g = GalaxyOptions {
            count: 300,
            randomness: 0.0,
            ..GalaxyOptions::default()
        };
        let ramp = ColorRamp {
            inside: g.inside_rgb(),
            outside: g.outside_rgb(),
        };
        let buffers = generate_seeded(&g, 5);
        for i in 0..buffers.len() {
            let [x, _, z] = buffers.position(i);
            let t = (x * x + z * z).sqrt() / g.radius;
            let expected = ramp.at(t).to_array();
            let actual = buffers.color(i);
            for c in 0..3 {
                assert!((expected[c] - actual[c]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn branch_angles_cycle() {
        assert_eq!(branch_angle(0, 3), 0.0);
        assert!((branch_angle(1, 3) - TAU / 3.0).abs() < 1e-6);
        assert_eq!(branch_angle(3, 3), 0.0);
    }
}
