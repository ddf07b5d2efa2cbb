//! Immutable per-particle attributes.
//!
//! The store is built once and never changes: a particle's origin and random
//! triplet are its identity for the whole lifetime of the field.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::error::ConfigError;

/// Default particle count.
pub const DEFAULT_PARTICLE_COUNT: u32 = 2000;

/// One decorative particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Rest position in world units.
    pub origin: Vec3,
    /// Random phase in `[0, 2π)`.
    pub phase: f32,
    /// Random speed multiplier in `[0.5, 1.0]`.
    pub speed: f32,
    /// Random variation in `[0, 1)`.
    pub variation: f32,
    /// Base sprite size.
    pub size: f32,
    /// Base RGB color.
    pub color: Vec3,
}

/// Box the origins are spread over, centered on the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    /// Full width, height and depth of the box.
    pub extent: Vec3,
}

impl DomainBounds {
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            extent: Vec3::new(width, height, depth),
        }
    }

    /// Check whether `p` lies inside the box (inclusive).
    pub fn contains(&self, p: Vec3) -> bool {
        let half = self.extent * 0.5;
        p.abs().cmple(half).all()
    }
}

impl Default for DomainBounds {
    /// Wide in x, tall in y, shallow in z.
    fn default() -> Self {
        Self::new(35.0, 25.0, 5.0)
    }
}

/// Uniform range base sizes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl Default for SizeRange {
    fn default() -> Self {
        Self { min: 0.05, max: 0.15 }
    }
}

/// Per-instance record uploaded once for the vertex-stage strategy.
///
/// Layout matches the vertex attributes declared in `gpu::device_vertex_layout`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleAttributes {
    pub origin: [f32; 3],
    pub size: f32,
    /// phase, speed, variation
    pub random: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

/// Fixed-size, read-only set of particles.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    bounds: DomainBounds,
}

impl ParticleStore {
    /// Build `count` particles from an entropy-seeded RNG.
    pub fn initialize(
        count: u32,
        bounds: DomainBounds,
        sizes: SizeRange,
        color: Vec3,
    ) -> Result<Self, ConfigError> {
        let mut rng = SmallRng::from_entropy();
        Self::build(count, bounds, sizes, color, &mut rng)
    }

    /// Build `count` particles from a fixed seed.
    ///
    /// Only useful for tests and benchmarks; production fields are seeded
    /// from entropy so each run looks different.
    pub fn initialize_with_seed(
        count: u32,
        bounds: DomainBounds,
        sizes: SizeRange,
        color: Vec3,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::build(count, bounds, sizes, color, &mut rng)
    }

    /// Wrap an explicit particle list.
    pub fn from_particles(particles: Vec<Particle>, bounds: DomainBounds) -> Result<Self, ConfigError> {
        if particles.is_empty() {
            return Err(ConfigError::EmptyParticleCount);
        }
        Ok(Self { particles, bounds })
    }

    fn build(
        count: u32,
        bounds: DomainBounds,
        sizes: SizeRange,
        color: Vec3,
        rng: &mut SmallRng,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::EmptyParticleCount);
        }
        if !bounds.extent.is_finite() || bounds.extent.min_element() < 0.0 {
            return Err(ConfigError::InvalidRange("domain_bounds"));
        }
        if !(sizes.min.is_finite() && sizes.max.is_finite())
            || sizes.min < 0.0
            || sizes.min > sizes.max
        {
            return Err(ConfigError::InvalidRange("size_range"));
        }

        let particles = (0..count)
            .map(|_| {
                let origin = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * bounds.extent.x,
                    (rng.gen::<f32>() - 0.5) * bounds.extent.y,
                    (rng.gen::<f32>() - 0.5) * bounds.extent.z,
                );
                Particle {
                    origin,
                    phase: (rng.gen::<f32>() * TAU) % TAU,
                    speed: rng.gen::<f32>() * 0.5 + 0.5,
                    variation: rng.gen::<f32>(),
                    size: sizes.min + rng.gen::<f32>() * (sizes.max - sizes.min),
                    color,
                }
            })
            .collect();

        Ok(Self { particles, bounds })
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    /// Static per-instance data for the vertex-stage strategy.
    pub fn gpu_attributes(&self) -> Vec<ParticleAttributes> {
        self.particles
            .iter()
            .map(|p| ParticleAttributes {
                origin: p.origin.to_array(),
                size: p.size,
                random: [p.phase, p.speed, p.variation],
                _pad0: 0.0,
                color: p.color.to_array(),
                _pad1: 0.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey() -> Vec3 {
        Vec3::splat(0.2)
    }

    #[test]
    fn test_initialize_ranges() {
        let bounds = DomainBounds::default();
        let sizes = SizeRange::default();
        let store = ParticleStore::initialize_with_seed(2500, bounds, sizes, grey(), 7).unwrap();

        assert_eq!(store.len(), 2500);
        for p in store.particles() {
            assert!(bounds.contains(p.origin), "origin {:?} outside box", p.origin);
            assert!((0.0..TAU).contains(&p.phase));
            assert!((0.5..=1.0).contains(&p.speed));
            assert!((0.0..1.0).contains(&p.variation));
            assert!(p.size >= sizes.min && p.size <= sizes.max);
            assert_eq!(p.color, grey());
        }
    }

    #[test]
    fn test_origins_spread_over_box() {
        let store = ParticleStore::initialize_with_seed(
            2000,
            DomainBounds::default(),
            SizeRange::default(),
            grey(),
            3,
        )
        .unwrap();

        let max_x = store.particles().iter().map(|p| p.origin.x).fold(f32::MIN, f32::max);
        let min_x = store.particles().iter().map(|p| p.origin.x).fold(f32::MAX, f32::min);
        assert!(max_x > 15.0 && min_x < -15.0);

        let max_z = store.particles().iter().map(|p| p.origin.z.abs()).fold(0.0, f32::max);
        assert!(max_z <= 2.5);
    }

    #[test]
    fn test_seed_reproducible() {
        let a = ParticleStore::initialize_with_seed(10, DomainBounds::default(), SizeRange::default(), grey(), 42).unwrap();
        let b = ParticleStore::initialize_with_seed(10, DomainBounds::default(), SizeRange::default(), grey(), 42).unwrap();
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_zero_count_rejected() {
        let result = ParticleStore::initialize(0, DomainBounds::default(), SizeRange::default(), grey());
        assert_eq!(result.unwrap_err(), ConfigError::EmptyParticleCount);
        assert!(ParticleStore::from_particles(Vec::new(), DomainBounds::default()).is_err());
    }

    #[test]
    fn test_inverted_size_range_rejected() {
        let sizes = SizeRange { min: 0.2, max: 0.1 };
        let result = ParticleStore::initialize(10, DomainBounds::default(), sizes, grey());
        assert_eq!(result.unwrap_err(), ConfigError::InvalidRange("size_range"));
    }

    #[test]
    fn test_flat_domain_allowed() {
        let store = ParticleStore::initialize_with_seed(
            50,
            DomainBounds::new(10.0, 10.0, 0.0),
            SizeRange { min: 0.1, max: 0.1 },
            grey(),
            1,
        )
        .unwrap();
        assert!(store.particles().iter().all(|p| p.origin.z == 0.0 && p.size == 0.1));
    }

    #[test]
    fn test_gpu_attributes_layout() {
        assert_eq!(std::mem::size_of::<ParticleAttributes>(), 48);

        let store = ParticleStore::initialize_with_seed(3, DomainBounds::default(), SizeRange::default(), grey(), 9).unwrap();
        let attrs = store.gpu_attributes();
        for (a, p) in attrs.iter().zip(store.particles()) {
            assert_eq!(a.origin, p.origin.to_array());
            assert_eq!(a.random, [p.phase, p.speed, p.variation]);
            assert_eq!(a.size, p.size);
        }
    }

    #[test]
    fn test_store_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParticleStore>();
    }
}
