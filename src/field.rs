//! The particle field formula.
//!
//! [`FieldEvaluator::evaluate`] maps one particle, the smoothed pointer and
//! the elapsed time to a [`FieldOutput`]. It is a pure function: the same
//! inputs always give bit-identical output, and nothing it touches is
//! mutated. The WGSL in `shaders/field.wgsl` is a second realisation of the
//! same formula and must stay in step with this file.
//!
//! # Zones
//!
//! Around the pointer sits a wavy ring of radius
//! `base_radius + amplitude * sin(angle * harmonic - time * wave_speed * speed + phase)`.
//!
//! | Zone | Condition | Behaviour |
//! |------|-----------|-----------|
//! | Ring | `influence > 0` | pushed along the ring, grown, mostly opaque |
//! | Interior | `dist < base_radius` | breathes in place, shrunk toward center |
//! | Dormant | otherwise | rests at origin, small and faint |

use glam::{Vec2, Vec3};

use crate::profile::FieldProfile;
use crate::store::Particle;

/// Per-particle visual state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOutput {
    /// Offset added to the particle origin.
    pub displacement: Vec3,
    /// Multiplier on the particle's base size.
    pub size_scale: f32,
    pub alpha: f32,
}

/// Which branch of the formula a particle took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    Ring,
    Interior,
    Dormant,
}

/// A [`FieldOutput`] together with the intermediate values that chose it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub output: FieldOutput,
    pub zone: Zone,
    pub influence: f32,
    pub dist: f32,
    pub angle: f32,
    pub ring_radius: f32,
    pub center_transparency: f32,
}

impl FieldSample {
    /// Distance to the nearest zone boundary in the formula's own terms.
    ///
    /// Samples with a tiny margin may legitimately branch differently under
    /// another floating-point implementation of the same formula.
    pub fn branch_margin(&self, profile: &FieldProfile) -> f32 {
        let ring_edge = ((self.dist - self.ring_radius).abs() - profile.border_thickness).abs();
        let disk_edge = (self.dist - profile.base_radius).abs();
        ring_edge.min(disk_edge)
    }
}

/// Evaluates the field for one profile.
#[derive(Debug, Clone)]
pub struct FieldEvaluator {
    profile: FieldProfile,
}

impl FieldEvaluator {
    /// Wrap a profile. Call [`FieldProfile::validate`] first; the formula
    /// assumes `base_radius > 0` and `border_thickness > 0`.
    pub fn new(profile: FieldProfile) -> Self {
        Self { profile }
    }

    #[inline]
    pub fn profile(&self) -> &FieldProfile {
        &self.profile
    }

    /// Evaluate one particle.
    #[inline]
    pub fn evaluate(&self, particle: &Particle, pointer: Vec2, time: f32) -> FieldOutput {
        self.sample(particle, pointer, time).output
    }

    /// Evaluate one particle and keep the intermediates.
    pub fn sample(&self, particle: &Particle, pointer: Vec2, time: f32) -> FieldSample {
        let cfg = &self.profile;
        let phase = particle.phase;
        let speed = particle.speed;
        let variation = particle.variation;

        let drift = self.drift_offset(particle, time);
        let pos = particle.origin.truncate() + drift;

        let dx = pos.x - pointer.x;
        let dy = pos.y - pointer.y;
        let dist = (dx * dx + dy * dy).sqrt();
        let angle = if dist > 0.0 { dy.atan2(dx) } else { 0.0 };

        let ring_wave =
            (angle * cfg.harmonic - time * cfg.wave_speed * speed + phase).sin() * cfg.wave_amplitude;
        let ring_radius = cfg.base_radius + ring_wave;
        let dist_from_ring = (dist - ring_radius).abs();
        let influence = (1.0 - dist_from_ring / cfg.border_thickness).clamp(0.0, 1.0);

        let center_t = (dist / cfg.base_radius).clamp(0.0, cfg.transparency_cap);

        let (zone, push, size_scale, alpha) = if influence > 0.0 {
            let radial_push = ring_wave * influence * cfg.push_scale * (0.7 + variation * 0.6);
            let push_angle = angle + (variation - 0.5) * cfg.perp_spread;
            let push = Vec3::new(
                push_angle.cos() * radial_push,
                push_angle.sin() * radial_push,
                ring_wave * influence * cfg.z_jitter * variation,
            );
            let min_scale = cfg.min_scale * center_t;
            let scale = min_scale + influence * cfg.max_scale * center_t;
            (Zone::Ring, push, scale, center_t * cfg.ring_alpha)
        } else if dist < cfg.base_radius {
            let breath_phase = time * cfg.breath_speed * speed + phase;
            let breath = breath_phase.sin() * cfg.breath_damp * variation;
            let falloff = 1.0 - dist / cfg.base_radius;
            let push = Vec3::new(
                angle.cos() * breath * falloff,
                angle.sin() * breath * falloff,
                (breath_phase * 1.2).sin() * cfg.breath_z * variation,
            );
            let scale = (cfg.breath_base + breath) * center_t;
            (Zone::Interior, push, scale, center_t * cfg.interior_alpha)
        } else {
            (Zone::Dormant, Vec3::ZERO, cfg.dormant_size, cfg.dormant_alpha)
        };

        FieldSample {
            output: FieldOutput {
                displacement: push + drift.extend(0.0),
                size_scale: size_scale.max(0.0),
                alpha: alpha.max(0.0),
            },
            zone,
            influence,
            dist,
            angle,
            ring_radius,
            center_transparency: center_t,
        }
    }

    /// Ambient wander applied before zoning; zero when the profile has none.
    fn drift_offset(&self, particle: &Particle, time: f32) -> Vec2 {
        match self.profile.drift {
            Some(drift) => {
                let t = time * drift.time_scale;
                Vec2::new(
                    (t * particle.speed + particle.phase).sin() * drift.amplitude * particle.variation,
                    (t * drift.y_frequency * particle.speed + particle.phase * drift.y_phase_scale).cos()
                        * drift.amplitude
                        * particle.variation,
                )
            }
            None => Vec2::ZERO,
        }
    }

    /// Evaluate every particle in order.
    pub fn evaluate_all<'a>(
        &'a self,
        particles: &'a [Particle],
        pointer: Vec2,
        time: f32,
    ) -> impl Iterator<Item = FieldOutput> + 'a {
        particles.iter().map(move |p| self.evaluate(p, pointer, time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AmbientDrift;

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            origin: Vec3::new(x, y, 0.0),
            phase: 0.0,
            speed: 1.0,
            variation: 0.5,
            size: 0.1,
            color: Vec3::splat(0.2),
        }
    }

    #[test]
    fn test_peak_of_ring() {
        let evaluator = FieldEvaluator::new(FieldProfile::classic());
        let sample = evaluator.sample(&particle_at(4.0, 0.0), Vec2::ZERO, 0.0);

        assert_eq!(sample.angle, 0.0);
        assert_eq!(sample.ring_radius, 4.0);
        assert_eq!(sample.influence, 1.0);
        assert_eq!(sample.zone, Zone::Ring);
        assert_eq!(sample.center_transparency, 1.0);
        assert!((sample.output.alpha - 0.9).abs() < 1e-6);
        // ring_wave is zero, so the push vanishes
        assert!(sample.output.displacement.length() < 1e-6);
        assert!((sample.output.size_scale - (0.3 + 1.5)).abs() < 1e-6);
    }

    #[test]
    fn test_interior_breathing() {
        let evaluator = FieldEvaluator::new(FieldProfile::classic());
        // At t = 1 the ring sits near radius 3.55, well clear of 0.5
        let p = Particle {
            origin: Vec3::new(0.5, 0.0, 0.0),
            ..particle_at(0.0, 0.0)
        };
        let sample = evaluator.sample(&p, Vec2::ZERO, 1.0);
        assert_eq!(sample.zone, Zone::Interior);
        assert_eq!(sample.influence, 0.0);

        let center_t = 0.5 / 4.0;
        assert!((sample.output.alpha - center_t * 0.7).abs() < 1e-6);

        let bp = 1.0 * 1.5 * 1.0;
        let breath = f32::sin(bp) * 0.3 * 0.5;
        assert!((sample.output.size_scale - (0.5 + breath) * center_t).abs() < 1e-6);
        assert!((sample.output.displacement.x - breath * (1.0 - 0.5 / 4.0)).abs() < 1e-6);
        assert!(sample.output.displacement.y.abs() < 1e-6);
    }

    #[test]
    fn test_dormant_far_away() {
        let profile = FieldProfile::classic();
        let evaluator = FieldEvaluator::new(profile.clone());
        let sample = evaluator.sample(&particle_at(15.0, 10.0), Vec2::ZERO, 3.3);

        assert_eq!(sample.zone, Zone::Dormant);
        assert_eq!(sample.output.displacement, Vec3::ZERO);
        assert_eq!(sample.output.size_scale, profile.dormant_size);
        assert_eq!(sample.output.alpha, profile.dormant_alpha);
    }

    #[test]
    fn test_pointer_on_particle() {
        let evaluator = FieldEvaluator::new(FieldProfile::trefoil());
        let sample = evaluator.sample(&particle_at(2.0, -1.0), Vec2::new(2.0, -1.0), 0.7);

        assert_eq!(sample.dist, 0.0);
        assert_eq!(sample.angle, 0.0);
        assert!(sample.output.displacement.is_finite());
        assert_eq!(sample.center_transparency, 0.0);
        assert_eq!(sample.output.alpha, 0.0);
    }

    #[test]
    fn test_drift_moves_dormant_particles() {
        let profile = FieldProfile {
            drift: Some(AmbientDrift::default()),
            ..FieldProfile::classic()
        };
        let evaluator = FieldEvaluator::new(profile);
        let p = Particle {
            phase: 1.0,
            variation: 1.0,
            ..particle_at(15.0, 10.0)
        };
        let sample = evaluator.sample(&p, Vec2::ZERO, 2.0);
        assert_eq!(sample.zone, Zone::Dormant);

        let expected = Vec3::new((1.0f32 + 1.0).sin() * 0.8, (0.7f32 + 1.5).cos() * 0.8, 0.0);
        assert!((sample.output.displacement - expected).length() < 1e-5);
    }

    #[test]
    fn test_evaluate_all_matches_single() {
        let evaluator = FieldEvaluator::new(FieldProfile::drift());
        let particles = [particle_at(1.0, 1.0), particle_at(3.0, 0.0), particle_at(9.0, 9.0)];
        let outputs: Vec<_> = evaluator.evaluate_all(&particles, Vec2::new(0.5, 0.5), 1.25).collect();

        assert_eq!(outputs.len(), 3);
        for (p, out) in particles.iter().zip(&outputs) {
            assert_eq!(*out, evaluator.evaluate(p, Vec2::new(0.5, 0.5), 1.25));
        }
    }
}
