//! Named field profiles.
//!
//! A [`FieldProfile`] holds every numeric constant the field formula reads.
//! The branch structure of the formula never changes between profiles; only
//! these numbers do. Each look that ships is a constructor here.
//!
//! # Example
//!
//! ```ignore
//! let profile = FieldProfile {
//!     base_radius: 5.0,
//!     ..FieldProfile::classic()
//! };
//! profile.validate()?;
//! ```

use glam::{Vec2, Vec3};
use std::fmt::Write;

use crate::error::ConfigError;
use crate::store::DEFAULT_PARTICLE_COUNT;

/// How the pointer tracker leaves its rest position on the first real input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FirstInput {
    /// Jump straight to the first target.
    #[default]
    Snap,
    /// Lerp from the rest position from the very first frame, whether or
    /// not the pointer has moved yet.
    Glide,
}

/// Slow two-wave wander applied to every origin before zoning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientDrift {
    /// Multiplier on elapsed time.
    pub time_scale: f32,
    /// Peak offset per axis, scaled by the particle's variation.
    pub amplitude: f32,
    /// Relative frequency of the vertical wave.
    pub y_frequency: f32,
    /// Phase multiplier of the vertical wave.
    pub y_phase_scale: f32,
}

impl Default for AmbientDrift {
    fn default() -> Self {
        Self {
            time_scale: 0.5,
            amplitude: 0.8,
            y_frequency: 0.7,
            y_phase_scale: 1.5,
        }
    }
}

/// Every constant of the field formula, plus pointer and sprite tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProfile {
    /// Profile name, used in logs and window titles.
    pub name: &'static str,

    // Ring shape
    pub base_radius: f32,
    pub wave_amplitude: f32,
    /// Number of lobes around the ring.
    pub harmonic: f32,
    pub wave_speed: f32,
    /// Half-width of the reactive annulus.
    pub border_thickness: f32,

    // Ring branch
    pub push_scale: f32,
    /// Angular spread of the push direction, scaled by `variation - 0.5`.
    pub perp_spread: f32,
    pub z_jitter: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub ring_alpha: f32,

    // Interior branch
    pub breath_speed: f32,
    pub breath_damp: f32,
    pub breath_base: f32,
    pub breath_z: f32,
    pub interior_alpha: f32,

    // Dormant branch
    pub dormant_size: f32,
    pub dormant_alpha: f32,

    /// Upper bound of the center transparency factor.
    pub transparency_cap: f32,

    pub drift: Option<AmbientDrift>,

    // Pointer tracking
    /// Per-frame lerp factor in (0, 1].
    pub smoothing: f32,
    pub first_input: FirstInput,
    /// Starting pointer position. `Snap` holds it until the first nonzero
    /// input; `Glide` leaves it on the first frame.
    pub rest_position: Vec2,

    /// Sprite pixel size is `size * point_scale * 300 / view_depth`.
    pub point_scale: f32,

    // Look
    /// Particles in a field built from this profile.
    pub particle_count: u32,
    /// Base RGB color of every particle.
    pub color: Vec3,
}

impl FieldProfile {
    /// Host-driven look: wide amplitude, strong ring, near-invisible idle field.
    ///
    /// The pointer rests far off-screen and glides in from the first frame.
    pub fn classic() -> Self {
        Self {
            name: "classic",
            base_radius: 4.0,
            wave_amplitude: 0.5,
            harmonic: 2.0,
            wave_speed: 2.0,
            border_thickness: 2.5,
            push_scale: 1.8,
            perp_spread: 0.5,
            z_jitter: 0.5,
            min_scale: 0.3,
            max_scale: 1.5,
            ring_alpha: 0.9,
            breath_speed: 1.5,
            breath_damp: 0.3,
            breath_base: 0.5,
            breath_z: 0.2,
            interior_alpha: 0.7,
            dormant_size: 0.4,
            dormant_alpha: 0.1,
            transparency_cap: 1.0,
            drift: None,
            smoothing: 0.015,
            first_input: FirstInput::Glide,
            rest_position: Vec2::new(999.0, 999.0),
            point_scale: 2.5,
            particle_count: DEFAULT_PARTICLE_COUNT,
            color: Vec3::splat(0.2),
        }
    }

    /// Vertex-stage look: ambient drift, softer ring, visible idle field.
    ///
    /// The pointer rests at the center and snaps to the first real input.
    pub fn drift() -> Self {
        Self {
            name: "drift",
            base_radius: 3.5,
            wave_amplitude: 0.2,
            harmonic: 2.0,
            wave_speed: 2.0,
            border_thickness: 2.5,
            push_scale: 1.5,
            perp_spread: 0.5,
            z_jitter: 0.5,
            min_scale: 0.3,
            max_scale: 1.5,
            ring_alpha: 0.7,
            breath_speed: 1.5,
            breath_damp: 0.3,
            breath_base: 0.5,
            breath_z: 0.5,
            interior_alpha: 0.2,
            dormant_size: 0.5,
            dormant_alpha: 0.3,
            transparency_cap: 0.7,
            drift: Some(AmbientDrift::default()),
            smoothing: 0.02,
            first_input: FirstInput::Snap,
            rest_position: Vec2::ZERO,
            point_scale: 2.5,
            particle_count: DEFAULT_PARTICLE_COUNT,
            color: Vec3::splat(0.2),
        }
    }

    /// Three-lobed, faster ring over a cooler, denser field.
    ///
    /// Same rest and glide behaviour as [`classic`](Self::classic) with a
    /// quicker follow.
    pub fn trefoil() -> Self {
        Self {
            name: "trefoil",
            base_radius: 4.0,
            wave_amplitude: 0.5,
            harmonic: 3.0,
            wave_speed: 3.0,
            border_thickness: 2.5,
            push_scale: 2.0,
            perp_spread: 0.5,
            z_jitter: 0.5,
            min_scale: 0.3,
            max_scale: 1.5,
            ring_alpha: 0.9,
            breath_speed: 2.0,
            breath_damp: 0.3,
            breath_base: 0.5,
            breath_z: 0.5,
            interior_alpha: 0.7,
            dormant_size: 0.4,
            dormant_alpha: 0.1,
            transparency_cap: 1.0,
            drift: None,
            smoothing: 0.05,
            first_input: FirstInput::Glide,
            rest_position: Vec2::new(999.0, 999.0),
            point_scale: 2.5,
            particle_count: 2500,
            color: Vec3::new(0.2, 0.25, 0.35),
        }
    }

    /// Look up a built-in profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "drift" => Some(Self::drift()),
            "trefoil" => Some(Self::trefoil()),
            _ => None,
        }
    }

    /// All built-in profiles.
    pub fn builtin() -> [Self; 3] {
        [Self::classic(), Self::drift(), Self::trefoil()]
    }

    /// Check the profile once at startup.
    ///
    /// The formula is total for any profile that passes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in self.constants() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if !self.rest_position.is_finite() {
            return Err(ConfigError::NonFinite("rest_position"));
        }
        if !self.color.is_finite() {
            return Err(ConfigError::NonFinite("color"));
        }

        if self.base_radius <= 0.0 {
            return Err(ConfigError::NonPositiveBaseRadius(self.base_radius));
        }
        if self.border_thickness <= 0.0 {
            return Err(ConfigError::NonPositiveBorderThickness(self.border_thickness));
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::InvalidSmoothing(self.smoothing));
        }
        if !(self.transparency_cap > 0.0 && self.transparency_cap <= 1.0) {
            return Err(ConfigError::InvalidTransparencyCap(self.transparency_cap));
        }

        let non_negative = [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("ring_alpha", self.ring_alpha),
            ("interior_alpha", self.interior_alpha),
            ("dormant_size", self.dormant_size),
            ("dormant_alpha", self.dormant_alpha),
            ("point_scale", self.point_scale),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative(name));
            }
        }

        Ok(())
    }

    /// Named numeric constants, in the order they appear in WGSL.
    fn constants(&self) -> Vec<(&'static str, f32)> {
        let drift = self.drift.unwrap_or(AmbientDrift {
            time_scale: 0.0,
            amplitude: 0.0,
            y_frequency: 0.0,
            y_phase_scale: 0.0,
        });
        vec![
            ("base_radius", self.base_radius),
            ("wave_amplitude", self.wave_amplitude),
            ("harmonic", self.harmonic),
            ("wave_speed", self.wave_speed),
            ("border_thickness", self.border_thickness),
            ("push_scale", self.push_scale),
            ("perp_spread", self.perp_spread),
            ("z_jitter", self.z_jitter),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("ring_alpha", self.ring_alpha),
            ("breath_speed", self.breath_speed),
            ("breath_damp", self.breath_damp),
            ("breath_base", self.breath_base),
            ("breath_z", self.breath_z),
            ("interior_alpha", self.interior_alpha),
            ("dormant_size", self.dormant_size),
            ("dormant_alpha", self.dormant_alpha),
            ("transparency_cap", self.transparency_cap),
            ("drift_time_scale", drift.time_scale),
            ("drift_amplitude", drift.amplitude),
            ("drift_y_frequency", drift.y_frequency),
            ("drift_y_phase_scale", drift.y_phase_scale),
            ("smoothing", self.smoothing),
            ("point_scale", self.point_scale),
        ]
    }

    /// Emit the profile as WGSL `const` declarations.
    ///
    /// Pointer tuning and sprite scale are host-side and are not emitted.
    pub fn to_wgsl_constants(&self) -> String {
        let mut out = format!("// Field profile: {}\n", self.name);
        for (name, value) in self.constants() {
            if name == "smoothing" || name == "point_scale" {
                continue;
            }
            let _ = writeln!(
                out,
                "const {}: f32 = {};",
                name.to_uppercase(),
                wgsl_float(value)
            );
        }
        let _ = writeln!(out, "const DRIFT_ENABLED: bool = {};", self.drift.is_some());
        out
    }
}

impl Default for FieldProfile {
    fn default() -> Self {
        Self::classic()
    }
}

/// Format an `f32` as a WGSL float literal.
///
/// `Debug` always keeps a decimal point or exponent, so `4.0` stays a float
/// rather than becoming the abstract integer `4`.
pub(crate) fn wgsl_float(value: f32) -> String {
    format!("{:?}", value)
}
