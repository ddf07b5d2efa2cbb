//! # wavefield
//!
//! Pointer-reactive decorative particle field.
//!
//! A few thousand point sprites sit in a shallow box. Around the smoothed
//! pointer sits a wavy interaction ring: particles on it are pushed along the
//! wave and grow, particles inside it breathe in place, particles far away
//! idle small and faint.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wavefield::prelude::*;
//!
//! fn main() -> Result<(), BackgroundError> {
//!     Background::new()
//!         .with_profile(FieldProfile::drift())
//!         .with_mode(ExecutionMode::Device)
//!         .run()
//! }
//! ```
//!
//! ## Execution Strategies
//!
//! The same formula runs in one of two places:
//!
//! | Mode | Where | Per-frame upload |
//! |------|-------|------------------|
//! | [`ExecutionMode::Host`] | [`HostBuffers::evaluate_into`] on the CPU | every instance |
//! | [`ExecutionMode::Device`] | `evaluate_field` in the WGSL vertex stage | pointer and time |
//!
//! [`FieldEvaluator`] is the reference; [`DeviceProbe`] runs the WGSL version
//! headlessly so the two can be compared.
//!
//! ## Profiles
//!
//! Every constant of the formula lives in a [`FieldProfile`]. Built-ins are
//! [`FieldProfile::classic`], [`FieldProfile::drift`] and
//! [`FieldProfile::trefoil`]; custom looks use struct update syntax and are
//! checked once by [`FieldProfile::validate`].

pub mod background;
pub mod camera;
pub mod error;
pub mod field;
pub mod frame;
pub mod gpu;
pub mod host;
pub mod input;
pub mod pointer;
pub mod profile;
pub mod shader;
pub mod sprite;
pub mod store;
pub mod time;
pub mod uniforms;

pub use background::Background;
pub use bytemuck;
pub use camera::Camera;
pub use error::{BackgroundError, ConfigError, GpuError};
pub use field::{FieldEvaluator, FieldOutput, FieldSample, Zone};
pub use frame::{FrameInput, FrameLoop};
pub use glam::{Vec2, Vec3};
pub use gpu::{DeviceProbe, ExecutionMode};
pub use host::{HostBuffers, SpriteInstance};
pub use pointer::{PointerTracker, TrackerState};
pub use profile::{AmbientDrift, FieldProfile, FirstInput};
pub use store::{DomainBounds, Particle, ParticleAttributes, ParticleStore, SizeRange};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use wavefield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::background::Background;
    pub use crate::error::{BackgroundError, ConfigError, GpuError};
    pub use crate::field::{FieldEvaluator, FieldOutput, Zone};
    pub use crate::gpu::ExecutionMode;
    pub use crate::profile::{AmbientDrift, FieldProfile, FirstInput};
    pub use crate::store::{DomainBounds, ParticleStore, SizeRange};
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3};
}
