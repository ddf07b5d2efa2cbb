//! # Drifting Field
//!
//! The vertex-stage look: particle attributes are uploaded once and the GPU
//! evaluates the field every frame from pointer and time alone. Every
//! particle wanders slowly even when the pointer is still, and the idle field
//! stays faintly visible.
//!
//! Optional first argument sets the particle count.
//!
//! Run with: `cargo run --example drift -- 5000`

use wavefield::prelude::*;

fn main() -> Result<(), BackgroundError> {
    env_logger::init();

    let count: u32 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2000);

    Background::new()
        .with_profile(FieldProfile::drift())
        .with_mode(ExecutionMode::Device)
        .with_particle_count(count)
        .with_title("wavefield - drift")
        .run()
}
