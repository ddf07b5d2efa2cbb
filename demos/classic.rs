//! # Classic Field
//!
//! The host-driven look: the CPU evaluates every particle each frame and
//! re-uploads the instance buffer. The ring is wide and strongly lit, and
//! the idle field is almost invisible. The ring glides in from off-screen
//! toward the pointer, or toward the center if the pointer never moves.
//!
//! Pass `device` as the first argument to run the same profile in the
//! vertex stage instead.
//!
//! Run with: `cargo run --example classic`

use wavefield::prelude::*;

fn main() -> Result<(), BackgroundError> {
    env_logger::init();

    let mode = match std::env::args().nth(1).as_deref() {
        Some("device") => ExecutionMode::Device,
        _ => ExecutionMode::Host,
    };

    Background::new()
        .with_profile(FieldProfile::classic())
        .with_mode(mode)
        .with_title("wavefield - classic")
        .run()
}
