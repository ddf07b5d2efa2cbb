//! # Trefoil Field
//!
//! The trefoil look: a fast three-lobed ring over a denser, bluish field.
//! Particle count and color come from the profile. Pass `wide` for a larger
//! ring in a deeper box with ambient drift switched on.
//!
//! Run with: `cargo run --example trefoil [wide]`

use wavefield::prelude::*;

fn main() -> Result<(), BackgroundError> {
    env_logger::init();

    let wide = std::env::args().nth(1).as_deref() == Some("wide");
    let background = if wide {
        let profile = FieldProfile {
            name: "trefoil-wide",
            base_radius: 5.0,
            drift: Some(AmbientDrift {
                amplitude: 0.4,
                ..AmbientDrift::default()
            }),
            ..FieldProfile::trefoil()
        };
        Background::new()
            .with_profile(profile)
            .with_particle_count(3000)
            .with_bounds(DomainBounds::new(40.0, 28.0, 8.0))
    } else {
        Background::new().with_profile(FieldProfile::trefoil())
    };

    background
        .with_mode(ExecutionMode::Device)
        .with_title("wavefield - trefoil")
        .run()
}
