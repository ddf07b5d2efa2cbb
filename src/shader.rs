//! WGSL generation for both execution strategies.
//!
//! Shaders are assembled from three pieces:
//!
//! - the profile's constants ([`FieldProfile::to_wgsl_constants`])
//! - `shaders/field.wgsl`, the WGSL twin of [`FieldEvaluator`](crate::field::FieldEvaluator)
//! - `shaders/sprite.wgsl`, frame uniforms and the point-sprite quad
//!
//! plus a small entry point chosen by strategy. Host mode does not need the
//! field at all; its vertex stage only expands precomputed instances.

use crate::profile::FieldProfile;

/// Field formula, expects profile constants prepended.
pub const FIELD_WGSL: &str = include_str!("shaders/field.wgsl");

/// Frame uniforms, sprite quad expansion and the fragment stage.
pub const SPRITE_WGSL: &str = include_str!("shaders/sprite.wgsl");

/// Workgroup size of the probe compute shader.
pub const PROBE_WORKGROUP_SIZE: u32 = 64;

/// Render shader for the host-authoritative strategy.
///
/// Instance attributes match [`SpriteInstance`](crate::host::SpriteInstance).
pub fn host_render_shader() -> String {
    format!(
        r#"{sprite}
@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
    @location(2) color: vec3<f32>,
    @location(3) alpha: f32,
) -> VertexOutput {{
    return sprite_vertex(vertex_index, position, size, color, alpha);
}}
"#,
        sprite = SPRITE_WGSL
    )
}

/// Render shader for the device-authoritative strategy.
///
/// Instance attributes match [`ParticleAttributes`](crate::store::ParticleAttributes).
/// The only per-frame inputs are `frame.pointer` and `frame.time`.
pub fn device_render_shader(profile: &FieldProfile) -> String {
    format!(
        r#"{constants}
{field}
{sprite}
@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) origin: vec3<f32>,
    @location(1) size: f32,
    @location(2) random: vec3<f32>,
    @location(3) color: vec3<f32>,
) -> VertexOutput {{
    let field = evaluate_field(origin, random, frame.pointer, frame.time);
    return sprite_vertex(
        vertex_index,
        origin + field.displacement,
        size * field.size_scale,
        color,
        field.alpha,
    );
}}
"#,
        constants = profile.to_wgsl_constants(),
        field = FIELD_WGSL,
        sprite = SPRITE_WGSL
    )
}

/// Compute shader that evaluates the WGSL field into a storage buffer.
///
/// Used by [`DeviceProbe`](crate::gpu::DeviceProbe) to read device-side
/// results back for comparison with the host evaluator.
pub fn probe_shader(profile: &FieldProfile) -> String {
    format!(
        r#"{constants}
{field}
struct ParticleAttributes {{
    origin: vec3<f32>,
    size: f32,
    random: vec3<f32>,
    _pad0: f32,
    color: vec3<f32>,
    _pad1: f32,
}};

struct ProbeOutput {{
    displacement: vec3<f32>,
    size_scale: f32,
    alpha: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}};

struct ProbeParams {{
    pointer: vec2<f32>,
    time: f32,
    count: u32,
}};

@group(0) @binding(0)
var<storage, read> particles: array<ParticleAttributes>;

@group(0) @binding(1)
var<storage, read_write> outputs: array<ProbeOutput>;

@group(0) @binding(2)
var<uniform> params: ProbeParams;

@compute @workgroup_size({workgroup_size})
fn main(@builtin(global_invocation_id) global_id: vec3<u32>) {{
    let index = global_id.x;
    if index >= params.count {{
        return;
    }}

    let p = particles[index];
    let field = evaluate_field(p.origin, p.random, params.pointer, params.time);

    var out: ProbeOutput;
    out.displacement = field.displacement;
    out.size_scale = field.size_scale;
    out.alpha = field.alpha;
    outputs[index] = out;
}}
"#,
        constants = profile.to_wgsl_constants(),
        field = FIELD_WGSL,
        workgroup_size = PROBE_WORKGROUP_SIZE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(code)))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_host_render_shader_valid() {
        let shader = host_render_shader();
        assert!(shader.contains("fn vs_main"));
        assert!(shader.contains("fn fs_main"));
        assert!(!shader.contains("evaluate_field"));
        validate_wgsl(&shader).expect("Host render shader should be valid");
    }

    #[test]
    fn test_device_render_shader_valid_for_every_profile() {
        for profile in FieldProfile::builtin() {
            let shader = device_render_shader(&profile);
            assert!(shader.contains("evaluate_field(origin, random, frame.pointer, frame.time)"));
            validate_wgsl(&shader)
                .unwrap_or_else(|e| panic!("{} render shader invalid: {}", profile.name, e));
        }
    }

    #[test]
    fn test_probe_shader_valid_for_every_profile() {
        for profile in FieldProfile::builtin() {
            let shader = probe_shader(&profile);
            assert!(shader.contains("@workgroup_size(64)"));
            validate_wgsl(&shader)
                .unwrap_or_else(|e| panic!("{} probe shader invalid: {}", profile.name, e));
        }
    }

    #[test]
    fn test_sprite_constants_match_host_mirror() {
        use crate::profile::wgsl_float;
        use crate::sprite::{FADE_END, FADE_START, SPRITE_REFERENCE_DEPTH};

        assert!(SPRITE_WGSL.contains(&format!(
            "const SPRITE_REFERENCE_DEPTH: f32 = {};",
            wgsl_float(SPRITE_REFERENCE_DEPTH)
        )));
        assert!(SPRITE_WGSL.contains(&format!(
            "smoothstep({}, {}, dist)",
            wgsl_float(FADE_START),
            wgsl_float(FADE_END)
        )));
    }

    #[test]
    fn test_custom_profile_constants_reach_shader() {
        let profile = FieldProfile {
            base_radius: 6.25,
            harmonic: 5.0,
            ..FieldProfile::trefoil()
        };
        let shader = device_render_shader(&profile);
        assert!(shader.contains("const BASE_RADIUS: f32 = 6.25;"));
        assert!(shader.contains("const HARMONIC: f32 = 5.0;"));
        validate_wgsl(&shader).expect("Custom profile shader should be valid");
    }
}
