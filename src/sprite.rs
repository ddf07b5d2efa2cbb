//! Point-sprite rasterisation contract.
//!
//! Host-side mirror of the fragment stage in `shaders/sprite.wgsl`: a sprite
//! is a disc of diameter `size * point_scale * 300 / depth` pixels. It is
//! fully covered out to sprite-local distance 0.3 and fades to nothing at
//! 0.5. Fragments beyond 0.5 are discarded.

use glam::Vec2;

/// Depth at which a sprite of size 1 and scale 1 is 1 pixel across.
pub const SPRITE_REFERENCE_DEPTH: f32 = 300.0;

/// Sprite-local distance where the fade begins.
pub const FADE_START: f32 = 0.3;

/// Sprite-local distance where fragments are discarded.
pub const FADE_END: f32 = 0.5;

/// Pixel diameter of a sprite at `view_depth` world units from the camera.
pub fn pixel_diameter(size: f32, point_scale: f32, view_depth: f32) -> f32 {
    if view_depth <= 0.0 {
        return 0.0;
    }
    size * point_scale * (SPRITE_REFERENCE_DEPTH / view_depth)
}

/// Fragment alpha at sprite coordinate `uv` in `[0, 1]²`.
///
/// Returns `None` for discarded fragments.
pub fn coverage(uv: Vec2, alpha: f32) -> Option<f32> {
    let d = uv.distance(Vec2::splat(0.5));
    if d > FADE_END {
        return None;
    }
    Some((1.0 - smoothstep(FADE_START, FADE_END, d)) * alpha)
}

/// WGSL `smoothstep`.
fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_fully_covered() {
        assert_eq!(coverage(Vec2::splat(0.5), 0.8), Some(0.8));
        assert_eq!(coverage(Vec2::new(0.5, 0.75), 1.0), Some(1.0));
    }

    #[test]
    fn test_edge_fades_out() {
        let mid = coverage(Vec2::new(0.5, 0.9), 1.0).unwrap();
        assert!((mid - 0.5).abs() < 1e-6);

        let edge = coverage(Vec2::new(0.5, 1.0), 1.0).unwrap();
        assert_eq!(edge, 0.0);
    }

    #[test]
    fn test_corners_discarded() {
        assert_eq!(coverage(Vec2::ZERO, 1.0), None);
        assert_eq!(coverage(Vec2::ONE, 1.0), None);
    }

    #[test]
    fn test_pixel_diameter() {
        // Camera at z = 15 looking at a particle on the z = 0 plane
        let px = pixel_diameter(0.1, 2.5, 15.0);
        assert!((px - 5.0).abs() < 1e-5);
        assert_eq!(pixel_diameter(0.1, 2.5, 0.0), 0.0);
    }
}
