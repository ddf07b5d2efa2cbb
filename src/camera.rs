//! Fixed perspective camera.

use glam::{Mat4, Vec2, Vec3};

/// Near clip plane distance.
const Z_NEAR: f32 = 0.1;
/// Far clip plane distance.
const Z_FAR: f32 = 1000.0;

/// Camera looking down -Z at the particle plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
}

impl Camera {
    /// Camera at `(0, 0, 15)` with a 50° vertical field of view.
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 15.0),
            target: Vec3::ZERO,
            fov_y_degrees: 50.0,
        }
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view_matrix()
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Visible width and height of the plane through the target.
    ///
    /// This is the `viewport_world` the pointer tracker maps NDC onto.
    pub fn viewport_world_size(&self, aspect: f32) -> Vec2 {
        let height = 2.0 * self.distance() * (self.fov_y_degrees.to_radians() * 0.5).tan();
        Vec2::new(height * aspect, height)
    }

    /// View-space depth of a world point (positive in front of the camera).
    pub fn view_depth(&self, world: Vec3) -> f32 {
        -self.view_matrix().transform_point3(world).z
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
