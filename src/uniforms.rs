//! Uniform blocks shared by both render strategies.
//!
//! `FrameUniforms` matches `struct FrameUniforms` in `shaders/sprite.wgsl`:
//!
//! | offset | field |
//! |--------|-------|
//! | 0 | `view_proj` |
//! | 64 | `pointer` |
//! | 72 | `time` |
//! | 76 | `point_scale` |
//! | 80 | `viewport` |
//!
//! The camera, sprite scale and viewport only change on resize. Per frame
//! the device strategy rewrites just the 16-byte [`FrameDynamics`] slice at
//! [`FrameUniforms::DYNAMICS_OFFSET`].

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

/// Full uniform block, written on startup and resize.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Smoothed pointer in world units.
    pub pointer: [f32; 2],
    /// Elapsed seconds.
    pub time: f32,
    pub point_scale: f32,
    /// Surface size in physical pixels.
    pub viewport: [f32; 2],
    pub _padding: [f32; 2],
}

/// The part of [`FrameUniforms`] that changes every frame.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameDynamics {
    pub pointer: [f32; 2],
    pub time: f32,
    pub point_scale: f32,
}

impl FrameUniforms {
    /// Byte offset of [`FrameDynamics`] inside the block.
    pub const DYNAMICS_OFFSET: u64 = 64;

    pub fn new(view_proj: Mat4, viewport: Vec2, point_scale: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            pointer: [0.0; 2],
            time: 0.0,
            point_scale,
            viewport: viewport.to_array(),
            _padding: [0.0; 2],
        }
    }

    /// Overwrite the per-frame fields.
    pub fn set_dynamics(&mut self, pointer: Vec2, time: f32) {
        self.pointer = pointer.to_array();
        self.time = time;
    }

    pub fn dynamics(&self) -> FrameDynamics {
        FrameDynamics {
            pointer: self.pointer,
            time: self.time,
            point_scale: self.point_scale,
        }
    }
}
