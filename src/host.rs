//! Host-authoritative execution.
//!
//! Every frame the CPU runs the field over all particles and writes one
//! [`SpriteInstance`] per particle. The buffer is then flagged dirty and the
//! GPU layer re-uploads it before the next draw.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::field::FieldEvaluator;
use crate::store::ParticleStore;

/// Per-instance vertex data for the host strategy.
///
/// Layout matches the instance attributes of `shader::host_render_shader`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// World position after displacement.
    pub position: [f32; 3],
    /// Final sprite size (base size times size scale).
    pub size: f32,
    pub color: [f32; 3],
    pub alpha: f32,
}

/// Render buffers owned by the host loop.
#[derive(Debug, Clone)]
pub struct HostBuffers {
    instances: Vec<SpriteInstance>,
    dirty: bool,
}

impl HostBuffers {
    /// Allocate buffers holding every particle at rest.
    pub fn new(store: &ParticleStore) -> Self {
        let instances = store
            .particles()
            .iter()
            .map(|p| SpriteInstance {
                position: p.origin.to_array(),
                size: p.size,
                color: p.color.to_array(),
                alpha: 1.0,
            })
            .collect();
        Self {
            instances,
            dirty: true,
        }
    }

    /// Evaluate the field for every particle and overwrite the buffers.
    ///
    /// Runs to completion before returning; callers never see a partially
    /// written frame.
    pub fn evaluate_into(
        &mut self,
        evaluator: &FieldEvaluator,
        store: &ParticleStore,
        pointer: Vec2,
        time: f32,
    ) {
        debug_assert_eq!(self.instances.len(), store.len());

        for (instance, particle) in self.instances.iter_mut().zip(store.particles()) {
            let out = evaluator.evaluate(particle, pointer, time);
            *instance = SpriteInstance {
                position: (particle.origin + out.displacement).to_array(),
                size: particle.size * out.size_scale,
                color: particle.color.to_array(),
                alpha: out.alpha,
            };
        }
        self.dirty = true;
    }

    #[inline]
    pub fn instances(&self) -> &[SpriteInstance] {
        &self.instances
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Whether the buffers changed since the last upload.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand out the bytes to upload if dirty, clearing the flag.
    pub fn take_dirty(&mut self) -> Option<&[u8]> {
        if self.dirty {
            self.dirty = false;
            Some(bytemuck::cast_slice(&self.instances))
        } else {
            None
        }
    }
}
