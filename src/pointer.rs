//! Smoothed pointer position.
//!
//! Raw pointer input is jittery and jumps; the field follows a lagging copy
//! of it instead. The tracker is a two-state machine:
//!
//! ```text
//! Uninitialized --(first update)-------------> Tracking   (Glide)
//! Uninitialized --(first nonzero input)------> Tracking   (Snap)
//! ```
//!
//! While uninitialized it holds the profile's rest position. The transition
//! fires exactly once. [`FirstInput::Glide`] starts lerping from the rest
//! position on the first frame, so an idle pointer still pulls the ring in
//! toward the center. [`FirstInput::Snap`] waits for real input and jumps
//! straight to it.

use glam::Vec2;

use crate::profile::{FieldProfile, FirstInput};

/// State of a [`PointerTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerState {
    /// No real input seen yet; holding the rest position.
    Uninitialized { rest: Vec2 },
    /// Following the pointer.
    Tracking { smoothed: Vec2 },
}

/// Lazy-follow pointer in world space.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    state: TrackerState,
    smoothing: f32,
    first_input: FirstInput,
    raw_ndc: Vec2,
}

impl PointerTracker {
    /// Create a tracker from a validated profile.
    pub fn new(profile: &FieldProfile) -> Self {
        Self::with_policy(profile.smoothing, profile.first_input, profile.rest_position)
    }

    pub fn with_policy(smoothing: f32, first_input: FirstInput, rest: Vec2) -> Self {
        Self {
            state: TrackerState::Uninitialized { rest },
            smoothing,
            first_input,
            raw_ndc: Vec2::ZERO,
        }
    }

    /// Advance one frame toward `raw_ndc` and return the smoothed world position.
    ///
    /// `raw_ndc` is in `[-1, 1]` per axis with y up; `viewport_world` is the
    /// visible width and height at the particle plane. Smoothing is applied
    /// per frame, so `_dt` does not scale it.
    pub fn update(&mut self, raw_ndc: Vec2, viewport_world: Vec2, _dt: f32) -> Vec2 {
        if !raw_ndc.is_finite() || !viewport_world.is_finite() {
            return self.position();
        }
        self.raw_ndc = raw_ndc;
        let target = raw_ndc * viewport_world * 0.5;

        self.state = match self.state {
            TrackerState::Uninitialized { rest } => match self.first_input {
                FirstInput::Glide => TrackerState::Tracking {
                    smoothed: rest + (target - rest) * self.smoothing,
                },
                FirstInput::Snap if raw_ndc != Vec2::ZERO => {
                    TrackerState::Tracking { smoothed: target }
                }
                FirstInput::Snap => TrackerState::Uninitialized { rest },
            },
            TrackerState::Tracking { smoothed } => TrackerState::Tracking {
                smoothed: smoothed + (target - smoothed) * self.smoothing,
            },
        };

        self.position()
    }

    /// Current smoothed world position (the rest position before first input).
    pub fn position(&self) -> Vec2 {
        match self.state {
            TrackerState::Uninitialized { rest } => rest,
            TrackerState::Tracking { smoothed } => smoothed,
        }
    }

    #[inline]
    pub fn state(&self) -> TrackerState {
        self.state
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    #[inline]
    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Last accepted raw input.
    #[inline]
    pub fn raw_ndc(&self) -> Vec2 {
        self.raw_ndc
    }
}
