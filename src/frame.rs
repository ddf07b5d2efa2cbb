//! Per-frame scheduling.
//!
//! `FrameLoop` owns the clock and the pointer tracker. Each redraw it is
//! ticked once; the returned [`FrameInput`] is everything either execution
//! strategy needs to produce a frame. After [`FrameLoop::cancel`] no further
//! frames are produced.

use glam::Vec2;

use crate::pointer::PointerTracker;
use crate::profile::FieldProfile;
use crate::time::Time;

/// Inputs to one frame of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Elapsed seconds.
    pub time: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Smoothed pointer in world units.
    pub pointer: Vec2,
}

/// Clock, pointer smoothing and cancellation for one background.
#[derive(Debug)]
pub struct FrameLoop {
    time: Time,
    tracker: PointerTracker,
    viewport_world: Vec2,
    cancelled: bool,
}

impl FrameLoop {
    pub fn new(profile: &FieldProfile, viewport_world: Vec2) -> Self {
        Self::with_time(profile, viewport_world, Time::new())
    }

    /// Use a preconfigured clock.
    pub fn with_time(profile: &FieldProfile, viewport_world: Vec2, time: Time) -> Self {
        Self {
            time,
            tracker: PointerTracker::new(profile),
            viewport_world,
            cancelled: false,
        }
    }

    /// Visible world size at the particle plane; changes on resize.
    pub fn set_viewport_world(&mut self, viewport_world: Vec2) {
        self.viewport_world = viewport_world;
    }

    #[inline]
    pub fn viewport_world(&self) -> Vec2 {
        self.viewport_world
    }

    /// Advance the clock from the wall clock and smooth the pointer.
    ///
    /// Returns `None` once cancelled.
    pub fn tick(&mut self, raw_ndc: Vec2) -> Option<FrameInput> {
        if self.cancelled {
            return None;
        }
        self.time.update();
        Some(self.finish(raw_ndc))
    }

    /// Like [`tick`](Self::tick) with an explicit frame duration.
    pub fn tick_by(&mut self, raw_ndc: Vec2, span: std::time::Duration) -> Option<FrameInput> {
        if self.cancelled {
            return None;
        }
        self.time.advance(span);
        Some(self.finish(raw_ndc))
    }

    fn finish(&mut self, raw_ndc: Vec2) -> FrameInput {
        let delta = self.time.delta();
        let pointer = self.tracker.update(raw_ndc, self.viewport_world, delta);
        FrameInput {
            time: self.time.elapsed(),
            delta,
            pointer,
        }
    }

    /// Stop producing frames. Irreversible.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Freeze elapsed time, e.g. while the window is hidden.
    pub fn pause(&mut self) {
        self.time.pause();
    }

    pub fn resume(&mut self) {
        self.time.resume();
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.time.is_paused()
    }

    #[inline]
    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.time.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_tick_advances_time_and_pointer() {
        let mut frames = FrameLoop::new(&FieldProfile::drift(), Vec2::new(20.0, 10.0));

        let first = frames.tick_by(Vec2::new(0.5, 0.5), FRAME).unwrap();
        // drift profile snaps on first input
        assert_eq!(first.pointer, Vec2::new(5.0, 2.5));
        assert!((first.time - 0.016).abs() < 1e-6);

        let second = frames.tick_by(Vec2::new(0.5, 0.5), FRAME).unwrap();
        assert!(second.time > first.time);
        assert_eq!(frames.frame_count(), 2);
    }

    #[test]
    fn test_cancel_stops_frames() {
        let mut frames = FrameLoop::new(&FieldProfile::classic(), Vec2::new(20.0, 10.0));
        assert!(frames.tick_by(Vec2::ZERO, FRAME).is_some());

        frames.cancel();
        assert!(frames.is_cancelled());
        assert!(frames.tick(Vec2::ZERO).is_none());
        assert!(frames.tick_by(Vec2::ONE, FRAME).is_none());
        assert_eq!(frames.frame_count(), 1);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut frames = FrameLoop::new(&FieldProfile::classic(), Vec2::new(20.0, 10.0));
        let before = frames.tick_by(Vec2::ZERO, FRAME).unwrap().time;

        frames.pause();
        let paused = frames.tick_by(Vec2::ZERO, FRAME).unwrap();
        assert_eq!(paused.time, before);
        assert_eq!(paused.delta, 0.0);

        frames.resume();
        assert!(frames.tick_by(Vec2::ZERO, FRAME).unwrap().time > before);
    }

    #[test]
    fn test_viewport_change_moves_target() {
        let mut frames = FrameLoop::new(&FieldProfile::drift(), Vec2::new(20.0, 10.0));
        frames.tick_by(Vec2::new(1.0, 0.0), FRAME);
        assert_eq!(frames.tracker().position(), Vec2::new(10.0, 0.0));

        frames.set_viewport_world(Vec2::new(40.0, 10.0));
        let next = frames.tick_by(Vec2::new(1.0, 0.0), FRAME).unwrap();
        assert!((next.pointer.x - (10.0 + 10.0 * 0.02)).abs() < 1e-4);
    }
}
