//! Frame clock.
//!
//! The field is driven by one number, elapsed seconds. `Time` accumulates it
//! from per-frame deltas so that pausing (window hidden or minimized) and
//! long stalls never make the animation jump.
//!
//! # Example
//!
//! ```ignore
//! use wavefield::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per redraw:
//! let (elapsed, delta) = time.update();
//! ```

use std::time::{Duration, Instant};

/// Largest delta a single frame may contribute, in seconds.
pub const DEFAULT_MAX_DELTA: f32 = 0.1;

/// Elapsed/delta clock with pause support.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Accumulated elapsed seconds, excluding paused spans.
    elapsed_secs: f32,
    /// Time since last frame in seconds, after clamping.
    delta_secs: f32,
    /// Frames counted while running.
    frame_count: u64,
    paused: bool,
    /// Cap applied to each frame's delta.
    max_delta: f32,
}

impl Time {
    /// Create a clock starting now at zero elapsed.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            paused: false,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Set the per-frame delta cap.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Read the wall clock and advance. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.advance(raw)
    }

    /// Advance by an explicit span instead of reading the wall clock.
    pub fn advance(&mut self, span: Duration) -> (f32, f32) {
        if self.paused {
            self.delta_secs = 0.0;
            return (self.elapsed_secs, self.delta_secs);
        }

        self.delta_secs = span.as_secs_f32().min(self.max_delta);
        self.elapsed_secs += self.delta_secs;
        self.frame_count += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed seconds.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds since last frame (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Frames advanced since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop time progression.
    ///
    /// While paused, `delta()` returns 0 and `elapsed()` stops increasing.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression. The paused span is not counted.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
        assert!(!time.is_paused());
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(elapsed, delta);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_time_pause() {
        let mut time = Time::new();
        time.advance(Duration::from_millis(16));

        time.pause();
        let elapsed_before = time.elapsed();
        time.advance(Duration::from_millis(16));

        // Elapsed should not increase while paused
        assert_eq!(time.elapsed(), elapsed_before);
        assert_eq!(time.delta(), 0.0);
        assert_eq!(time.frame(), 1);

        time.resume();
        time.advance(Duration::from_millis(16));
        assert!(time.elapsed() > elapsed_before);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let mut time = Time::new().with_max_delta(0.05);
        let (elapsed, delta) = time.advance(Duration::from_secs(3));
        assert_eq!(delta, 0.05);
        assert_eq!(elapsed, 0.05);
    }

    #[test]
    fn test_elapsed_accumulates() {
        let mut time = Time::new();
        for _ in 0..10 {
            time.advance(Duration::from_millis(20));
        }
        assert!((time.elapsed() - 0.2).abs() < 1e-5);
    }
}
