//! Pointer input.
//!
//! The field only cares about one thing: where the cursor is, in normalized
//! device coordinates. `Input` turns raw winit cursor events into that.
//! X increases to the right, Y increases upward, and the origin is the
//! window center.
//!
//! The last known position is kept when the cursor leaves the window, so the
//! ring stays where the pointer exited instead of snapping back.

use glam::Vec2;
use winit::event::WindowEvent;

/// Cursor tracker for one window.
#[derive(Debug, Clone)]
pub struct Input {
    /// Last cursor position in physical pixels, if any was seen.
    cursor_px: Option<Vec2>,
    cursor_ndc: Vec2,
    // Window size for NDC calculation
    window_size: (u32, u32),
}

impl Input {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cursor_px: None,
            cursor_ndc: Vec2::ZERO,
            window_size: (width, height),
        }
    }

    /// Cursor in normalized device coordinates, `(0, 0)` until it first moves.
    #[inline]
    pub fn cursor_ndc(&self) -> Vec2 {
        self.cursor_ndc
    }

    #[inline]
    pub fn window_size(&self) -> (u32, u32) {
        self.window_size
    }

    /// Width over height; 1 for a degenerate window.
    pub fn aspect(&self) -> f32 {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            1.0
        } else {
            w as f32 / h as f32
        }
    }

    /// Update window size for NDC calculations.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        if let Some(px) = self.cursor_px {
            self.recompute_ndc(px);
        }
    }

    /// Record a cursor position in physical pixels.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let px = Vec2::new(x, y);
        self.cursor_px = Some(px);
        self.recompute_ndc(px);
    }

    fn recompute_ndc(&mut self, px: Vec2) {
        let (w, h) = self.window_size;
        if w == 0 || h == 0 {
            return;
        }
        let ndc = Vec2::new(
            (px.x / w as f32) * 2.0 - 1.0,
            1.0 - (px.y / h as f32) * 2.0, // Y flipped
        );
        if ndc.is_finite() {
            self.cursor_ndc = ndc.clamp(Vec2::NEG_ONE, Vec2::ONE);
        }
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x as f32, position.y as f32);
            }
            WindowEvent::Resized(size) => self.set_window_size(size.width, size.height),
            _ => {}
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_is_origin() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(400.0, 300.0);
        assert_eq!(input.cursor_ndc(), Vec2::ZERO);
    }

    #[test]
    fn test_corners_and_y_up() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(0.0, 0.0);
        assert_eq!(input.cursor_ndc(), Vec2::new(-1.0, 1.0));

        input.cursor_moved(800.0, 600.0);
        assert_eq!(input.cursor_ndc(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_outside_window_clamped() {
        let mut input = Input::new(100, 100);
        input.cursor_moved(-50.0, 250.0);
        assert_eq!(input.cursor_ndc(), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn test_resize_recomputes_ndc() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(400.0, 300.0);
        input.set_window_size(1600, 600);
        assert_eq!(input.cursor_ndc(), Vec2::new(-0.5, 0.0));
        assert!((input.aspect() - 1600.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_event_keeps_cursor_pixel() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(200.0, 150.0);
        input.handle_event(&WindowEvent::Resized(winit::dpi::PhysicalSize::new(400, 300)));

        assert_eq!(input.window_size(), (400, 300));
        assert_eq!(input.cursor_ndc(), Vec2::ZERO);
    }

    #[test]
    fn test_zero_size_window_keeps_last() {
        let mut input = Input::new(800, 600);
        input.cursor_moved(600.0, 300.0);
        input.set_window_size(0, 0);
        input.cursor_moved(10.0, 10.0);
        assert_eq!(input.cursor_ndc(), Vec2::new(0.5, 0.0));
        assert_eq!(input.aspect(), 1.0);
    }
}
