//! Scarp Camera - Pan/zoom/drag view state with smoothing
//!
//! The camera models a view rectangle of `base_size * zoom` centered on
//! an origin point. Zoom and origin both ease toward targets with the
//! same epsilon-snap interpolation the rotation engine uses; dragging is
//! the exception and tracks the cursor 1:1.

use scarp_core::{Smoothed, SmoothedVec2, Vec2};

const MIN_ZOOM: f32 = 0.2;
const MAX_ZOOM: f32 = 2.5;
/// Zoom change per wheel notch
const ZOOM_STEP: f32 = 0.1;
const ZOOM_SPEED: f32 = 2.5;
const ZOOM_EPSILON: f32 = 0.01;
const PAN_SPEED: f32 = 8.0;
/// Pan snap tolerance in view units
const PAN_EPSILON: f32 = 0.25;

/// Smoothed 2D view over the scene's screen coordinate space
pub struct Camera {
    /// View size at zoom 1, in view units
    base_size: Vec2,
    /// Window size in physical pixels
    viewport: Vec2,
    zoom: Smoothed,
    origin: SmoothedVec2,
    /// World point captured under the cursor at drag start
    drag_anchor: Option<Vec2>,
}

impl Camera {
    /// Create a camera whose base view matches the window size, so one
    /// view unit is one pixel at zoom 1
    pub fn new(size: Vec2) -> Self {
        Self {
            base_size: size,
            viewport: size,
            zoom: Smoothed::new(1.0, ZOOM_SPEED, ZOOM_EPSILON),
            origin: SmoothedVec2::new(Vec2::ZERO, PAN_SPEED, PAN_EPSILON),
            drag_anchor: None,
        }
    }

    /// Advance the zoom and pan interpolation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.zoom.advance(dt);
        self.origin.advance(dt);
    }

    /// Window resize: the base view follows the window and zoom resets
    pub fn set_viewport(&mut self, size: Vec2) {
        self.base_size = size;
        self.viewport = size;
        self.zoom.set(1.0);
    }

    pub fn center(&self) -> Vec2 {
        self.origin.current()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom.current()
    }

    /// Current view rectangle size in view units
    pub fn view_size(&self) -> Vec2 {
        self.base_size * self.zoom.current()
    }

    pub fn is_settled(&self) -> bool {
        self.zoom.is_settled() && self.origin.is_settled()
    }

    /// Map a window pixel position to view/world coordinates under the
    /// current (possibly still easing) state
    pub fn pixel_to_world(&self, pixel: Vec2) -> Vec2 {
        self.map_pixel(pixel, self.zoom.current(), self.origin.current())
    }

    /// Step the zoom target; positive zooms out. Clamped to the zoom
    /// bounds, eased by update.
    pub fn zoom_steps(&mut self, delta: f32) {
        let target = (self.zoom.target() + ZOOM_STEP * delta).clamp(MIN_ZOOM, MAX_ZOOM);
        self.zoom.set_target(target);
    }

    /// Zoom anchored at a cursor pixel: the world point under the cursor
    /// stays fixed on screen. Both zoom and origin may still be easing
    /// toward earlier targets, so the stabilization is computed against
    /// the predicted future state (target zoom + target origin), not the
    /// current one, and folded into the target origin.
    pub fn zoom_at(&mut self, delta: f32, cursor: Vec2) {
        let new_zoom = (self.zoom.target() + ZOOM_STEP * delta).clamp(MIN_ZOOM, MAX_ZOOM);

        let before = self.map_pixel(cursor, self.zoom.target(), self.origin.target());
        let after = self.map_pixel(cursor, new_zoom, self.origin.target());

        self.origin.shift_target(before - after);
        self.zoom.set_target(new_zoom);
    }

    /// Shift the pan target; the view eases toward it
    pub fn pan(&mut self, delta: Vec2) {
        self.origin.shift_target(delta);
    }

    /// Jump the view center with no easing
    pub fn set_center(&mut self, center: Vec2) {
        self.origin.set(center);
    }

    /// Capture the world point under the cursor as the drag anchor
    pub fn begin_drag(&mut self, cursor: Vec2) {
        self.drag_anchor = Some(self.pixel_to_world(cursor));
    }

    /// Keep the anchored world point under the cursor. The correction is
    /// applied to current and target alike: dragging must track 1:1,
    /// unlike programmatic pans which ease.
    pub fn drag_to(&mut self, cursor: Vec2) {
        let Some(anchor) = self.drag_anchor else {
            return;
        };
        let under_cursor = self.pixel_to_world(cursor);
        self.origin.shift_both(anchor - under_cursor);
    }

    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    fn map_pixel(&self, pixel: Vec2, zoom: f32, origin: Vec2) -> Vec2 {
        let scale = Vec2::new(
            self.base_size.x * zoom / self.viewport.x,
            self.base_size.y * zoom / self.viewport.y,
        );
        Vec2::new(
            origin.x + (pixel.x - self.viewport.x / 2.0) * scale.x,
            origin.y + (pixel.y - self.viewport.y / 2.0) * scale.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn camera() -> Camera {
        Camera::new(Vec2::new(1200.0, 800.0))
    }

    fn settle(cam: &mut Camera) {
        let mut steps = 0;
        while !cam.is_settled() {
            cam.update(DT);
            steps += 1;
            assert!(steps < 10_000, "camera never settled");
        }
    }

    #[test]
    fn test_pixel_mapping_at_rest() {
        let cam = camera();
        // window center maps to the origin at zoom 1
        assert_eq!(cam.pixel_to_world(Vec2::new(600.0, 400.0)), Vec2::ZERO);
        assert_eq!(
            cam.pixel_to_world(Vec2::new(700.0, 400.0)),
            Vec2::new(100.0, 0.0)
        );
    }

    #[test]
    fn test_zoom_converges_and_clamps() {
        let mut cam = camera();
        cam.zoom_steps(100.0);
        settle(&mut cam);
        assert_eq!(cam.zoom(), MAX_ZOOM);

        cam.zoom_steps(-1000.0);
        settle(&mut cam);
        assert_eq!(cam.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pan_eases_to_target() {
        let mut cam = camera();
        cam.pan(Vec2::new(50.0, -30.0));
        assert_eq!(cam.center(), Vec2::ZERO);

        settle(&mut cam);
        assert_eq!(cam.center(), Vec2::new(50.0, -30.0));
    }

    #[test]
    fn test_drag_tracks_one_to_one() {
        let mut cam = camera();
        let start = Vec2::new(300.0, 500.0);
        cam.begin_drag(start);
        let anchor = cam.pixel_to_world(start);

        for &cursor in &[
            Vec2::new(310.0, 500.0),
            Vec2::new(420.0, 380.0),
            Vec2::new(100.0, 700.0),
        ] {
            cam.drag_to(cursor);
            // the anchored world point is back under the cursor, with no
            // easing lag
            assert!(cam.pixel_to_world(cursor).distance_to(anchor) < 1e-2);
        }

        cam.end_drag();
        assert!(!cam.is_dragging());
        let center = cam.center();
        cam.drag_to(Vec2::new(0.0, 0.0));
        assert_eq!(cam.center(), center);
    }

    #[test]
    fn test_drag_during_zoom_keeps_anchor() {
        let mut cam = camera();
        cam.zoom_steps(3.0);
        cam.update(DT); // zoom still easing

        let cursor = Vec2::new(250.0, 600.0);
        cam.begin_drag(cursor);
        let anchor = cam.pixel_to_world(cursor);
        let moved = Vec2::new(400.0, 450.0);
        cam.drag_to(moved);
        assert!(cam.pixel_to_world(moved).distance_to(anchor) < 1e-2);
    }

    #[test]
    fn test_cursor_anchored_zoom_fixes_point() {
        let mut cam = camera();
        let cursor = Vec2::new(900.0, 200.0);

        let fixed = cam.pixel_to_world(cursor);
        cam.zoom_at(-2.0, cursor);
        settle(&mut cam);

        let after = cam.pixel_to_world(cursor);
        assert!(
            fixed.distance_to(after) < 1e-2,
            "anchored point drifted from {fixed:?} to {after:?}"
        );
        assert!(cam.zoom() < 1.0);
    }

    #[test]
    fn test_cursor_anchored_zoom_mid_flight() {
        // a second wheel notch arrives while the first is still easing;
        // anchoring against the predicted target state keeps the point
        // fixed once everything settles
        let mut cam = camera();
        let cursor = Vec2::new(150.0, 650.0);

        let fixed = cam.pixel_to_world(cursor);
        cam.zoom_at(-1.0, cursor);
        cam.update(DT);
        cam.update(DT);
        cam.zoom_at(-1.0, cursor);
        settle(&mut cam);

        let after = cam.pixel_to_world(cursor);
        assert!(
            fixed.distance_to(after) < 1e-2,
            "anchored point drifted from {fixed:?} to {after:?}"
        );
    }

    #[test]
    fn test_viewport_reset() {
        let mut cam = camera();
        cam.zoom_steps(5.0);
        settle(&mut cam);
        cam.set_viewport(Vec2::new(800.0, 600.0));
        assert_eq!(cam.zoom(), 1.0);
        assert_eq!(cam.view_size(), Vec2::new(800.0, 600.0));
    }
}
