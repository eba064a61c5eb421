//! Pan/zoom state of an interactive view and its conversion into a [`Viewport`]
//!
//! Only the arithmetic lives here; collecting gestures or pointer events is
//! left to whatever drives the view.

use crate::viewport::Viewport;
use glam::Vec2;

/// Half-width of the real axis span at zoom 1, in complex-plane units
pub const SCALE_MULTIPLIER: f32 = 2.0;

/// Surface points per complex-plane unit when panning at zoom 1
pub const POINTS_PER_UNIT: f32 = 175.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneTransform {
    pub translation: Vec2,
    pub zoom: f32,
}

impl Default for SceneTransform {
    fn default() -> Self {
        Self {
            translation: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl SceneTransform {
    /// Moves the view by a drag of `delta` surface points.
    ///
    /// Dragging right or down moves the image with the pointer, so the view
    /// center moves the opposite way. The same drag covers less of the plane
    /// the further in the view is zoomed.
    pub fn pan(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.translation -= delta / POINTS_PER_UNIT / self.zoom;
    }

    /// Multiplies the zoom; non-finite or non-positive factors are ignored
    pub fn zoom_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let zoom = self.zoom * factor;
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        }
    }

    /// Viewport for a surface of `width` x `height` points.
    ///
    /// The real axis always spans `2 * SCALE_MULTIPLIER / zoom`; the imaginary
    /// axis follows the surface's aspect ratio so pixels stay square.
    pub fn viewport(&self, width: u32, height: u32, iteration_cap: u32) -> Viewport {
        Viewport::new(
            self.zoom,
            iteration_cap,
            self.translation,
            aspect_ratio(width, height),
        )
    }
}

/// Aspect components for a `width` x `height` surface
pub fn aspect_ratio(width: u32, height: u32) -> Vec2 {
    if width == 0 {
        return Vec2::splat(SCALE_MULTIPLIER);
    }
    Vec2::new(
        SCALE_MULTIPLIER,
        height as f32 / width as f32 * SCALE_MULTIPLIER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_surface() {
        assert_eq!(aspect_ratio(800, 400), Vec2::new(2.0, 1.0));
        assert_eq!(aspect_ratio(400, 800), Vec2::new(2.0, 4.0));
        assert_eq!(aspect_ratio(0, 10), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn pan_is_inverse_to_drag_and_zoom() {
        let mut scene = SceneTransform::default();
        scene.pan(Vec2::new(175.0, -350.0));
        assert_eq!(scene.translation, Vec2::new(-1.0, 2.0));

        let mut zoomed = SceneTransform {
            zoom: 4.0,
            ..Default::default()
        };
        zoomed.pan(Vec2::new(175.0, 0.0));
        assert_eq!(zoomed.translation, Vec2::new(-0.25, 0.0));
    }

    #[test]
    fn zoom_ignores_degenerate_factors() {
        let mut scene = SceneTransform::default();
        scene.zoom_by(2.0);
        scene.zoom_by(0.0);
        scene.zoom_by(-3.0);
        scene.zoom_by(f32::NAN);
        scene.zoom_by(f32::INFINITY);
        assert_eq!(scene.zoom, 2.0);
    }

    #[test]
    fn viewport_is_valid() {
        let mut scene = SceneTransform::default();
        scene.zoom_by(8.0);
        scene.pan(Vec2::new(30.0, 12.0));

        let viewport = scene.viewport(1280, 720, 200);
        assert!(viewport.validate().is_ok());
        assert_eq!(viewport.scale, 8.0);
        assert_eq!(viewport.aspect_ratio, Vec2::new(2.0, 720.0 / 1280.0 * 2.0));
        assert_eq!(viewport.translation, scene.translation);
    }
}
