//! Coordinate mapper: per-column and per-row complex-plane coordinates

use kernel::{column_coordinate, row_coordinate};
use shared::ViewportParams;
use std::ops::Deref;

/// One transformed coordinate per pixel column (real axis) or per pixel row
/// (imaginary axis).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AxisBuffer(Vec<f32>);

impl Deref for AxisBuffer {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.0
    }
}

/// Real-axis coordinate for every column; empty when `width` is 0
pub fn width_buffer(params: &ViewportParams, width: u32) -> AxisBuffer {
    AxisBuffer(
        (0..width)
            .map(|column| column_coordinate(params, column, width))
            .collect(),
    )
}

/// Imaginary-axis coordinate for every row; empty when `height` is 0
pub fn height_buffer(params: &ViewportParams, height: u32) -> AxisBuffer {
    AxisBuffer(
        (0..height)
            .map(|row| row_coordinate(params, row, height))
            .collect(),
    )
}

/// Both axis buffers for a `width` x `height` image
pub fn axis_buffers(params: &ViewportParams, width: u32, height: u32) -> (AxisBuffer, AxisBuffer) {
    (width_buffer(params, width), height_buffer(params, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;
    use glam::Vec2;

    #[test]
    fn zero_dimensions_give_empty_buffers() {
        let params = Viewport::default().to_params();
        let (w, h) = axis_buffers(&params, 0, 0);
        assert!(w.is_empty());
        assert!(h.is_empty());
    }

    #[test]
    fn lengths_follow_dimensions() {
        let params = Viewport::default().to_params();
        let (w, h) = axis_buffers(&params, 320, 200);
        assert_eq!(w.len(), 320);
        assert_eq!(h.len(), 200);
    }

    #[test]
    fn centered_viewport_is_antisymmetric() {
        let params = Viewport::new(1.0, 64, Vec2::ZERO, Vec2::new(2.0, 2.0)).to_params();
        let width = 64u32;
        let w = width_buffer(&params, width);

        assert_eq!(w[0], -2.0);
        assert_eq!(w[32], 0.0);
        for column in 1..width as usize {
            assert_eq!(w[column], -w[width as usize - column]);
        }
    }

    #[test]
    fn translation_shifts_and_scale_narrows() {
        let base = Viewport::new(1.0, 64, Vec2::ZERO, Vec2::ONE);
        let shifted = base.with_translation(Vec2::new(0.5, -0.25));
        let zoomed = Viewport { scale: 4.0, ..base };

        let (bw, bh) = axis_buffers(&base.to_params(), 16, 16);
        let (sw, sh) = axis_buffers(&shifted.to_params(), 16, 16);
        let (zw, _) = axis_buffers(&zoomed.to_params(), 16, 16);

        for i in 0..16 {
            assert_eq!(sw[i], bw[i] + 0.5);
            assert_eq!(sh[i], bh[i] - 0.25);
        }

        let base_span = bw[15] - bw[0];
        let zoomed_span = zw[15] - zw[0];
        assert_eq!(zoomed_span * 4.0, base_span);
    }

    #[test]
    fn mapping_is_deterministic() {
        let params = Viewport::new(3.0, 10, Vec2::new(-0.7, 0.3), Vec2::new(2.0, 1.2)).to_params();
        assert_eq!(axis_buffers(&params, 123, 77), axis_buffers(&params, 123, 77));
    }
}
