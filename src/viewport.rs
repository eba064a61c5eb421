//! View transform from pixel space to the complex plane

use crate::error::{RenderError, Result};
use glam::Vec2;
use shared::{ViewportParams, MAX_EXACT_ITERATION_CAP};

/// Per-pass snapshot of the view transform.
///
/// Built from user input once per frame and never mutated while a pass is in
/// flight; a new pass takes a new snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub iteration_cap: u32,
    pub translation: Vec2,
    pub aspect_ratio: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            iteration_cap: 255,
            translation: Vec2::ZERO,
            aspect_ratio: Vec2::ONE,
        }
    }
}

impl Viewport {
    pub fn new(scale: f32, iteration_cap: u32, translation: Vec2, aspect_ratio: Vec2) -> Self {
        Self {
            scale,
            iteration_cap,
            translation,
            aspect_ratio,
        }
    }

    pub fn with_iteration_cap(mut self, iteration_cap: u32) -> Self {
        self.iteration_cap = iteration_cap;
        self
    }

    pub fn with_translation(mut self, translation: Vec2) -> Self {
        self.translation = translation;
        self
    }

    /// Rejects viewports the kernel cannot render faithfully
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(RenderError::InvalidScale(self.scale));
        }
        if self.iteration_cap == 0 {
            return Err(RenderError::ZeroIterationCap);
        }
        if self.iteration_cap > MAX_EXACT_ITERATION_CAP {
            return Err(RenderError::IterationCapTooLarge(
                self.iteration_cap,
                MAX_EXACT_ITERATION_CAP,
            ));
        }

        let fields = [
            ("translation.x", self.translation.x),
            ("translation.y", self.translation.y),
            ("aspect_ratio.w", self.aspect_ratio.x),
            ("aspect_ratio.h", self.aspect_ratio.y),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(RenderError::NonFiniteViewport { field, value });
            }
        }

        Ok(())
    }

    /// Packs the viewport into the record both backends consume
    pub fn to_params(&self) -> ViewportParams {
        ViewportParams {
            scale: self.scale,
            iteration_cap: self.iteration_cap as f32,
            translation_x: self.translation.x,
            translation_y: self.translation.y,
            aspect_w: self.aspect_ratio.x,
            aspect_h: self.aspect_ratio.y,
        }
    }

    pub fn from_params(params: &ViewportParams) -> Self {
        Self {
            scale: params.scale,
            iteration_cap: params.iteration_cap(),
            translation: Vec2::new(params.translation_x, params.translation_y),
            aspect_ratio: Vec2::new(params.aspect_w, params.aspect_h),
        }
    }
}

/// Checks image dimensions and returns the pixel count
pub fn validate_dimensions(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(RenderError::PixelCountOverflow(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Viewport {
        Viewport::new(2.5, 300, Vec2::new(-0.75, 0.125), Vec2::new(2.0, 1.5))
    }

    #[test]
    fn record_field_order() {
        let params = sample().to_params();
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&params));
        assert_eq!(floats, &[2.5, 300.0, -0.75, 0.125, 2.0, 1.5]);
    }

    #[test]
    fn record_round_trips_through_bytes() {
        let viewport = sample();
        let bytes = bytemuck::bytes_of(&viewport.to_params()).to_vec();
        assert_eq!(bytes.len(), 24);

        let decoded: ViewportParams = bytemuck::pod_read_unaligned(&bytes);
        assert_eq!(Viewport::from_params(&decoded), viewport);
    }

    #[test]
    fn largest_exact_cap_survives_the_record() {
        let viewport = Viewport::default().with_iteration_cap(MAX_EXACT_ITERATION_CAP);
        assert!(viewport.validate().is_ok());
        assert_eq!(
            Viewport::from_params(&viewport.to_params()).iteration_cap,
            MAX_EXACT_ITERATION_CAP
        );
    }

    #[test]
    fn rejects_bad_viewports() {
        let zero_scale = Viewport {
            scale: 0.0,
            ..Viewport::default()
        };
        assert!(matches!(zero_scale.validate(), Err(RenderError::InvalidScale(_))));

        let negative_scale = Viewport {
            scale: -1.0,
            ..Viewport::default()
        };
        assert!(matches!(negative_scale.validate(), Err(RenderError::InvalidScale(_))));

        let nan_scale = Viewport {
            scale: f32::NAN,
            ..Viewport::default()
        };
        assert!(matches!(nan_scale.validate(), Err(RenderError::InvalidScale(_))));

        assert!(matches!(
            Viewport::default().with_iteration_cap(0).validate(),
            Err(RenderError::ZeroIterationCap)
        ));
        assert!(matches!(
            Viewport::default()
                .with_iteration_cap(MAX_EXACT_ITERATION_CAP + 1)
                .validate(),
            Err(RenderError::IterationCapTooLarge(..))
        ));

        let err = Viewport::default()
            .with_translation(Vec2::new(f32::INFINITY, 0.0))
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            RenderError::NonFiniteViewport {
                field: "translation.x",
                ..
            }
        ));
    }

    #[test]
    fn dimensions() {
        assert_eq!(validate_dimensions(640, 480).unwrap(), 640 * 480);
        assert!(matches!(
            validate_dimensions(0, 10),
            Err(RenderError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(10, 0),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }
}
