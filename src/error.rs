//! Error types for the library

use std::fmt;
use thiserror::Error;

/// Which axis buffer a length check refers to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Width => write!(f, "width"),
            Axis::Height => write!(f, "height"),
        }
    }
}

/// Error types for the Mandelbrot renderer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid image dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Viewport scale must be finite and positive, got {0}")]
    InvalidScale(f32),

    #[error("Iteration cap must be at least 1")]
    ZeroIterationCap,

    #[error("Iteration cap {0} exceeds the largest value a 32-bit float holds exactly ({1})")]
    IterationCapTooLarge(u32, u32),

    #[error("Viewport {field} must be finite, got {value}")]
    NonFiniteViewport { field: &'static str, value: f32 },

    #[error("{axis} buffer holds {actual} entries, expected {expected}")]
    AxisBufferMismatch {
        axis: Axis,
        expected: usize,
        actual: usize,
    },

    #[error("Pixel buffer holds {actual} entries, expected {expected}")]
    PixelBufferMismatch { expected: usize, actual: usize },

    #[error("Pixel count overflow: {0} columns × {1} rows")]
    PixelCountOverflow(u32, u32),

    #[error("Buffer size overflow: {0} elements × {1} bytes per element")]
    BufferSizeOverflow(usize, usize),

    #[error("Pixel buffer needs {size} bytes, the device allows {limit}")]
    BufferTooLarge { size: u64, limit: u64 },

    #[error("Dispatch needs {requested} workgroups along one axis, the device allows {limit}")]
    WorkgroupLimit { requested: u32, limit: u32 },

    #[error("Invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("Environment variable error: {0}")]
    VarError(#[from] std::env::VarError),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("GPU backend not compiled in (enable the `wgpu` feature)")]
    GpuUnavailable,

    #[cfg(feature = "wgpu")]
    #[error("wgpu RequestDeviceError: {0}")]
    WgpuRequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Other error: {0}")]
    Other(String),
}

impl RenderError {
    /// Whether the error stems from the caller's viewport, dimensions or buffers
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RenderError::InvalidDimensions { .. }
                | RenderError::InvalidScale(_)
                | RenderError::ZeroIterationCap
                | RenderError::IterationCapTooLarge(..)
                | RenderError::NonFiniteViewport { .. }
                | RenderError::AxisBufferMismatch { .. }
                | RenderError::PixelBufferMismatch { .. }
                | RenderError::PixelCountOverflow(..)
                | RenderError::BufferSizeOverflow(..)
                | RenderError::BufferTooLarge { .. }
                | RenderError::WorkgroupLimit { .. }
        )
    }
}

/// Convenience type alias for Results with [`RenderError`]
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::RenderError;

    #[test]
    fn device_limit_errors_are_configuration() {
        assert!(RenderError::BufferSizeOverflow(usize::MAX, 4).is_configuration());
        assert!(RenderError::BufferTooLarge {
            size: 1 << 28,
            limit: 1 << 27
        }
        .is_configuration());
        assert!(RenderError::WorkgroupLimit {
            requested: 65536,
            limit: 65535
        }
        .is_configuration());
        assert!(!RenderError::NoAdapter.is_configuration());
    }
}
