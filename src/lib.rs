//! Mandelbrot escape-time renderer
//!
//! The same Rust kernel runs on:
//! - CPU (native Rust, rows spread over a rayon pool)
//! - GPU (SPIR-V via rust-gpu, dispatched through wgpu; `wgpu` feature)

use std::fmt;

pub mod config;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod mapper;
pub mod pixels;
pub mod runners;
pub mod scene;
pub mod viewport;

pub use config::{BackendPreference, RenderConfig};
pub use error::{RenderError, Result};
pub use frame::{render_pass, FrameExchange};
pub use pixels::PixelBuffer;
pub use runners::{select_renderer, CpuRenderer};
pub use scene::SceneTransform;
pub use viewport::Viewport;

#[cfg(feature = "wgpu")]
pub const MANDELBROT_KERNEL_SPIRV: &[u8] = include_bytes!(env!("MANDELBROT_KERNEL_SPV_PATH"));
#[cfg(feature = "wgpu")]
pub const MANDELBROT_KERNEL_ENTRY: &str = env!("MANDELBROT_KERNEL_SPV_ENTRY");

/// Describes the backend a renderer runs on
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendInfo {
    pub backend: &'static str,
    pub api: Option<&'static str>,
    pub adapter: Option<String>,
    pub driver: Option<String>,
}

impl fmt::Display for BackendInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.backend)?;
        if let Some(api) = self.api {
            write!(f, " ({api})")?;
        }
        if let Some(adapter) = &self.adapter {
            write!(f, " on {adapter}")?;
        }
        if let Some(driver) = &self.driver {
            write!(f, ", driver {driver}")?;
        }
        Ok(())
    }
}

/// A backend able to turn a viewport into a full frame of pixels.
///
/// Implementations validate their input before doing any work and never
/// return a partially rendered buffer.
pub trait Renderer: Send + Sync {
    fn backend_info(&self) -> BackendInfo;

    fn render(&self, viewport: &Viewport, width: u32, height: u32) -> Result<PixelBuffer>;
}
