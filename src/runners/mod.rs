//! Renderer implementations for different compute backends
pub mod cpu;
#[cfg(feature = "wgpu")]
pub mod wgpu;

// Re-export runners at module level for convenience
pub use self::cpu::CpuRenderer;
#[cfg(feature = "wgpu")]
pub use self::wgpu::WgpuRenderer;

use crate::{
    config::{BackendPreference, RenderConfig},
    error::{RenderError, Result},
    Renderer,
};

/// Picks a renderer according to `config.backend`.
///
/// `Auto` tries the GPU first (when compiled in) and falls back to the CPU;
/// `Gpu` fails if no GPU renderer can be created.
pub fn select_renderer(config: &RenderConfig) -> Result<Box<dyn Renderer>> {
    let renderer: Box<dyn Renderer> = match config.backend {
        BackendPreference::Cpu => Box::new(cpu_renderer(config)?),
        BackendPreference::Gpu => gpu_renderer()?,
        BackendPreference::Auto => match gpu_renderer() {
            Ok(renderer) => renderer,
            Err(RenderError::GpuUnavailable) => Box::new(cpu_renderer(config)?),
            Err(err) => {
                log::warn!("GPU renderer unavailable ({err}), falling back to CPU");
                Box::new(cpu_renderer(config)?)
            }
        },
    };

    let info = renderer.backend_info();
    log::info!("selected {info}");
    Ok(renderer)
}

fn cpu_renderer(config: &RenderConfig) -> Result<CpuRenderer> {
    CpuRenderer::new(config.threads, config.dispatch)
}

#[cfg(feature = "wgpu")]
fn gpu_renderer() -> Result<Box<dyn Renderer>> {
    let renderer = pollster::block_on(WgpuRenderer::new())?;
    Ok(Box::new(renderer))
}

#[cfg(not(feature = "wgpu"))]
fn gpu_renderer() -> Result<Box<dyn Renderer>> {
    Err(RenderError::GpuUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_preference_selects_cpu() {
        let config = RenderConfig {
            backend: BackendPreference::Cpu,
            threads: 2,
            ..Default::default()
        };
        let renderer = select_renderer(&config).unwrap();
        assert_eq!(renderer.backend_info().backend, "cpu");
    }

    #[cfg(not(feature = "wgpu"))]
    #[test]
    fn auto_falls_back_without_gpu_feature() {
        let renderer = select_renderer(&RenderConfig::default()).unwrap();
        assert_eq!(renderer.backend_info().backend, "cpu");

        let config = RenderConfig {
            backend: BackendPreference::Gpu,
            ..Default::default()
        };
        assert!(matches!(
            select_renderer(&config),
            Err(RenderError::GpuUnavailable)
        ));
    }
}
