//! CPU execution of the escape-time kernel

use crate::{
    dispatch::{dispatch_rows, DispatchOptions},
    error::Result,
    mapper::axis_buffers,
    pixels::PixelBuffer,
    viewport::Viewport,
    BackendInfo, Renderer,
};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// CPU-based renderer running the native kernel on a rayon pool
pub struct CpuRenderer {
    pool: ThreadPool,
    options: DispatchOptions,
}

impl CpuRenderer {
    /// Renderer with `threads` workers (at least one)
    pub fn new(threads: usize, options: DispatchOptions) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("mandelbrot-row-{i}"))
            .build()?;
        Ok(Self { pool, options })
    }

    /// One worker per logical CPU with the default schedule
    pub fn with_defaults() -> Result<Self> {
        Self::new(num_cpus::get(), DispatchOptions::default())
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl Renderer for CpuRenderer {
    fn backend_info(&self) -> BackendInfo {
        BackendInfo {
            backend: "cpu",
            api: Some("Native"),
            adapter: None,
            driver: None,
        }
    }

    fn render(&self, viewport: &Viewport, width: u32, height: u32) -> Result<PixelBuffer> {
        viewport.validate()?;
        let mut pixels = PixelBuffer::new(width, height)?;

        // Same record the GPU path pushes, so both map coordinates from the same bytes
        let params = viewport.to_params();
        let iteration_cap = params.iteration_cap();
        if iteration_cap > 255 {
            log::debug!("iteration cap {iteration_cap} exceeds 255; shades wrap modulo 256");
        }
        let (width_buffer, height_buffer) = axis_buffers(&params, width, height);

        let options = self.options;
        self.pool.install(|| {
            dispatch_rows(
                width,
                height,
                &width_buffer,
                &height_buffer,
                pixels.as_mut_slice(),
                iteration_cap,
                options,
            )
        })?;

        Ok(pixels)
    }
}
