//! Demo rendering one frame of the Mandelbrot set and previewing it as text

use anyhow::{Context, Result};
use glam::Vec2;
use mandelbrot_chimera::{
    render_pass, scene::POINTS_PER_UNIT, select_renderer, FrameExchange, PixelBuffer,
    RenderConfig, SceneTransform,
};

/// Preview size in terminal cells
const PREVIEW_COLUMNS: u32 = 96;
const PREVIEW_ROWS: u32 = 40;

/// Frame size rendered behind the preview
const FRAME_WIDTH: u32 = 960;
const FRAME_HEIGHT: u32 = 640;

const ITERATION_CAP: u32 = 255;

/// Darkest to brightest; brighter cells escaped later
const RAMP: &[u8] = b" .:-=+*#%@";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RenderConfig::from_env().context("reading renderer configuration")?;
    log::info!(
        "backend preference {}, {} CPU threads, {} schedule",
        config.backend,
        config.threads,
        config.dispatch.schedule
    );

    let renderer = select_renderer(&config)?;
    let exchange = FrameExchange::new();

    // Center the view on the main cardioid
    let mut scene = SceneTransform::default();
    scene.pan(Vec2::new(0.5 * POINTS_PER_UNIT, 0.0));
    let viewport = scene.viewport(FRAME_WIDTH, FRAME_HEIGHT, ITERATION_CAP);

    render_pass(renderer.as_ref(), &exchange, viewport, FRAME_WIDTH, FRAME_HEIGHT)?;
    let frame = exchange
        .front()
        .context("render pass finished without publishing a frame")?;

    print!("{}", preview(&frame.pixels, PREVIEW_COLUMNS, PREVIEW_ROWS));
    Ok(())
}

/// Downsamples the frame into a block of text, one character per cell
fn preview(pixels: &PixelBuffer, columns: u32, rows: u32) -> String {
    let mut out = String::with_capacity(((columns + 1) * rows) as usize);
    for row in 0..rows {
        let y = row * pixels.height() / rows;
        for column in 0..columns {
            let x = column * pixels.width() / columns;
            let shade = pixels.rgba(x, y).map_or(0, |[r, ..]| r as usize);
            let index = shade * (RAMP.len() - 1) / 255;
            out.push(RAMP[index] as char);
        }
        out.push('\n');
    }
    out
}
