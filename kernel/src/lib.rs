//! Escape-time kernel for the Mandelbrot set.
//!
//! The same Rust code runs on the CPU (native) and on the GPU (SPIR-V via
//! rust-gpu), so both backends share one numeric contract: the coordinate
//! mapping, the escape-time loop and the pixel packing all live here.

#![cfg_attr(target_arch = "spirv", no_std)]

use glam::UVec2;
use shared::{RenderParams, ViewportParams};

#[cfg(target_arch = "spirv")]
use spirv_std::{glam::UVec3, spirv};

/// Squared bailout radius (|z| > 2)
pub const BAILOUT_RADIUS_SQUARED: f32 = 4.0;

/// Opaque alpha in the low byte of a packed pixel
pub const OPAQUE_ALPHA: u32 = 255;

/// Maps `index` in `[0, len)` to a centered coordinate on one axis.
///
/// `half_span` is the aspect component for the axis; a larger `scale`
/// narrows the span, `translation` shifts the center.
#[inline]
pub fn axis_coordinate(index: u32, len: u32, half_span: f32, scale: f32, translation: f32) -> f32 {
    ((index as f32 / len as f32) * 2.0 - 1.0) * half_span / scale + translation
}

/// Real-axis coordinate of pixel column `column`
#[inline]
pub fn column_coordinate(params: &ViewportParams, column: u32, width: u32) -> f32 {
    axis_coordinate(
        column,
        width,
        params.aspect_w,
        params.scale,
        params.translation_x,
    )
}

/// Imaginary-axis coordinate of pixel row `row`
#[inline]
pub fn row_coordinate(params: &ViewportParams, row: u32, height: u32) -> f32 {
    axis_coordinate(
        row,
        height,
        params.aspect_h,
        params.scale,
        params.translation_y,
    )
}

/// Number of iterations before `(cx, cy)` escapes, in `[0, iteration_cap]`.
///
/// Returns `iteration_cap` for points that never leave the bailout radius.
/// The squares are computed once per step and reused for both the bailout
/// test and the update.
#[inline]
pub fn escape_time(cx: f32, cy: f32, iteration_cap: u32) -> u32 {
    let mut real = 0.0f32;
    let mut img = 0.0f32;
    let mut i = 0u32;

    while i < iteration_cap {
        let r2 = real * real;
        let i2 = img * img;
        if r2 + i2 > BAILOUT_RADIUS_SQUARED {
            break;
        }
        img = 2.0 * real * img + cy;
        real = r2 - i2 + cx;
        i += 1;
    }

    i
}

/// Packs an iteration count into a grayscale RGBA pixel.
///
/// Red, green and blue all carry `iterations` modulo 256; alpha is opaque.
/// Layout is `r << 24 | g << 16 | b << 8 | a`.
#[inline]
pub fn encode_pixel(iterations: u32) -> u32 {
    let shade = iterations & 0xff;
    shade << 24 | shade << 16 | shade << 8 | OPAQUE_ALPHA
}

/// Splits a packed pixel into `[r, g, b, a]`
#[inline]
pub fn decode_pixel(pixel: u32) -> [u8; 4] {
    [
        (pixel >> 24) as u8,
        (pixel >> 16) as u8,
        (pixel >> 8) as u8,
        pixel as u8,
    ]
}

/// Computes one row of packed pixels.
///
/// `width_buffer` holds one real-axis coordinate per column and `target` is
/// the row's slice of the output buffer; the shorter of the two bounds the
/// loop.
#[inline]
pub fn calculate_row(row_coordinate: f32, width_buffer: &[f32], iteration_cap: u32, target: &mut [u32]) {
    let len = if width_buffer.len() < target.len() {
        width_buffer.len()
    } else {
        target.len()
    };

    let mut column = 0;
    while column < len {
        let i = escape_time(width_buffer[column], row_coordinate, iteration_cap);
        target[column] = encode_pixel(i);
        column += 1;
    }
}

/// Evaluates a single pixel directly from the render parameters
#[inline]
pub fn render_pixel(params: &RenderParams, pos: UVec2) -> u32 {
    let cx = column_coordinate(&params.viewport, pos.x, params.width);
    let cy = row_coordinate(&params.viewport, pos.y, params.height);
    encode_pixel(escape_time(cx, cy, params.viewport.iteration_cap()))
}

/// GPU entry point for Vulkan/SPIR-V
#[cfg(target_arch = "spirv")]
#[spirv(compute(threads(8, 8)))]
pub fn mandelbrot_kernel(
    #[spirv(global_invocation_id)] gid: UVec3,
    #[spirv(storage_buffer, descriptor_set = 0, binding = 0)] pixels: &mut [u32],
    #[spirv(push_constant)] params: &RenderParams,
) {
    // Partial workgroups along the right and bottom edges
    if gid.x >= params.width || gid.y >= params.height {
        return;
    }

    let offset = (gid.y * params.width + gid.x) as usize;
    pixels[offset] = render_pixel(params, UVec2::new(gid.x, gid.y));
}
