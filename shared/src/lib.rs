//! Fixed-layout records shared between the host and the compute kernel
#![cfg_attr(not(test), no_std)]

use bytemuck::{Pod, Zeroable};

/// Workgroup size for the 2D escape-time dispatch
/// IMPORTANT: This must be kept in sync with the literal value in kernel/src/lib.rs
pub const GRID_WORKGROUP_SIZE: (u32, u32) = (8, 8);

/// Largest iteration cap an `f32` record field holds exactly.
pub const MAX_EXACT_ITERATION_CAP: u32 = 1 << 24;

#[inline]
pub const fn div_ceil_u32(n: u32, d: u32) -> u32 {
    // Precondition: d > 0
    n / d + ((n % d) != 0) as u32
}

pub fn num_workgroups_2d(num_elts_x: u32, num_elts_y: u32) -> [u32; 3] {
    [
        div_ceil_u32(num_elts_x, GRID_WORKGROUP_SIZE.0),
        div_ceil_u32(num_elts_y, GRID_WORKGROUP_SIZE.1),
        1,
    ]
}

/// Viewport as it crosses the host/GPU boundary.
///
/// Field order is part of the contract: `scale, iteration_cap, translation_x,
/// translation_y, aspect_w, aspect_h`, all 32-bit floats. Both the CPU path
/// and the compute kernel read the same bytes.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ViewportParams {
    pub scale: f32,
    /// Stored as a float, truncated when read back.
    pub iteration_cap: f32,
    pub translation_x: f32,
    pub translation_y: f32,
    pub aspect_w: f32,
    pub aspect_h: f32,
}

impl ViewportParams {
    #[inline]
    pub fn iteration_cap(&self) -> u32 {
        self.iteration_cap as u32
    }
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            iteration_cap: 255.0,
            translation_x: 0.0,
            translation_y: 0.0,
            aspect_w: 1.0,
            aspect_h: 1.0,
        }
    }
}

/// Push constants for the escape-time compute kernel
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct RenderParams {
    pub viewport: ViewportParams,
    pub width: u32,
    pub height: u32,
}

impl RenderParams {
    #[inline]
    pub fn new(viewport: ViewportParams, width: u32, height: u32) -> Self {
        Self {
            viewport,
            width,
            height,
        }
    }

    #[inline]
    pub fn num_workgroups(&self) -> [u32; 3] {
        num_workgroups_2d(self.width, self.height)
    }
}
