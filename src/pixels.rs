//! Row-major packed RGBA output of a render pass

use crate::error::{RenderError, Result};
use crate::viewport::validate_dimensions;

/// `width * height` packed pixels, row-major.
///
/// Owned by the pass that fills it and handed off whole once the pass is
/// done; nothing reads a partially rendered buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelBuffer {
    /// Zero-filled buffer for a `width` x `height` image.
    ///
    /// Zero is never a valid encoded pixel (alpha is always opaque), so a
    /// zero entry marks a pixel no worker has written yet.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Wraps pixels produced elsewhere, e.g. read back from the GPU
    pub fn from_vec(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        let expected = validate_dimensions(width, height)?;
        if pixels.len() != expected {
            return Err(RenderError::PixelBufferMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Packed pixel at `column`, `row`
    pub fn get(&self, column: u32, row: u32) -> Option<u32> {
        if column >= self.width || row >= self.height {
            return None;
        }
        self.pixels
            .get(row as usize * self.width as usize + column as usize)
            .copied()
    }

    /// Decoded `[r, g, b, a]` at `column`, `row`
    pub fn rgba(&self, column: u32, row: u32) -> Option<[u8; 4]> {
        self.get(column, row).map(kernel::decode_pixel)
    }

    pub fn row(&self, row: u32) -> Option<&[u32]> {
        if row >= self.height {
            return None;
        }
        let start = row as usize * self.width as usize;
        self.pixels.get(start..start + self.width as usize)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    /// Raw bytes for texture upload or blitting
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
