//! Row dispatcher: spreads escape-time rows over the rayon pool
//!
//! Rows are independent, so the output buffer is split into disjoint row
//! slices up front and each slice is handed to exactly one task. No locking
//! is involved; exclusivity comes from the `&mut` split itself.

use crate::error::{Axis, RenderError, Result};
use crate::viewport::validate_dimensions;
use kernel::calculate_row;
use rayon::prelude::*;
use std::fmt::{self, Display};
use std::str::FromStr;

/// How rows are assigned to workers
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Schedule {
    /// Work stealing over individual rows (or `rows_per_task` batches)
    #[default]
    Dynamic,
    /// One contiguous band of rows per worker thread
    Static,
}

impl Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Dynamic => write!(f, "dynamic"),
            Schedule::Static => write!(f, "static"),
        }
    }
}

impl FromStr for Schedule {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamic" => Ok(Schedule::Dynamic),
            "static" => Ok(Schedule::Static),
            _ => Err(RenderError::InvalidConfig {
                key: "schedule",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DispatchOptions {
    pub schedule: Schedule,
    /// Minimum rows per task under [`Schedule::Dynamic`]
    pub rows_per_task: usize,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            schedule: Schedule::Dynamic,
            rows_per_task: 1,
        }
    }
}

/// Calls `row_fn(row_index, row_slice)` exactly once for every row of `target`.
///
/// `target.len()` must be a multiple of `width`; a trailing partial row is
/// never produced by callers that validate first. Runs on the current rayon
/// pool, so wrap the call in `ThreadPool::install` to pick the pool.
pub fn for_each_row<T, F>(target: &mut [T], width: usize, options: DispatchOptions, row_fn: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if width == 0 || target.is_empty() {
        return;
    }

    match options.schedule {
        Schedule::Dynamic => target
            .par_chunks_mut(width)
            .enumerate()
            .with_min_len(options.rows_per_task.max(1))
            .for_each(|(row, row_slice)| row_fn(row, row_slice)),
        Schedule::Static => {
            let rows = target.len().div_ceil(width);
            let workers = rayon::current_num_threads().max(1);
            let band_rows = rows.div_ceil(workers).max(1);
            let row_fn = &row_fn;

            rayon::scope(|s| {
                for (band, band_slice) in target.chunks_mut(band_rows * width).enumerate() {
                    s.spawn(move |_| {
                        let first_row = band * band_rows;
                        for (offset, row_slice) in band_slice.chunks_mut(width).enumerate() {
                            row_fn(first_row + offset, row_slice);
                        }
                    });
                }
            });
        }
    }
}

/// Fills `target` with packed escape-time pixels.
///
/// Every length is checked against `width` and `height` before any row is
/// dispatched, so a malformed call writes nothing.
pub fn dispatch_rows(
    width: u32,
    height: u32,
    width_buffer: &[f32],
    height_buffer: &[f32],
    target: &mut [u32],
    iteration_cap: u32,
    options: DispatchOptions,
) -> Result<()> {
    let expected = validate_dimensions(width, height)?;
    if iteration_cap == 0 {
        return Err(RenderError::ZeroIterationCap);
    }
    if width_buffer.len() != width as usize {
        return Err(RenderError::AxisBufferMismatch {
            axis: Axis::Width,
            expected: width as usize,
            actual: width_buffer.len(),
        });
    }
    if height_buffer.len() != height as usize {
        return Err(RenderError::AxisBufferMismatch {
            axis: Axis::Height,
            expected: height as usize,
            actual: height_buffer.len(),
        });
    }
    if target.len() != expected {
        return Err(RenderError::PixelBufferMismatch {
            expected,
            actual: target.len(),
        });
    }

    for_each_row(target, width as usize, options, |row, row_slice| {
        calculate_row(height_buffer[row], width_buffer, iteration_cap, row_slice);
    });

    Ok(())
}
