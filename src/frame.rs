//! Double-buffered hand-off of finished frames to the presentation layer
//!
//! Every render pass fills a buffer of its own. The exchange only ever swaps a
//! complete buffer into the front slot, and only if no newer pass has started
//! since, so a pass superseded by fast panning is dropped whole.

use crate::{
    error::Result,
    pixels::PixelBuffer,
    viewport::{validate_dimensions, Viewport},
    Renderer,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A finished frame together with the snapshot it was rendered from
#[derive(Debug)]
pub struct Frame {
    pub generation: u64,
    pub viewport: Viewport,
    pub pixels: PixelBuffer,
}

/// Claim on one render pass
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PassTicket {
    generation: u64,
    pub viewport: Viewport,
    pub width: u32,
    pub height: u32,
}

impl PassTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Default)]
pub struct FrameExchange {
    latest: AtomicU64,
    front: Mutex<Option<Arc<Frame>>>,
}

impl FrameExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a pass; any pass started earlier is now superseded
    pub fn begin_pass(&self, viewport: Viewport, width: u32, height: u32) -> PassTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        PassTicket {
            generation,
            viewport,
            width,
            height,
        }
    }

    /// Whether no newer pass has started since `ticket` was issued
    pub fn is_current(&self, ticket: &PassTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.generation
    }

    /// Publishes `pixels` as the front frame unless the pass was superseded.
    ///
    /// Returns whether the frame was swapped in.
    pub fn complete(&self, ticket: PassTicket, pixels: PixelBuffer) -> bool {
        let mut front = self.front.lock();
        if !self.is_current(&ticket) {
            log::debug!("discarding superseded pass {}", ticket.generation);
            return false;
        }

        *front = Some(Arc::new(Frame {
            generation: ticket.generation,
            viewport: ticket.viewport,
            pixels,
        }));
        true
    }

    /// Most recently published frame
    pub fn front(&self) -> Option<Arc<Frame>> {
        self.front.lock().clone()
    }
}

/// Logs the start and duration of a frame
pub struct FrameTimer {
    backend: &'static str,
    started: Instant,
}

impl FrameTimer {
    pub fn start(backend: &'static str) -> Self {
        log::debug!("started rendering frame on {backend}");
        Self {
            backend,
            started: Instant::now(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.started.elapsed();
        log::info!("frame rendered on {} in {:?}", self.backend, elapsed);
        elapsed
    }
}

/// Renders one pass and publishes it.
///
/// On error the current front frame stays in place. Input is validated before
/// the pass is claimed, so a rejected request never supersedes a pass already
/// in flight. Returns whether the new frame became the front frame.
pub fn render_pass(
    renderer: &dyn Renderer,
    exchange: &FrameExchange,
    viewport: Viewport,
    width: u32,
    height: u32,
) -> Result<bool> {
    viewport.validate()?;
    validate_dimensions(width, height)?;

    let ticket = exchange.begin_pass(viewport, width, height);
    let timer = FrameTimer::start(renderer.backend_info().backend);

    let pixels = renderer.render(&ticket.viewport, ticket.width, ticket.height)?;
    timer.finish();

    Ok(exchange.complete(ticket, pixels))
}
