// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row granularity.  A row renderer fills one row of a frame, given the
//! frame's plane mapping and exclusive access to that row's bytes.

use std::sync::Mutex;

use crossbeam::thread::ScopedJoinHandle;
use log::trace;

use crate::error::RenderError;
use crate::escape::render_point;
use crate::planes::{Pixel, PlaneMapper};
use crate::settings::FrameSettings;

/// RGBA, one byte per channel.
pub const BYTES_PER_PIXEL: usize = 4;

/// How the pixels of a single row are distributed over workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowRenderer {
    /// Every pixel of the row in the calling thread.
    Serial,
    /// Every pixel is a separate unit of work, handed out one at a time
    /// to a fixed pool of scoped workers that is joined before the row is
    /// done.  The hand-off overhead dwarfs the work of a single pixel;
    /// this exists to measure exactly that.
    Parallel,
}

impl Default for RowRenderer {
    fn default() -> Self {
        RowRenderer::Serial
    }
}

impl RowRenderer {
    /// Fills `pixels`, the bytes of row `row`, with the colors of the
    /// points `plane` assigns to them.  `pixels` must hold exactly one
    /// row of the frame described by `settings`.
    pub fn render_row(
        &self,
        plane: &PlaneMapper,
        row: u32,
        settings: &FrameSettings,
        pixels: &mut [u8],
    ) -> Result<(), RenderError> {
        debug_assert_eq!(
            pixels.len(),
            settings.pixel_width() as usize * BYTES_PER_PIXEL
        );
        trace!("row {} of {}", row, settings.output_id());

        let paint = |(column, pixel): (usize, &mut [u8])| -> Result<(), RenderError> {
            let c = plane.pixel_to_point(Pixel(column as u32, row));
            pixel.copy_from_slice(&render_point(c, settings).0);
            Ok(())
        };

        match self {
            RowRenderer::Serial => pixels
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .enumerate()
                .try_for_each(paint),

            RowRenderer::Parallel => {
                share_out(pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate(), paint)
            }
        }
    }
}

/// Upper bound on the scoped workers a single parallel strategy starts.
pub fn worker_limit() -> usize {
    num_cpus::get().max(1)
}

/// Runs `work` over every unit on a pool of at most `worker_limit()`
/// scoped workers.  Workers pull units one at a time from a shared
/// queue, so the unit stays small while the thread count stays fixed.
/// A worker whose unit fails stops; the others drain the queue.  Returns
/// the first failure once every worker has been joined.
pub(crate) fn share_out<I, F>(units: I, work: F) -> Result<(), RenderError>
where
    I: Iterator + Send,
    F: Fn(I::Item) -> Result<(), RenderError> + Sync,
{
    let workers = worker_limit().min(units.size_hint().0).max(1);
    let queue = Mutex::new(units);
    let (queue, work) = (&queue, &work);

    crossbeam::scope(|spawner| {
        let handles: Vec<ScopedJoinHandle<Result<(), RenderError>>> = (0..workers)
            .map(|_| {
                spawner.spawn(move |_| -> Result<(), RenderError> {
                    loop {
                        let unit = queue
                            .lock()
                            .map_err(|_| RenderError::TaskFailed("work queue poisoned".into()))?
                            .next();
                        match unit {
                            Some(unit) => work(unit)?,
                            None => return Ok(()),
                        }
                    }
                })
            })
            .collect();
        join_all(handles)
    })
    .map_err(RenderError::from_panic)?
    .map(|_| ())
}

/// The join barrier.  Waits for every handle, even after a failure, so
/// that no task outlives the call, then reports the first failure seen.
pub(crate) fn join_all<T>(
    handles: Vec<ScopedJoinHandle<Result<T, RenderError>>>,
) -> Result<Vec<T>, RenderError> {
    let mut results = Vec::with_capacity(handles.len());
    let mut failure = None;
    for handle in handles {
        match handle.join() {
            Ok(Ok(value)) => results.push(value),
            Ok(Err(e)) => {
                if failure.is_none() {
                    failure = Some(e);
                }
            }
            Err(payload) => {
                if failure.is_none() {
                    failure = Some(RenderError::from_panic(payload));
                }
            }
        }
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(results),
    }
}
