// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame stream.  A producer sends `Some(settings)` for every frame
//! of an animation followed by a single `None`; an `AnimationRenderer`
//! consumes the stream, renders each frame and passes it to a sink.
//!
//! The consumer never reads past the first `None`.  A producer that
//! hangs up without sending one is treated as having sent it.

use crossbeam::channel::{bounded, Receiver, Sender};
use crossbeam::thread::ScopedJoinHandle;
use log::{error, info, warn};

use crate::error::RenderError;
use crate::frames::FrameRenderer;
use crate::settings::FrameSettings;
use crate::sink::FrameSink;

/// Receiving end of a frame stream.
pub type FrameSource = Receiver<Option<FrameSettings>>;

/// Sending end of a frame stream.
pub type FrameFeed = Sender<Option<FrameSettings>>;

/// How frames of an animation relate to one another in time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AnimationRenderer {
    /// One frame at a time, in the order received.  The sink sees frames
    /// in source order.
    Serial,
    /// Each frame is rendered by its own scoped task, dispatched as soon
    /// as its settings arrive.  With `in_flight: Some(n)` at most `n`
    /// frames are unfinished at any moment; `None` places no bound.  The
    /// sink sees frames in completion order.
    Concurrent {
        /// Upper bound on unfinished frames.
        in_flight: Option<usize>,
    },
}

/// What happened to the frames of one run.
#[derive(Debug, Default)]
pub struct AnimationReport {
    /// Frames taken from the source.
    pub dispatched: usize,
    /// Frames the sink accepted.
    pub written: usize,
    /// Output identifier and error of every frame that was lost.
    pub failures: Vec<(String, RenderError)>,
}

impl AnimationReport {
    /// True when every dispatched frame reached the sink.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, output: String, outcome: Result<(), RenderError>) {
        match outcome {
            Ok(()) => self.written += 1,
            Err(e) => self.failures.push((output, e)),
        }
    }
}

/// Sends every frame followed by the terminator.  Returns the number of
/// frames delivered, which falls short only if the consumer went away.
pub fn feed<I>(sender: &FrameFeed, frames: I) -> usize
where
    I: IntoIterator<Item = FrameSettings>,
{
    let mut sent = 0;
    for settings in frames {
        if sender.send(Some(settings)).is_err() {
            warn!("frame consumer hung up after {} frames", sent);
            return sent;
        }
        sent += 1;
    }
    if sender.send(None).is_err() {
        warn!("frame consumer hung up before the end of the stream");
    }
    sent
}

// Blocks for the next frame.  `None` is the end of the stream, either
// because the terminator arrived or because every producer is gone.
fn next_frame(source: &FrameSource) -> Option<FrameSettings> {
    source.recv().ok().and_then(|settings| settings)
}

// Logs a failure the moment it happens; the report only sees it at the
// final join.
fn render_and_write<S>(
    frames: &FrameRenderer,
    sink: &S,
    settings: &FrameSettings,
) -> Result<(), RenderError>
where
    S: FrameSink + ?Sized,
{
    let outcome = frames
        .render_frame(settings)
        .and_then(|frame| sink.write_frame(settings, frame));
    if let Err(e) = &outcome {
        error!("{} failed: {}", settings.output_id(), e);
    }
    outcome
}

// Holds one slot of the in-flight bound until the frame task ends,
// however it ends.
struct Slot(Option<Receiver<()>>);

impl Drop for Slot {
    fn drop(&mut self) {
        if let Some(slots) = &self.0 {
            let _ = slots.recv();
        }
    }
}

impl AnimationRenderer {
    /// Consumes `source` up to its terminator, rendering every frame
    /// with `frames` and handing it to `sink`.  A frame that fails to
    /// render or write is logged and recorded; the frames around it carry
    /// on.  Returns once every dispatched frame has finished.
    pub fn render<S>(
        &self,
        source: &FrameSource,
        frames: &FrameRenderer,
        sink: &S,
    ) -> Result<AnimationReport, RenderError>
    where
        S: FrameSink + ?Sized,
    {
        match *self {
            AnimationRenderer::Serial => {
                let mut report = AnimationReport::default();
                while let Some(settings) = next_frame(source) {
                    report.dispatched += 1;
                    info!("Rendering {}", settings.output_id());
                    let outcome = render_and_write(frames, sink, &settings);
                    report.record(settings.output_id().to_string(), outcome);
                }
                Ok(report)
            }

            AnimationRenderer::Concurrent { in_flight } => {
                let slots = in_flight.map(|n| bounded::<()>(n.max(1)));

                crossbeam::scope(|spawner| {
                    let mut report = AnimationReport::default();
                    let mut handles: Vec<(String, ScopedJoinHandle<Result<(), RenderError>>)> =
                        vec![];

                    while let Some(settings) = next_frame(source) {
                        let slot = match &slots {
                            Some((acquire, release)) => {
                                // Blocks while `n` frames are unfinished.
                                if acquire.send(()).is_err() {
                                    break;
                                }
                                Slot(Some(release.clone()))
                            }
                            None => Slot(None),
                        };

                        report.dispatched += 1;
                        let output = settings.output_id().to_string();
                        handles.push((
                            output,
                            spawner.spawn(move |_| {
                                let _slot = slot;
                                let outcome = render_and_write(frames, sink, &settings);
                                if outcome.is_ok() {
                                    info!("Rendered {}", settings.output_id());
                                }
                                outcome
                            }),
                        ));
                    }

                    for (output, handle) in handles {
                        let outcome = handle.join().unwrap_or_else(|payload| {
                            let e = RenderError::from_panic(payload);
                            error!("{} failed: {}", output, e);
                            Err(e)
                        });
                        report.record(output, outcome);
                    }
                    report
                })
                .map_err(RenderError::from_panic)
            }
        }
    }
}
