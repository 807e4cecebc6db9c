// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every stage of the renderer.

use std::any::Any;
use std::io;

use failure::Fail;

/// Everything that can go wrong between accepting a set of frame
/// settings and persisting the rendered frame.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// A frame was described with a non-positive or non-finite size,
    /// plane width, escape radius or iteration cap.  Raised before any
    /// work is dispatched.
    #[fail(display = "invalid frame settings: {}", _0)]
    InvalidSettings(String),

    /// A row, pixel or frame task panicked.  The frame it belonged to is
    /// abandoned as a whole.
    #[fail(display = "render task failed: {}", _0)]
    TaskFailed(String),

    /// The sink could not prepare the destination of a frame.
    #[fail(display = "could not write {}: {}", output, cause)]
    Io {
        /// Output identifier of the frame.
        output: String,
        /// Underlying I/O failure.
        #[cause]
        cause: io::Error,
    },

    /// The sink could not encode or save a frame.
    #[fail(display = "could not encode {}: {}", output, cause)]
    Encode {
        /// Output identifier of the frame.
        output: String,
        /// Underlying encoder failure.
        #[cause]
        cause: image::ImageError,
    },
}

impl RenderError {
    /// Turns the payload of a panicked task into a `TaskFailed` error.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        RenderError::TaskFailed(panic_message(&*payload))
    }
}

// A scope that lost un-joined threads reports all of their payloads at
// once; the first one names the failure.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(panics) = payload.downcast_ref::<Vec<Box<dyn Any + Send + 'static>>>() {
        match panics.first() {
            Some(first) => panic_message(&**first),
            None => "unknown panic".to_string(),
        }
    } else {
        "unknown panic".to_string()
    }
}
