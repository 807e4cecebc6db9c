#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot zoom renderer
//!
//! Each pixel of a frame is mapped to a point `c` on the complex plane,
//! and `z = z * z + c` is iterated from `z = c` until `z` escapes a
//! bound or an iteration cap is reached.  The number of iterations,
//! relative to the cap, is the pixel's gray level: points that never
//! escape, the Mandelbrot set proper, come out white.
//!
//! The work of a frame can be split by row, by pixel, both or neither;
//! every combination gives exactly the same image.  Workers of a frame
//! share its pixel buffer, but each owns a disjoint slice of it, so no
//! locking is needed.  An animation is a stream of frame settings ended
//! by a terminator; its frames can be rendered one after another or all
//! at once.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod animation;
pub mod error;
pub mod escape;
pub mod frames;
pub mod planes;
pub mod rows;
pub mod settings;
pub mod sink;
pub mod zoom;

pub use animation::{feed, AnimationReport, AnimationRenderer, FrameFeed, FrameSource};
pub use error::RenderError;
pub use frames::{FrameRenderer, PixelBuffer};
pub use planes::{Pixel, PlaneMapper};
pub use rows::{worker_limit, RowRenderer};
pub use settings::FrameSettings;
pub use sink::{FrameSink, PngSink};
pub use zoom::Zoom;
