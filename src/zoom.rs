// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A zoom animation: the same viewport, narrowed by a constant factor
//! from one frame to the next.

use std::vec;

use crate::error::RenderError;
use crate::settings::FrameSettings;

/// The frames of a zoom, in order.  Frame `i` is named
/// `frame{i:05}.png` and spans `start_width * factor^(i + 1)`, the width
/// being multiplied once per frame.
#[derive(Debug)]
pub struct Zoom {
    frames: vec::IntoIter<FrameSettings>,
}

impl Zoom {
    /// Takes size, center, start width, bound and cap from `template`;
    /// its output identifier is ignored.  Every frame is validated up
    /// front, so a zoom deep enough to underflow the width is refused
    /// before anything renders.
    pub fn new(template: &FrameSettings, factor: f64, frames: usize) -> Result<Self, RenderError> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "zoom factor {} must be positive",
                factor
            )));
        }

        let mut width = template.width();
        let settings = (0..frames)
            .map(|i| {
                width *= factor;
                template.rescaled(width, format!("frame{:05}.png", i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Zoom {
            frames: settings.into_iter(),
        })
    }
}

impl Iterator for Zoom {
    type Item = FrameSettings;

    fn next(&mut self) -> Option<FrameSettings> {
        self.frames.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.frames.size_hint()
    }
}

impl ExactSizeIterator for Zoom {}
