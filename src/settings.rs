// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Describes a single frame: how large the image is, which part of the
//! complex plane it looks at, and how hard to work on each pixel.

use num::Complex;

use crate::error::RenderError;

/// Immutable description of one frame.  Construction validates every
/// field, so holding a `FrameSettings` means the frame can be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSettings {
    pixel_width: u32,
    pixel_height: u32,
    center: Complex<f64>,
    width: f64,
    escape_radius_squared: f64,
    max_iterations: u32,
    output_id: String,
}

impl FrameSettings {
    /// `size` is the output resolution in pixels, `center` the middle of
    /// the viewport and `width` the extent of the plane spanned
    /// horizontally.  The vertical extent follows from the aspect ratio.
    /// `output_id` is handed untouched to the sink.
    pub fn new<S: Into<String>>(
        size: (u32, u32),
        center: Complex<f64>,
        width: f64,
        escape_radius_squared: f64,
        max_iterations: u32,
        output_id: S,
    ) -> Result<Self, RenderError> {
        if size.0 == 0 || size.1 == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "image size {}x{} must be positive in both directions",
                size.0, size.1
            )));
        }
        if !center.re.is_finite() || !center.im.is_finite() {
            return Err(RenderError::InvalidSettings(format!(
                "center {} is not a finite point",
                center
            )));
        }
        if !(width.is_finite() && width > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "plane width {} must be positive",
                width
            )));
        }
        if !(escape_radius_squared.is_finite() && escape_radius_squared > 0.0) {
            return Err(RenderError::InvalidSettings(format!(
                "escape radius squared {} must be positive",
                escape_radius_squared
            )));
        }
        if max_iterations == 0 {
            return Err(RenderError::InvalidSettings(
                "iteration cap must be at least 1".to_string(),
            ));
        }

        Ok(FrameSettings {
            pixel_width: size.0,
            pixel_height: size.1,
            center,
            width,
            escape_radius_squared,
            max_iterations,
            output_id: output_id.into(),
        })
    }

    /// Horizontal resolution.
    pub fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    /// Vertical resolution.
    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    /// Center of the viewport.
    pub fn center(&self) -> Complex<f64> {
        self.center
    }

    /// Horizontal extent of the viewport on the plane.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Vertical extent of the viewport, derived from the aspect ratio.
    pub fn height(&self) -> f64 {
        self.width * f64::from(self.pixel_height) / f64::from(self.pixel_width)
    }

    /// Iteration stops once `|z|^2` reaches this.
    pub fn escape_radius_squared(&self) -> f64 {
        self.escape_radius_squared
    }

    /// Iteration cap; reaching it means the point did not escape.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Opaque identifier used by the sink.
    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    /// Number of pixels in the frame.
    pub fn len(&self) -> usize {
        self.pixel_width as usize * self.pixel_height as usize
    }

    /// Always false; a valid frame has at least one pixel.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The same frame over a different plane width, going to a different
    /// output.  Validates the new width like `new` does.
    pub fn rescaled<S: Into<String>>(&self, width: f64, output_id: S) -> Result<Self, RenderError> {
        FrameSettings::new(
            (self.pixel_width, self.pixel_height),
            self.center,
            width,
            self.escape_radius_squared,
            self.max_iterations,
            output_id,
        )
    }
}
