// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where finished frames go.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::debug;

use crate::error::RenderError;
use crate::frames::PixelBuffer;
use crate::settings::FrameSettings;

/// Receives every rendered frame.  Sinks are shared by all frames in
/// flight, so they must tolerate concurrent calls.
pub trait FrameSink: Sync {
    /// Takes ownership of a finished frame.
    fn write_frame(&self, settings: &FrameSettings, frame: PixelBuffer) -> Result<(), RenderError>;
}

impl<F> FrameSink for F
where
    F: Fn(&FrameSettings, PixelBuffer) -> Result<(), RenderError> + Sync,
{
    fn write_frame(&self, settings: &FrameSettings, frame: PixelBuffer) -> Result<(), RenderError> {
        self(settings, frame)
    }
}

/// Writes each frame as a PNG file named by its output identifier,
/// inside a single directory.
#[derive(Clone, Debug)]
pub struct PngSink {
    directory: PathBuf,
}

impl PngSink {
    /// The directory is created on the first write if it is missing.
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        PngSink {
            directory: directory.into(),
        }
    }

    /// Directory frames are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file a frame with this identifier ends up in.
    pub fn path_for(&self, output_id: &str) -> PathBuf {
        self.directory.join(output_id)
    }
}

impl FrameSink for PngSink {
    fn write_frame(&self, settings: &FrameSettings, frame: PixelBuffer) -> Result<(), RenderError> {
        let output = settings.output_id();
        fs::create_dir_all(&self.directory).map_err(|cause| RenderError::Io {
            output: output.to_string(),
            cause,
        })?;

        let path = self.path_for(output);
        frame
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|cause| RenderError::Encode {
                output: output.to_string(),
                cause,
            })?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    #[test]
    fn frames_land_in_the_directory() {
        let sink = PngSink::new("renders");
        assert_eq!(sink.directory(), Path::new("renders"));
        assert_eq!(sink.path_for("frame00003.png"), Path::new("renders/frame00003.png"));
    }

    #[test]
    fn closures_are_sinks() {
        let s = FrameSettings::new((2, 2), Complex::new(0.0, 0.0), 1.0, 4.0, 5, "c.png").unwrap();
        let sink = |settings: &FrameSettings, frame: PixelBuffer| -> Result<(), RenderError> {
            assert_eq!(settings.output_id(), "c.png");
            assert_eq!(frame.dimensions(), (2, 2));
            Ok(())
        };
        sink.write_frame(&s, PixelBuffer::new(2, 2)).unwrap();
    }
}
