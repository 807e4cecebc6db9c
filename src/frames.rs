// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Frame granularity.  A frame renderer turns one `FrameSettings` into
//! a fully populated pixel buffer, delegating each row to a
//! `RowRenderer`.

use image::RgbaImage;
use log::debug;

use crate::error::RenderError;
use crate::planes::PlaneMapper;
use crate::rows::{share_out, RowRenderer, BYTES_PER_PIXEL};
use crate::settings::FrameSettings;

/// An RGBA image the size of the frame.  Owned by the render call until
/// every row is written, then handed over whole.
pub type PixelBuffer = RgbaImage;

/// How the rows of a frame are distributed over workers.  Whatever the
/// combination of frame and row strategies, the resulting buffer is
/// identical; only the speed differs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameRenderer {
    /// Rows one after another in the calling thread.
    Serial(RowRenderer),
    /// Rows handed out one at a time to a fixed pool of scoped workers;
    /// whichever worker takes a row owns that row of the buffer.
    Parallel(RowRenderer),
}

impl Default for FrameRenderer {
    /// Parallel across rows, serial within them.
    fn default() -> Self {
        FrameRenderer::Parallel(RowRenderer::Serial)
    }
}

impl FrameRenderer {
    /// The strategy used inside each row.
    pub fn row_renderer(&self) -> RowRenderer {
        match *self {
            FrameRenderer::Serial(rows) | FrameRenderer::Parallel(rows) => rows,
        }
    }

    /// Renders the frame.  The plane mapping is computed once and shared
    /// by all rows.  If any row fails the whole frame fails; a partially
    /// written buffer is never returned.
    pub fn render_frame(&self, settings: &FrameSettings) -> Result<PixelBuffer, RenderError> {
        debug!("rendering {} with {:?}", settings.output_id(), self);
        let plane = PlaneMapper::new(settings);
        let mut frame = RgbaImage::new(settings.pixel_width(), settings.pixel_height());
        let stride = settings.pixel_width() as usize * BYTES_PER_PIXEL;

        match *self {
            FrameRenderer::Serial(rows) => {
                for (row, pixels) in frame.chunks_exact_mut(stride).enumerate() {
                    rows.render_row(&plane, row as u32, settings, pixels)?;
                }
            }

            FrameRenderer::Parallel(rows) => {
                let plane = &plane;
                share_out(
                    frame.chunks_exact_mut(stride).enumerate(),
                    |(row, pixels): (usize, &mut [u8])| {
                        rows.render_row(plane, row as u32, settings, pixels)
                    },
                )?;
            }
        }

        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num::Complex;

    fn settings(size: (u32, u32), limit: u32) -> FrameSettings {
        FrameSettings::new(size, Complex::new(-0.75, 0.0), 3.0, 4.0, limit, "frame.png").unwrap()
    }

    #[test]
    fn default_is_parallel_rows_of_serial_pixels() {
        assert_eq!(
            FrameRenderer::default(),
            FrameRenderer::Parallel(RowRenderer::Serial)
        );
        assert_eq!(FrameRenderer::default().row_renderer(), RowRenderer::Serial);
    }

    #[test]
    fn frame_has_the_requested_size() {
        let frame = FrameRenderer::default().render_frame(&settings((13, 7), 50)).unwrap();
        assert_eq!(frame.dimensions(), (13, 7));
    }

    #[test]
    fn single_pixel_frames_render() {
        for renderer in &[
            FrameRenderer::Serial(RowRenderer::Serial),
            FrameRenderer::Serial(RowRenderer::Parallel),
            FrameRenderer::Parallel(RowRenderer::Serial),
            FrameRenderer::Parallel(RowRenderer::Parallel),
        ] {
            let frame = renderer.render_frame(&settings((1, 1), 20)).unwrap();
            assert_eq!(frame.dimensions(), (1, 1));
            assert_eq!(frame.get_pixel(0, 0)[3], 255);
        }
    }

    #[test]
    fn cap_of_one_gives_two_shades() {
        let frame = FrameRenderer::default().render_frame(&settings((40, 30), 1)).unwrap();
        for pixel in frame.pixels() {
            assert!(pixel[0] == 0 || pixel[0] == 255, "unexpected shade {:?}", pixel);
        }
    }

    #[test]
    fn serial_and_parallel_frames_agree() {
        let s = settings((64, 48), 100);
        let serial = FrameRenderer::Serial(RowRenderer::Serial).render_frame(&s).unwrap();
        let parallel = FrameRenderer::Parallel(RowRenderer::Serial).render_frame(&s).unwrap();
        assert_eq!(serial.as_raw(), parallel.as_raw());
    }

    #[test]
    fn tall_frames_with_pixel_parallel_rows_render() {
        let s = settings((300, 400), 60);
        let nested = FrameRenderer::Parallel(RowRenderer::Parallel).render_frame(&s).unwrap();
        let serial = FrameRenderer::Serial(RowRenderer::Serial).render_frame(&s).unwrap();
        assert_eq!(nested.as_raw(), serial.as_raw());
    }

    #[test]
    fn interior_points_are_white() {
        let s =
            FrameSettings::new((3, 3), Complex::new(-0.2, 0.0), 0.3, 4.0, 100, "c.png").unwrap();
        let frame = FrameRenderer::default().render_frame(&s).unwrap();
        assert_eq!(frame.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }
}
