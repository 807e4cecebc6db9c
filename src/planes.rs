//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top left corner, and the rectangle of the complex plane a frame
//! looks at.
use num::Complex;

use crate::settings::FrameSettings;

/// Describes the x, y of a pixel in a frame.  Column first, then row,
/// with row 0 at the top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub u32, pub u32);

/// Maps pixels of a frame onto the complex plane.  Built once per frame
/// and shared by every worker of that frame, so all strategies compute
/// coordinates with exactly the same arithmetic.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    /// Real part of the left edge.
    left: f64,
    /// Imaginary part of the top edge.
    top: f64,
    // Distance on the plane between two neighbouring pixels, horizontally
    // and vertically.
    scale: (f64, f64),
}

impl PlaneMapper {
    /// Derives the affine map for a frame from its settings.
    pub fn new(settings: &FrameSettings) -> PlaneMapper {
        let width = settings.width();
        let height = settings.height();
        let center = settings.center();

        PlaneMapper {
            left: center.re - width / 2.0,
            top: center.im + height / 2.0,
            scale: (
                width / f64::from(settings.pixel_width()),
                height / f64::from(settings.pixel_height()),
            ),
        }
    }

    /// Real part of every pixel in the given column.
    #[inline]
    pub fn column_to_re(&self, column: u32) -> f64 {
        self.left + f64::from(column) * self.scale.0
    }

    /// Imaginary part of every pixel in the given row.
    #[inline]
    pub fn row_to_im(&self, row: u32) -> f64 {
        self.top - f64::from(row) * self.scale.1
    }

    /// Given a pixel on the integral cartesian plane, map that to its
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(self.column_to_re(pixel.0), self.row_to_im(pixel.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(size: (u32, u32), center: Complex<f64>, width: f64) -> FrameSettings {
        FrameSettings::new(size, center, width, 4.0, 10, "t.png").unwrap()
    }

    #[test]
    fn pixel_to_point_on_positive_planes() {
        let pm = PlaneMapper::new(&settings((5, 5), Complex::new(2.5, 2.5), 5.0));
        assert_eq!(pm.pixel_to_point(Pixel(0, 0)), Complex::new(0.0, 5.0));
        assert_eq!(pm.pixel_to_point(Pixel(2, 2)), Complex::new(2.0, 3.0));
        assert_eq!(pm.pixel_to_point(Pixel(4, 4)), Complex::new(4.0, 1.0));
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = PlaneMapper::new(&settings((4, 4), Complex::new(0.0, 0.0), 4.0));
        assert_eq!(pm.pixel_to_point(Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(Pixel(3, 3)), Complex::new(1.0, -1.0));
    }

    #[test]
    fn top_left_pixel_is_top_left_corner() {
        let s = settings((640, 480), Complex::new(-0.75, 0.1), 3.0);
        let pm = PlaneMapper::new(&s);
        let corner = pm.pixel_to_point(Pixel(0, 0));
        assert!((corner.re - (-0.75 - 1.5)).abs() < 1e-12);
        assert!((corner.im - (0.1 + s.height() / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn bottom_right_pixel_approaches_bottom_right_corner() {
        let s = settings((640, 480), Complex::new(-0.75, 0.1), 3.0);
        let pm = PlaneMapper::new(&s);
        let last = pm.pixel_to_point(Pixel(639, 479));
        let right = -0.75 + 1.5;
        let bottom = 0.1 - s.height() / 2.0;
        let step = 3.0 / 640.0;
        assert!(last.re < right && right - last.re <= step + 1e-12);
        assert!(last.im > bottom && last.im - bottom <= step + 1e-12);
    }

    #[test]
    fn aspect_ratio_sets_vertical_extent() {
        let s = settings((200, 100), Complex::new(0.0, 0.0), 2.0);
        let pm = PlaneMapper::new(&s);
        assert_eq!(pm.row_to_im(0), 0.5);
        assert_eq!(pm.row_to_im(50), 0.0);
        assert_eq!(pm.column_to_re(100), 0.0);
    }
}
