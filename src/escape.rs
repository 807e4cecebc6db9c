// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time kernel.  Everything here is pure and may be called
//! from any number of threads at once.

use image::Rgba;
use num::{clamp, Complex};

use crate::settings::FrameSettings;

/// Iterates `z = z * z + c`, starting from `z = c`, for as long as
/// `|z|^2` stays below `escape_radius_squared` and the cap has not been
/// reached.  Returns the number of iterations performed; a result of
/// `max_iterations` means the point never escaped and is treated as
/// inside the set.
#[inline]
pub fn iterate(c: Complex<f64>, escape_radius_squared: f64, max_iterations: u32) -> u32 {
    let mut z = c;
    let mut count = 0;
    while z.norm_sqr() < escape_radius_squared && count < max_iterations {
        z = z * z + c;
        count += 1;
    }
    count
}

/// Grayscale intensity for an iteration count: linear in
/// `count / max_iterations`, so points inside the set are white.
pub fn shade(count: u32, max_iterations: u32) -> Rgba<u8> {
    let intensity = f64::from(count) / f64::from(max_iterations);
    let channel = clamp((intensity * 255.0).floor(), 0.0, 255.0) as u8;
    Rgba([channel, channel, channel, 255])
}

/// The color of the point `c` under the given frame's bound and cap.
#[inline]
pub fn render_point(c: Complex<f64>, settings: &FrameSettings) -> Rgba<u8> {
    let max_iterations = settings.max_iterations();
    shade(
        iterate(c, settings.escape_radius_squared(), max_iterations),
        max_iterations,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_never_escapes() {
        for max in &[1, 2, 17, 200, 5000] {
            assert_eq!(iterate(Complex::new(0.0, 0.0), 4.0, *max), *max);
            assert_eq!(iterate(Complex::new(0.0, 0.0), 10_000.0, *max), *max);
        }
    }

    #[test]
    fn far_points_escape_immediately() {
        assert_eq!(iterate(Complex::new(3.0, 0.0), 4.0, 100), 0);
        assert_eq!(iterate(Complex::new(0.0, -2.5), 4.0, 100), 0);
    }

    #[test]
    fn known_exterior_point() {
        // 1 -> 2 -> 5: |5|^2 = 25 is past a bound of 16 after two steps.
        assert_eq!(iterate(Complex::new(1.0, 0.0), 16.0, 100), 2);
    }

    #[test]
    fn iterations_are_monotonic_in_the_cap() {
        let points = [
            Complex::new(-0.75, 0.1),
            Complex::new(-1.25, 0.02),
            Complex::new(0.3, 0.5),
            Complex::new(-0.1, 0.65),
            Complex::new(0.0, 0.0),
        ];
        for c in &points {
            let mut previous = 0;
            for max in 1..300 {
                let n = iterate(*c, 10_000.0, max);
                assert!(n <= max);
                assert!(n >= previous);
                previous = n;
            }
        }
    }

    #[test]
    fn cap_of_one_yields_zero_or_one() {
        for c in &[Complex::new(0.0, 0.0), Complex::new(5.0, 5.0), Complex::new(-1.0, 0.5)] {
            let n = iterate(*c, 4.0, 1);
            assert!(n == 0 || n == 1);
        }
    }

    #[test]
    fn shading_is_linear_grayscale() {
        assert_eq!(shade(0, 200), Rgba([0, 0, 0, 255]));
        assert_eq!(shade(200, 200), Rgba([255, 255, 255, 255]));
        assert_eq!(shade(100, 200), Rgba([127, 127, 127, 255]));
    }
}
