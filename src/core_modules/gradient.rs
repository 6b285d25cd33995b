// THEORY:
// The gradient kernel turns one 5x5 neighborhood into a binary edge decision.
// Two fixed, Sobel-like kernels estimate the intensity change along each axis;
// their absolute responses are added (an L1 magnitude, no square root) and
// compared against a fixed threshold.
//
// The kernel values and the threshold define the output exactly, so they are
// constants and never configurable. Accumulation happens in `i32`: the largest
// absolute kernel sum is 36, so no window of 8-bit values can come anywhere
// close to overflowing.

use crate::core_modules::geometry::KERNEL_SIZE;
use crate::core_modules::pixel::pixel::{Channel, GrayPixel};
use crate::core_modules::window::SlidingWindow;
use image::Luma;

pub type Kernel = [[i32; KERNEL_SIZE]; KERNEL_SIZE];

/// Responds to intensity change between the top and bottom of the window.
pub const KERNEL_X: Kernel = [
    [2, 2, 4, 2, 2],
    [1, 1, 2, 1, 1],
    [0, 0, 0, 0, 0],
    [-1, -1, -2, -1, -1],
    [-2, -2, -4, -2, -2],
];

/// Responds to intensity change between the left and right of the window.
pub const KERNEL_Y: Kernel = [
    [2, 1, 0, -1, -2],
    [2, 1, 0, -1, -2],
    [4, 2, 0, -2, -4],
    [2, 1, 0, -1, -2],
    [2, 1, 0, -1, -2],
];

/// `|Gx| + |Gy|` must exceed this for a pixel to count as an edge.
pub const EDGE_THRESHOLD: i32 = 200;

pub const EDGE: Channel = 255;
pub const NO_EDGE: Channel = 0;

/// Raw `(Gx, Gy)` responses for a window.
pub fn gradients(window: &SlidingWindow) -> (i32, i32) {
    let mut x_magnitude = 0i32;
    let mut y_magnitude = 0i32;
    for (row, (x_row, y_row)) in window.rows().iter().zip(KERNEL_X.iter().zip(&KERNEL_Y)) {
        for ((&value, &x_weight), &y_weight) in row.iter().zip(x_row).zip(y_row) {
            let value = i32::from(value);
            x_magnitude += value * x_weight;
            y_magnitude += value * y_weight;
        }
    }
    (x_magnitude, y_magnitude)
}

/// Binary edge decision for the pixel at the center of `window`.
pub fn edge_response(window: &SlidingWindow) -> GrayPixel {
    let (x_magnitude, y_magnitude) = gradients(window);
    if x_magnitude.abs() + y_magnitude.abs() > EDGE_THRESHOLD {
        Luma([EDGE])
    } else {
        Luma([NO_EDGE])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(rows: [[Channel; KERNEL_SIZE]; KERNEL_SIZE]) -> SlidingWindow {
        SlidingWindow::from_rows(rows)
    }

    #[test]
    fn flat_window_has_no_gradient() {
        for value in [0, 1, 93, 255] {
            let flat = window([[value; KERNEL_SIZE]; KERNEL_SIZE]);
            assert_eq!(gradients(&flat), (0, 0));
            assert_eq!(edge_response(&flat), Luma([NO_EDGE]));
        }
    }

    #[test]
    fn kernels_are_antisymmetric() {
        for i in 0..KERNEL_SIZE {
            for j in 0..KERNEL_SIZE {
                assert_eq!(KERNEL_X[i][j], -KERNEL_X[KERNEL_SIZE - 1 - i][j]);
                assert_eq!(KERNEL_Y[i][j], -KERNEL_Y[i][KERNEL_SIZE - 1 - j]);
                assert_eq!(KERNEL_X[i][j], KERNEL_Y[j][i]);
            }
        }
    }

    #[test]
    fn vertical_step_drives_y_response() {
        // dark left two columns, bright right three
        let step = window([[0, 0, 93, 93, 93]; KERNEL_SIZE]);
        assert_eq!(gradients(&step), (0, 93 * -18));
        assert_eq!(edge_response(&step), Luma([EDGE]));
    }

    #[test]
    fn horizontal_step_drives_x_response() {
        let mut rows = [[0; KERNEL_SIZE]; KERNEL_SIZE];
        rows[0] = [50; KERNEL_SIZE];
        let step = window(rows);
        assert_eq!(gradients(&step), (50 * 12, 0));
    }

    #[test]
    fn threshold_is_strict() {
        // a single pixel in the center-top cell weighs 4 in Gx and 0 in Gy
        let mut rows = [[0; KERNEL_SIZE]; KERNEL_SIZE];
        rows[0][2] = 50;
        assert_eq!(gradients(&window(rows)), (200, 0));
        assert_eq!(edge_response(&window(rows)), Luma([NO_EDGE]));

        rows[0][2] = 51;
        assert_eq!(edge_response(&window(rows)), Luma([EDGE]));
    }

    #[test]
    fn worst_case_magnitude_fits() {
        let mut rows = [[0; KERNEL_SIZE]; KERNEL_SIZE];
        rows[0] = [255; KERNEL_SIZE];
        rows[1] = [255; KERNEL_SIZE];
        let (x_magnitude, _) = gradients(&window(rows));
        assert_eq!(x_magnitude, 255 * 18);
    }
}
