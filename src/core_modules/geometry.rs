// THEORY:
// The geometry is the one piece of configuration the engine trusts blindly.
// Every buffer in the convolution path is sized from it once, at frame start,
// and every loop bound is derived from it. Nothing is resized while a frame is
// in flight.
//
// The kernel edge length `K` and the border offset `OFFSET = K / 2` are fixed
// for the crate because the gradient kernels are fixed 5x5 matrices. Width and
// height are chosen when the pipeline is built, which keeps the engine
// testable at tiny sizes while production runs at full HD-ish sizes.

use crate::error::{FrameError, Result};

/// Edge length of the square convolution support.
pub const KERNEL_SIZE: usize = 5;
/// Number of replicated border pixels on each side of the frame.
pub const BORDER_OFFSET: usize = KERNEL_SIZE / 2;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;

/// Fixed frame dimensions for one pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameGeometry {
    width: u32,
    height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FrameError::InvalidGeometry { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in one frame (`W * H`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Columns held by a line buffer: the frame width plus both border margins.
    pub fn buffer_columns(&self) -> usize {
        self.width as usize + 2 * BORDER_OFFSET
    }

    /// Rows visited by the window engine, including the vertical drain rows.
    pub fn scan_rows(&self) -> usize {
        self.height as usize + BORDER_OFFSET
    }

    /// Columns visited per scan row, including the right-margin drain.
    pub fn scan_columns(&self) -> usize {
        self.width as usize + BORDER_OFFSET
    }

    /// Checks that a dense container has exactly this geometry.
    pub fn check_dimensions(&self, (width, height): (u32, u32)) -> Result<()> {
        if (width, height) != (self.width, self.height) {
            return Err(FrameError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                actual_width: width,
                actual_height: height,
            });
        }
        Ok(())
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            FrameGeometry::new(0, 4),
            Err(FrameError::InvalidGeometry { width: 0, height: 4 })
        );
        assert!(FrameGeometry::new(4, 0).is_err());
    }

    #[test]
    fn derived_extents() {
        let geometry = FrameGeometry::new(8, 6).unwrap();
        assert_eq!(geometry.pixel_count(), 48);
        assert_eq!(geometry.buffer_columns(), 12);
        assert_eq!(geometry.scan_rows(), 8);
        assert_eq!(geometry.scan_columns(), 10);
    }

    #[test]
    fn default_is_720p() {
        let geometry = FrameGeometry::default();
        assert_eq!((geometry.width(), geometry.height()), (1280, 720));
    }

    #[test]
    fn dimension_check_reports_both_sizes() {
        let geometry = FrameGeometry::new(8, 6).unwrap();
        assert!(geometry.check_dimensions((8, 6)).is_ok());
        assert_eq!(
            geometry.check_dimensions((6, 8)),
            Err(FrameError::DimensionMismatch {
                expected_width: 8,
                expected_height: 6,
                actual_width: 6,
                actual_height: 8,
            })
        );
    }
}
