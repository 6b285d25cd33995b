// THEORY:
// The `WindowEngine` is the streaming 2D filter. It produces a full-frame edge
// map while holding only a `LineBuffer` (K rows of history) and one
// `SlidingWindow`. It consumes gray pixels strictly in raster order, never
// revisits a position and never reads a pixel twice.
//
// The scan covers `(H + OFFSET) x (W + OFFSET)` positions. The extra rows and
// columns are drain positions: the filter output lags its input by `OFFSET`
// rows and `OFFSET` columns, so once the last real pixel is in, the engine keeps
// walking through the bottom and right borders without consuming anything.
//
// Every position runs the same four steps, in this order and no other:
// 1.  **Ingest** (`row < H`, `col < W`): the next input pixel lands at the newest
//     depth of its buffer column; edge columns refresh their margins.
// 2.  **Assemble & emit**: the window shifts in one buffer column (primed with
//     the left margin at the start of every row). Once both lags are covered,
//     the window is filtered and the result is output pixel
//     `(row - OFFSET, col - OFFSET)`.
// 3.  **Top fixup** (`row == 0`, `col < W`): the rows above the frame are
//     seeded with a copy of row 0.
// 4.  **Row shift** (`row > 0`, `col < W`): the column ages by one row.
//
// Running the fixup before the ingest of the next row, rather than when row 0
// arrives, is what lets the buffer synthesize a border it has not seen yet.

use crate::core_modules::geometry::{BORDER_OFFSET, FrameGeometry};
use crate::core_modules::gradient::edge_response;
use crate::core_modules::line_buffer::LineBuffer;
use crate::core_modules::pixel::pixel::{Channel, GrayPixel};
use crate::core_modules::window::SlidingWindow;
use crate::error::Result;
use image::GrayImage;
use tracing::trace;

/// Per-frame convolution state. Create one per frame and drop it afterwards.
pub struct WindowEngine {
    geometry: FrameGeometry,
    line_buffer: LineBuffer,
    window: SlidingWindow,
}

impl WindowEngine {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            line_buffer: LineBuffer::new(&geometry),
            window: SlidingWindow::new(),
            geometry,
        }
    }

    /// Filters one gray frame, pushing each output pixel into `sink` in raster
    /// order. Exactly `W * H` pixels are read and exactly `W * H` are emitted.
    pub fn run<F>(mut self, frame: &GrayImage, mut sink: F) -> Result<usize>
    where
        F: FnMut(GrayPixel),
    {
        self.geometry.check_dimensions(frame.dimensions())?;

        let width = self.geometry.width() as usize;
        let height = self.geometry.height() as usize;
        let mut source = frame.as_raw().iter().copied();
        let mut emitted = 0usize;

        for row in 0..self.geometry.scan_rows() {
            for col in 0..self.geometry.scan_columns() {
                let ingested = if row < height && col < width {
                    source.next()
                } else {
                    None
                };
                if let Some(pixel) = self.step(row, col, ingested) {
                    sink(pixel);
                    emitted += 1;
                }
            }
        }

        trace!(
            width,
            height,
            emitted,
            drain_positions = self.geometry.scan_rows() * self.geometry.scan_columns() - emitted,
            "window engine drained"
        );
        Ok(emitted)
    }

    /// One scan position. `ingested` carries the input pixel for real positions
    /// and is `None` on drain positions.
    fn step(&mut self, row: usize, col: usize, ingested: Option<Channel>) -> Option<GrayPixel> {
        let is_frame_column = col < self.geometry.width() as usize;

        if let Some(value) = ingested {
            self.line_buffer.ingest(col, value);
        }

        if col == 0 {
            for margin in 0..BORDER_OFFSET {
                self.window.shift_in(self.line_buffer.column(margin));
            }
        }
        self.window.shift_in(self.line_buffer.column(col + BORDER_OFFSET));
        let output = (row >= BORDER_OFFSET && col >= BORDER_OFFSET).then(|| edge_response(&self.window));

        if is_frame_column {
            if row == 0 {
                self.line_buffer.seed_top(col);
            } else {
                self.line_buffer.age(col);
            }
        }

        output
    }
}

/// Convenience wrapper: filters a whole gray frame into a new dense frame.
pub fn convolve_frame(frame: &GrayImage) -> Result<GrayImage> {
    let (width, height) = frame.dimensions();
    let geometry = FrameGeometry::new(width, height)?;
    let mut output = GrayImage::new(width, height);
    let mut cells = output.iter_mut();
    WindowEngine::new(geometry).run(frame, |pixel| {
        if let Some(cell) = cells.next() {
            *cell = pixel.0[0];
        }
    })?;
    Ok(output)
}
