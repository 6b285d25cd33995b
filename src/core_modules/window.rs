// THEORY:
// The `SlidingWindow` is the KxK neighborhood handed to the gradient kernel.
// It is never gathered by random access into a frame. Instead it is rebuilt
// one column at a time: every scan position shifts the whole window one step
// to the left and inserts a single fresh depth column from the line buffer on
// the right. After K shifts the window holds K consecutive buffer columns.
//
// Row `r` of the window is vertical offset `r - OFFSET` from the position being
// filtered, column `c` is horizontal offset `c - OFFSET`.

use crate::core_modules::geometry::KERNEL_SIZE;
use crate::core_modules::line_buffer::DepthColumn;
use crate::core_modules::pixel::pixel::Channel;

pub type WindowRows = [[Channel; KERNEL_SIZE]; KERNEL_SIZE];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlidingWindow {
    cells: WindowRows,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: WindowRows) -> Self {
        Self { cells }
    }

    /// Drops the leftmost column and appends `column` as the new rightmost one,
    /// depth `d` landing in window row `d`.
    pub fn shift_in(&mut self, column: &DepthColumn) {
        for (row, &value) in self.cells.iter_mut().zip(column) {
            row.copy_within(1.., 0);
            row[KERNEL_SIZE - 1] = value;
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Channel {
        self.cells[row][col]
    }

    pub fn rows(&self) -> &WindowRows {
        &self.cells
    }
}
