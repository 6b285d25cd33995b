// THEORY:
// The `LineBuffer` is the only memory the convolution keeps between pixels.
// It is a `(W + 2*OFFSET) x K` store: one depth column of K gray values per
// absolute buffer column, where buffer column `c + OFFSET` backs frame column
// `c` and the `OFFSET` columns on either side are border margins.
//
// Depth `K - 1` always holds the newest row seen for a column and depth 0 the
// oldest. Rows age by copying every depth one slot toward 0, so the buffer is
// a ring in meaning while staying a plain array in memory.
//
// Border replication is split across two moments:
// 1.  **Horizontal (eager)**: when the first or last frame column is ingested,
//     its entire depth column is copied into the neighboring margin columns.
//     The whole row width is known at that point, so nothing has to wait.
// 2.  **Vertical (lazy)**: the rows above row 0 are synthesised one row behind,
//     by seeding every older depth with the row-0 value right after it lands.
//     The rows below the last row fall out of aging for free, because the
//     newest depth keeps its value when nothing new is ingested.
//
// Margins are refreshed only by ingest and top seeding, so the top corners are
// replicated symmetrically. Once input stops (the vertical drain), the margins
// keep the last history copied into them while the real columns continue to
// age. The bottom corners therefore see a stale border: an asymmetry of this
// buffer layout, not a replicated-border property.

use crate::core_modules::geometry::{BORDER_OFFSET, FrameGeometry, KERNEL_SIZE};
use crate::core_modules::pixel::pixel::Channel;

pub type DepthColumn = [Channel; KERNEL_SIZE];

const NEWEST: usize = KERNEL_SIZE - 1;

pub struct LineBuffer {
    /// One depth column per buffer column, margins included.
    columns: Vec<DepthColumn>,
    /// Frame width in pixels, margins excluded.
    width: usize,
}

impl LineBuffer {
    pub fn new(geometry: &FrameGeometry) -> Self {
        Self {
            columns: vec![[0; KERNEL_SIZE]; geometry.buffer_columns()],
            width: geometry.width() as usize,
        }
    }

    /// Depth column at absolute buffer index `index` (margins included).
    pub fn column(&self, index: usize) -> &DepthColumn {
        &self.columns[index]
    }

    /// Stores the newest pixel of frame column `col` and refreshes the margin
    /// next to it when `col` is an edge column.
    pub fn ingest(&mut self, col: usize, value: Channel) {
        let index = col + BORDER_OFFSET;
        self.columns[index][NEWEST] = value;
        self.replicate_margins(col);
    }

    /// Fills every older depth of frame column `col` with its newest value.
    /// Used once per column on the first row of a frame.
    pub fn seed_top(&mut self, col: usize) {
        let index = col + BORDER_OFFSET;
        let newest = self.columns[index][NEWEST];
        self.columns[index] = [newest; KERNEL_SIZE];
        self.replicate_margins(col);
    }

    /// Ages frame column `col` by one row: depth `d + 1` moves to depth `d`.
    pub fn age(&mut self, col: usize) {
        self.columns[col + BORDER_OFFSET].copy_within(1.., 0);
    }

    fn replicate_margins(&mut self, col: usize) {
        let index = col + BORDER_OFFSET;
        let edge = self.columns[index];
        if col == 0 {
            self.columns[..BORDER_OFFSET].fill(edge);
        }
        if col + 1 == self.width {
            self.columns[index + 1..].fill(edge);
        }
    }
}
