// THEORY:
// Every failure the engine can report is a contract violation by whatever sits
// around it: a frame with the wrong number of pixels, a container with the
// wrong dimensions, a geometry that cannot exist, or a worker pool that has
// already shut down. The convolution itself is total, so nothing in here
// describes an arithmetic or state failure.

use thiserror::Error;

/// Errors reported at the boundary of the edge pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("invalid frame geometry {width}x{height}: both dimensions must be at least 1")]
    InvalidGeometry { width: u32, height: u32 },

    #[error("frame is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// The input ended before a whole frame was read.
    #[error("truncated frame: expected {expected} pixels, received {received}")]
    Truncated { expected: usize, received: usize },

    /// More pixels than the geometry declares were supplied for one frame.
    #[error("oversized frame: expected {expected} pixels, received {received}")]
    Overrun { expected: usize, received: usize },

    #[error("byte buffer of length {len} does not hold a whole number of RGB pixels")]
    PartialPixel { len: usize },

    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("worker pool is unavailable: {0}")]
    WorkerUnavailable(&'static str),
}

pub type Result<T> = std::result::Result<T, FrameError>;
