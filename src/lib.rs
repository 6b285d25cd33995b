// THEORY:
// This file is the entry point for the `edge_stream` library crate. It exports
// the `EdgePipeline` (sequential, one frame at a time), the `ParallelPipeline`
// (independent frames on a worker pool) and the configuration and error types
// they share.
//
// The streaming filter itself lives in `core_modules`: the line buffer, the
// sliding window, the gradient kernel and the engine that drives them. Those
// modules are public so the engine can be driven directly, but most callers
// only need the pipeline types re-exported here.

pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;

pub use core_modules::geometry::FrameGeometry;
pub use error::{FrameError, Result};
pub use parallel_pipeline::{FrameOutput, ParallelPipeline};
pub use pipeline::{EdgePipeline, PipelineConfig};
