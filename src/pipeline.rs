// THEORY:
// The `pipeline` module is the top-level API of the edge engine. It wires the
// stage modules into one forward-only pass per frame:
//
//     ingest -> grayscale -> line-buffer convolution -> expand -> emit
//
// Each stage runs over the whole frame before the next one starts. The
// per-pixel work is pure and position-indexed, so this produces exactly what
// an overlapped, one-pixel-per-cycle pipeline would.
//
// No pixel state survives a frame. The only thing `EdgePipeline` remembers
// between frames is how many it has processed.

use crate::core_modules::geometry::{DEFAULT_HEIGHT, DEFAULT_WIDTH, FrameGeometry};
use crate::core_modules::pixel::pixel::{VideoWord, gray_to_rgb, rgb_to_gray};
use crate::core_modules::stream_adapter::{frame_from_bytes, frame_to_bytes, read_frame, write_frame};
use crate::core_modules::window_engine::convolve_frame;
use crate::error::{FrameError, Result};
use image::RgbImage;
use std::env;
use std::str::FromStr;
use tracing::debug;

const DEFAULT_QUEUE_DEPTH: usize = 8;

pub const WIDTH_VAR: &str = "EDGE_STREAM_WIDTH";
pub const HEIGHT_VAR: &str = "EDGE_STREAM_HEIGHT";
pub const WORKERS_VAR: &str = "EDGE_STREAM_WORKERS";
pub const QUEUE_DEPTH_VAR: &str = "EDGE_STREAM_QUEUE_DEPTH";

/// Configuration for the edge pipeline. Geometry is fixed for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub geometry: FrameGeometry,
    /// Worker tasks used by `ParallelPipeline`. Ignored by `EdgePipeline`.
    pub worker_count: usize,
    /// Frames that may wait for a worker before submitters are held back.
    pub queue_depth: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            geometry: FrameGeometry::default(),
            worker_count: num_cpus::get(),
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl PipelineConfig {
    pub fn new(geometry: FrameGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// Defaults overridden by the `EDGE_STREAM_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let width = parse_var(&lookup, WIDTH_VAR)?.unwrap_or(DEFAULT_WIDTH);
        let height = parse_var(&lookup, HEIGHT_VAR)?.unwrap_or(DEFAULT_HEIGHT);
        let config = Self {
            geometry: FrameGeometry::new(width, height)?,
            worker_count: parse_var(&lookup, WORKERS_VAR)?.unwrap_or(defaults.worker_count),
            queue_depth: parse_var(&lookup, QUEUE_DEPTH_VAR)?.unwrap_or(defaults.queue_depth),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            return Err(invalid("worker_count", "at least one worker is required"));
        }
        if self.queue_depth == 0 {
            return Err(invalid("queue_depth", "queue depth must be at least 1"));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, &format!("cannot parse {raw:?}"))),
    }
}

fn invalid(field: &str, reason: &str) -> FrameError {
    FrameError::InvalidConfig {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Runs the full per-frame stage sequence on a frame of the given geometry.
pub fn run_frame(geometry: &FrameGeometry, frame: &RgbImage) -> Result<RgbImage> {
    geometry.check_dimensions(frame.dimensions())?;

    let gray = rgb_to_gray(frame);
    let edges = convolve_frame(&gray)?;
    Ok(gray_to_rgb(&edges))
}

/// The sequential, single-frame-at-a-time edge pipeline.
pub struct EdgePipeline {
    config: PipelineConfig,
    frames_processed: u64,
}

impl EdgePipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            frames_processed: 0,
        }
    }

    pub fn geometry(&self) -> &FrameGeometry {
        &self.config.geometry
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Filters one dense RGB frame into a black/white edge frame.
    pub fn process_frame(&mut self, frame: &RgbImage) -> Result<RgbImage> {
        let output = run_frame(&self.config.geometry, frame)?;
        self.frames_processed += 1;
        debug!(frame = self.frames_processed, "edge frame complete");
        Ok(output)
    }

    /// Ingests one frame of pixel words from `stream`, filters it and emits the
    /// result into `sink`. Nothing is written to `sink` for a malformed frame.
    pub fn process_stream<I, S>(&mut self, stream: &mut I, sink: &mut S) -> Result<()>
    where
        I: Iterator<Item = VideoWord>,
        S: Extend<VideoWord>,
    {
        let frame = read_frame(stream, &self.config.geometry)?;
        let output = self.process_frame(&frame)?;
        write_frame(&output, &self.config.geometry, sink)?;
        Ok(())
    }

    /// Same as `process_stream` for an interleaved RGB byte buffer.
    pub fn process_bytes(&mut self, bytes: &[u8]) -> Result<Vec<u8>> {
        let frame = frame_from_bytes(bytes, &self.config.geometry)?;
        let output = self.process_frame(&frame)?;
        frame_to_bytes(&output, &self.config.geometry)
    }
}
