// This file is an example of how to use the `edge_stream` library.
// The main library entry point is `src/lib.rs`.

use edge_stream::core_modules::pixel::pixel::{pack, unpack};
use edge_stream::{EdgePipeline, PipelineConfig};
use image::{Rgb, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> edge_stream::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Edge Stream Engine - Example Runner");

    // Geometry and pool sizes can be overridden with EDGE_STREAM_* variables.
    let config = PipelineConfig::from_env()?;
    let geometry = config.geometry;
    info!(width = geometry.width(), height = geometry.height(), "pipeline configured");

    // A synthetic frame with a single vertical step, fed through the word stream
    // the way a capture front end would deliver it.
    let width = geometry.width();
    let frame = RgbImage::from_fn(width, geometry.height(), |x, _| {
        if x < width / 2 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
    });
    let mut stream = frame.pixels().map(pack);
    let mut output = Vec::with_capacity(geometry.pixel_count());

    let mut pipeline = EdgePipeline::new(config);
    pipeline.process_stream(&mut stream, &mut output)?;

    let edge_columns: Vec<u32> = (0..width)
        .filter(|&x| unpack(output[x as usize]) == Rgb([255, 255, 255]))
        .collect();
    info!(
        frames = pipeline.frames_processed(),
        pixels = output.len(),
        ?edge_columns,
        "edge map complete"
    );
    Ok(())
}
