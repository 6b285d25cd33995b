use anyhow::{Context, bail};
use edge_stream::{FrameGeometry, ParallelPipeline, PipelineConfig};
use image::RgbImage;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod image_helper {
    use image::{ImageEncoder, RgbImage};
    use std::path::Path;

    /// Writes an RGB frame as PNG.
    pub fn save(path: &Path, frame: &RgbImage) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);
        let (width, height) = frame.dimensions();
        encoder.write_image(frame.as_raw(), width, height, image::ExtendedColorType::Rgb8)?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- 1. Argument Parsing ---
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        println!("Usage: frame_tester <output_dir> <input_image>...");
        return Ok(());
    }
    let output_dir = PathBuf::from(&args[1]);
    let input_paths: Vec<PathBuf> = args[2..].iter().map(PathBuf::from).collect();
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    // --- 2. Frame Loading ---
    // Every frame in one run must share the geometry of the first.
    let frames = input_paths.iter().map(|path| load_frame(path)).collect::<anyhow::Result<Vec<_>>>()?;
    let (width, height) = frames[0].dimensions();
    if let Some(index) = frames.iter().position(|frame| frame.dimensions() != (width, height)) {
        bail!(
            "{} is {:?}, expected {width}x{height} like the first frame",
            input_paths[index].display(),
            frames[index].dimensions()
        );
    }

    // --- 3. Pipeline Initialization ---
    let config = PipelineConfig::new(FrameGeometry::new(width, height)?);
    let pipeline = ParallelPipeline::new(config)?;
    info!(frames = frames.len(), width, height, workers = pipeline.worker_count(), "filtering frames");

    // --- 4. Filtering & Output ---
    let outputs = pipeline.process_batch(frames).await?;
    for (output, input_path) in outputs.iter().zip(&input_paths) {
        let output_path = output_dir.join(output_name(input_path, output.frame_id));
        image_helper::save(&output_path, &output.frame)
            .with_context(|| format!("failed to write {}", output_path.display()))?;
        info!(frame_id = output.frame_id, path = %output_path.display(), "edge map written");
    }
    Ok(())
}

fn load_frame(path: &Path) -> anyhow::Result<RgbImage> {
    let frame = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(frame.to_rgb8())
}

fn output_name(input_path: &Path, frame_id: u64) -> String {
    let stem = input_path.file_stem().and_then(|stem| stem.to_str()).unwrap_or("frame");
    format!("{frame_id:04}_{stem}_edges.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn output_names_keep_order_and_source() {
        assert_eq!(output_name(Path::new("/tmp/clip/shot.jpg"), 3), "0003_shot_edges.png");
        assert_eq!(output_name(Path::new(""), 0), "0000_frame_edges.png");
    }

    #[test]
    fn saved_edge_map_reloads() {
        let path = env::temp_dir().join("frame_tester_saved_edge_map.png");
        let frame = RgbImage::from_fn(6, 4, |x, _| if x < 3 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        image_helper::save(&path, &frame).expect("Error Saving File.");
        assert_eq!(load_frame(&path).unwrap(), frame);
        let _ = std::fs::remove_file(path);
    }
}
