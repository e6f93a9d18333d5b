//! SSIM Map Example
//!
//! Computes the per-pixel SSIM dissimilarity between two images of the same size,
//! prints the mean and optionally writes the map as a grayscale image
//! (black = identical, white = dissimilar).
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin ssim_map -- reference.png candidate.png
//! cargo run --bin ssim_map -- reference.png candidate.png --output map.png
//! cargo run --bin ssim_map -- reference.png candidate.png --config ssim.json
//! ```

use std::{path::PathBuf, time::Instant};

use anyhow::{anyhow, bail, Context, Result};
use burn::{config::Config, tensor::cast::ToElement};
use clap::Parser;
use depth_layers::{ssim, SsimConfig};
use depth_layers_demos::{
    create_device, image_to_tensor, init_tracing, load_image, map_to_image, SelectedBackend,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reference image
    reference: PathBuf,

    /// Image compared against the reference
    candidate: PathBuf,

    /// Where to write the dissimilarity map
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with an SSIM configuration (window size, c1, c2)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SsimConfig::load(path)
            .map_err(|e| anyhow!("failed to load SSIM config {}: {e:?}", path.display()))?,
        None => SsimConfig::new(),
    };
    config.validate()?;

    let device = create_device();

    let reference = load_image(&args.reference)?;
    let candidate = load_image(&args.candidate)?;
    if reference.dimensions() != candidate.dimensions() {
        bail!(
            "image sizes differ: {:?} vs {:?}",
            reference.dimensions(),
            candidate.dimensions()
        );
    }
    let (width, height) = reference.dimensions();
    config
        .validate_size(height as usize, width as usize)
        .with_context(|| format!("images of {width}x{height} are too small"))?;
    tracing::info!(width, height, window_size = config.window_size, "comparing images");

    let start = Instant::now();
    let x = image_to_tensor::<SelectedBackend>(&reference, &device);
    let y = image_to_tensor::<SelectedBackend>(&candidate, &device);
    let map = ssim(&config, x, y);
    let mean = map.clone().mean().into_scalar().to_f64();
    tracing::info!(
        mean_dissimilarity = mean,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "computed SSIM map"
    );
    println!("{mean:.6}");

    if let Some(output) = &args.output {
        map_to_image(map)?
            .save(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        tracing::info!(path = %output.display(), "saved dissimilarity map");
    }

    Ok(())
}
