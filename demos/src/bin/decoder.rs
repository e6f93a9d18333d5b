//! Depth Decoder Example
//!
//! Builds a `DepthDecoder` and runs it over a random encoder feature pyramid
//! sized for the given input resolution, logging the disparity maps it emits.
//!
//! ## Usage
//!
//! ```bash
//! # ResNet-18 encoder channels, 640x192 input
//! cargo run --bin decoder
//!
//! # Custom decoder configuration
//! cargo run --bin decoder -- --config decoder.json --height 320 --width 1024
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use burn::{
    config::Config,
    prelude::*,
    tensor::{cast::ToElement, Distribution},
};
use clap::Parser;
use depth_layers::{DepthDecoderConfig, NUM_LEVELS, RESNET18_CHANNELS};
use depth_layers_demos::{create_device, init_tracing, SelectedBackend};

/// Total downsampling between the input image and the coarsest feature.
const MAX_STRIDE: usize = 1 << NUM_LEVELS;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with a decoder configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input image height
    #[arg(long, default_value = "192")]
    height: usize,

    /// Input image width
    #[arg(long, default_value = "640")]
    width: usize,

    /// Batch size
    #[arg(long, default_value = "1")]
    batch: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    // Reflection padding at the coarsest level needs at least 2x2 features.
    for (name, size) in [("height", args.height), ("width", args.width)] {
        if size % MAX_STRIDE != 0 || size / MAX_STRIDE < 2 {
            bail!(
                "{name} {size} must be a multiple of {MAX_STRIDE} and at least {}",
                2 * MAX_STRIDE
            );
        }
    }

    let config = match &args.config {
        Some(path) => DepthDecoderConfig::load(path)
            .map_err(|e| anyhow!("failed to load decoder config {}: {e:?}", path.display()))?,
        None => DepthDecoderConfig::new(RESNET18_CHANNELS.to_vec()),
    };

    let device = create_device();
    let decoder = config.init::<SelectedBackend>(&device)?;

    let features: Vec<Tensor<SelectedBackend, 4>> = config
        .num_ch_enc
        .iter()
        .enumerate()
        .map(|(i, &channels)| {
            let stride = 2 << i;
            Tensor::random(
                [args.batch, channels, args.height / stride, args.width / stride],
                Distribution::Default,
                &device,
            )
        })
        .collect();

    let output = decoder.forward(&features)?;

    for (scale, disp) in output.into_vec() {
        let shape = disp.dims();
        let min = disp.clone().min().into_scalar().to_f64();
        let max = disp.max().into_scalar().to_f64();
        tracing::info!(scale, ?shape, min, max, "disparity");
    }

    Ok(())
}
