//! Conversions between `image` buffers and `[N, C, H, W]` tensors.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use burn::{prelude::*, tensor::TensorData};
use image::{GrayImage, Rgb32FImage};

/// Opens an image file as RGB with components in `[0, 1]`.
pub fn load_image(path: &Path) -> Result<Rgb32FImage> {
    let image =
        image::open(path).with_context(|| format!("failed to open image {}", path.display()))?;
    Ok(image.to_rgb32f())
}

/// Converts an RGB image into a `[1, 3, height, width]` tensor.
pub fn image_to_tensor<B: Backend>(image: &Rgb32FImage, device: &B::Device) -> Tensor<B, 4> {
    let (width, height) = image.dimensions();
    let data = TensorData::new(
        image.as_raw().clone(),
        [height as usize, width as usize, 3],
    );

    Tensor::<B, 3>::from_data(data, device)
        .permute([2, 0, 1])
        .unsqueeze::<4>()
}

/// Renders the first batch element of a `[N, C, H, W]` map as 8-bit grayscale,
/// averaging over channels. Values are expected in `[0, 1]`.
pub fn map_to_image<B: Backend>(map: Tensor<B, 4>) -> Result<GrayImage> {
    let [_, channels, height, width] = map.dims();
    let plane = map
        .slice([0..1, 0..channels, 0..height, 0..width])
        .mean_dim(1)
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("failed to read map values: {e:?}"))?;

    let pixels = plane
        .iter()
        .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    GrayImage::from_raw(width as u32, height as u32, pixels)
        .context("map size does not match its pixel count")
}
