//! # Pixel Shuffle
//!
//! Rearranges `[B, C * r^2, H, W]` into `[B, C, H * r, W * r]`, moving channel depth
//! into spatial resolution for sub-pixel upsampling. Element order matches
//! PyTorch's `PixelShuffle`.

use burn::prelude::*;

/// Applies pixel shuffle with the given upscale factor.
///
/// # Panics
///
/// If the channel count is not divisible by `upscale_factor^2`.
pub fn pixel_shuffle<B: Backend>(input: Tensor<B, 4>, upscale_factor: usize) -> Tensor<B, 4> {
    let [batch_size, channels, height, width] = input.dims();
    let factor = upscale_factor;
    let factor_squared = factor * factor;

    assert!(
        factor > 0 && channels % factor_squared == 0,
        "Pixel shuffle needs channels ({channels}) divisible by upscale_factor² ({factor_squared})"
    );

    let out_channels = channels / factor_squared;

    // [B, C, r, r, H, W] -> [B, C, H, r, W, r]
    input
        .reshape([batch_size, out_channels, factor, factor, height, width])
        .permute([0, 1, 4, 2, 5, 3])
        .reshape([batch_size, out_channels, height * factor, width * factor])
}

/// Pixel shuffle layer.
#[derive(Module, Clone, Debug)]
pub struct PixelShuffle {
    pub upscale_factor: usize,
}

impl PixelShuffle {
    pub const fn new(upscale_factor: usize) -> Self {
        Self { upscale_factor }
    }

    pub fn forward<B: Backend>(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        pixel_shuffle(input, self.upscale_factor)
    }
}
