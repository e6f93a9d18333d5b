//! SSIM (Structural Similarity Index) dissimilarity map.
//!
//! Compares two images through local statistics over a small box window and
//! returns a per-pixel dissimilarity in `[0, 1]`:
//! ```text
//! SSIM = (2*μx*μy + C₁)(2*σxy + C₂) / ((μx² + μy² + C₁)(σx² + σy² + C₂))
//! D    = clamp((1 - SSIM) / 2, 0, 1)
//! ```
//! Both inputs are reflection padded by half the window first, so the map has
//! the same height and width as the inputs.

use burn::{
    nn::{pool::AvgPool2dConfig, PaddingConfig2d},
    prelude::*,
};
use burn_extra_ops::reflection_pad2d;

use crate::error::{DepthLayersError, DepthLayersResult};

/// Configuration for [ssim].
#[derive(Config, Debug)]
pub struct SsimConfig {
    /// Side of the square averaging window. Default: 3
    #[config(default = 3)]
    pub window_size: usize,

    /// Luminance stability constant. Default: 0.01²
    #[config(default = 0.0001)]
    pub c1: f64,

    /// Contrast stability constant. Default: 0.03²
    #[config(default = 0.0009)]
    pub c2: f64,
}

impl SsimConfig {
    /// Check that the window is odd and the constants are positive.
    pub fn validate(&self) -> DepthLayersResult<()> {
        if self.window_size == 0 || self.window_size % 2 == 0 {
            return Err(DepthLayersError::InvalidConfiguration {
                reason: format!(
                    "SSIM window size must be positive and odd, got {}",
                    self.window_size
                ),
            });
        }
        if self.c1 <= 0.0 || self.c2 <= 0.0 {
            return Err(DepthLayersError::InvalidConfiguration {
                reason: format!(
                    "SSIM constants must be positive, got c1={} c2={}",
                    self.c1, self.c2
                ),
            });
        }
        Ok(())
    }

    /// Check that a `height` x `width` image is large enough to be reflection
    /// padded by half the window.
    pub fn validate_size(&self, height: usize, width: usize) -> DepthLayersResult<()> {
        let pad = self.window_size / 2;
        if height <= pad || width <= pad {
            return Err(DepthLayersError::InvalidTensorShape {
                expected: format!("height and width above {pad}"),
                actual: format!("{height}x{width}"),
            });
        }
        Ok(())
    }
}

/// Computes the SSIM dissimilarity map between `x` and `y`.
///
/// # Shapes
///
/// - x: `[batch_size, channels, height, width]`
/// - y: `[batch_size, channels, height, width]`
/// - output: `[batch_size, channels, height, width]`
///
/// The inputs must share a shape; height and width must be larger than
/// `window_size / 2` so the reflection padding is defined (see
/// [SsimConfig::validate_size]).
pub fn ssim<B: Backend>(config: &SsimConfig, x: Tensor<B, 4>, y: Tensor<B, 4>) -> Tensor<B, 4> {
    let pad = config.window_size / 2;
    let x = reflection_pad2d(x, [pad; 4]);
    let y = reflection_pad2d(y, [pad; 4]);

    let pool = AvgPool2dConfig::new([config.window_size, config.window_size])
        .with_strides([1, 1])
        .with_padding(PaddingConfig2d::Valid)
        .init();

    let mu_x = pool.forward(x.clone());
    let mu_y = pool.forward(y.clone());

    let mu_x_sq = mu_x.clone().powi_scalar(2);
    let mu_y_sq = mu_y.clone().powi_scalar(2);
    let mu_xy = mu_x * mu_y;

    let sigma_x = pool.forward(x.clone().powi_scalar(2)) - mu_x_sq.clone();
    let sigma_y = pool.forward(y.clone().powi_scalar(2)) - mu_y_sq.clone();
    let sigma_xy = pool.forward(x * y) - mu_xy.clone();

    let ssim_n = mu_xy.mul_scalar(2.0).add_scalar(config.c1)
        * sigma_xy.mul_scalar(2.0).add_scalar(config.c2);
    let ssim_d =
        (mu_x_sq + mu_y_sq).add_scalar(config.c1) * (sigma_x + sigma_y).add_scalar(config.c2);

    (ssim_n / ssim_d)
        .neg()
        .add_scalar(1.0)
        .div_scalar(2.0)
        .clamp(0.0, 1.0)
}
