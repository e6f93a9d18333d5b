//! # Upsampling
//!
//! Parameter-free nearest-neighbour upsampling and the learned sub-pixel
//! `Upshuffle` block.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        PaddingConfig2d,
    },
    prelude::*,
    tensor::{
        module::interpolate,
        ops::{InterpolateMode, InterpolateOptions},
    },
};
use burn_extra_ops::{Elu, PixelShuffle, ReflectionPad2d, ReflectionPad2dConfig};

/// Doubles height and width with nearest-neighbour interpolation.
pub fn upsample<B: Backend>(x: Tensor<B, 4>) -> Tensor<B, 4> {
    let [_, _, height, width] = x.dims();
    interpolate(
        x,
        [height * 2, width * 2],
        InterpolateOptions::new(InterpolateMode::Nearest),
    )
}

/// Configuration for the `Upshuffle` module.
#[derive(Config, Debug)]
pub struct UpshuffleConfig {
    /// Channels in and out of the block.
    in_planes: usize,
    /// Spatial scale factor.
    upscale_factor: usize,
}

impl UpshuffleConfig {
    /// Initializes an `Upshuffle` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Upshuffle<B> {
        let factor_squared = self.upscale_factor * self.upscale_factor;
        let conv = Conv2dConfig::new([self.in_planes, self.in_planes * factor_squared], [3, 3])
            .with_stride([1, 1])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);

        Upshuffle {
            pad: ReflectionPad2dConfig::uniform(1).init(),
            conv,
            shuffle: PixelShuffle::new(self.upscale_factor),
            nonlin: Elu::new(),
        }
    }
}

/// Sub-pixel upsampling: reflection pad, 3x3 conv to `r^2` times the channels,
/// pixel shuffle, ELU.
#[derive(Module, Debug)]
pub struct Upshuffle<B: Backend> {
    pad: ReflectionPad2d,
    conv: Conv2d<B>,
    shuffle: PixelShuffle,
    nonlin: Elu,
}

impl<B: Backend> Upshuffle<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.pad.forward(x);
        let x = self.conv.forward(x);
        let x = self.shuffle.forward(x);
        self.nonlin.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use burn::tensor::{Distribution, TensorData};

    use super::*;
    use crate::tests::TestBackend;

    #[test]
    fn upsample_repeats_each_pixel_into_2x2_block() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 4>::from_data(
            TensorData::from([[[[1.0, 2.0], [3.0, 4.0]]]]),
            &device,
        );

        let out = upsample(x);

        assert_eq!(out.dims(), [1, 1, 4, 4]);
        #[rustfmt::skip]
        let expected = vec![
            1.0, 1.0, 2.0, 2.0,
            1.0, 1.0, 2.0, 2.0,
            3.0, 3.0, 4.0, 4.0,
            3.0, 3.0, 4.0, 4.0,
        ];
        assert_eq!(out.into_data().to_vec::<f32>().unwrap(), expected);
    }

    #[test]
    fn upshuffle_scales_spatial_size_and_keeps_channels() {
        let device = Default::default();
        let block = UpshuffleConfig::new(4, 2).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::random([2, 4, 3, 5], Distribution::Default, &device);

        let out = block.forward(x);

        assert_eq!(out.dims(), [2, 4, 6, 10]);
    }

    #[test]
    fn upshuffle_factor_three() {
        let device = Default::default();
        let block = UpshuffleConfig::new(2, 3).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::random([1, 2, 4, 4], Distribution::Default, &device);

        let out = block.forward(x);

        assert_eq!(out.dims(), [1, 2, 12, 12]);
        for value in out.into_data().to_vec::<f32>().unwrap() {
            assert!(value >= -1.0 - 1e-6);
        }
    }
}
