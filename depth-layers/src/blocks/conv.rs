//! # Convolution Blocks
//!
//! Fixed-size convolutions used throughout the decoder. `Conv3x3` pads by one
//! pixel (reflection by default) so the spatial size is preserved, then applies
//! batch norm and a leaky ReLU. `ConvBlock` adds an ELU on top of it.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, LeakyRelu, LeakyReluConfig, PaddingConfig2d,
    },
    prelude::*,
};
use burn_extra_ops::{Elu, ReflectionPad2d, ReflectionPad2dConfig};

/// Configuration for the `Conv1x1` module.
#[derive(Config, Debug)]
pub struct Conv1x1Config {
    in_channels: usize,
    out_channels: usize,
    #[config(default = "false")]
    bias: bool,
}

impl Conv1x1Config {
    /// Initializes a `Conv1x1` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Conv1x1<B> {
        let conv = Conv2dConfig::new([self.in_channels, self.out_channels], [1, 1])
            .with_stride([1, 1])
            .with_bias(self.bias)
            .init(device);

        Conv1x1 { conv }
    }
}

/// Pointwise convolution.
#[derive(Module, Debug)]
pub struct Conv1x1<B: Backend> {
    conv: Conv2d<B>,
}

impl<B: Backend> Conv1x1<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.conv.forward(x)
    }
}

/// Configuration for the `Conv3x3` module.
#[derive(Config, Debug)]
pub struct Conv3x3Config {
    /// Number of input channels.
    in_channels: usize,
    /// Number of output channels.
    out_channels: usize,
    /// Reflection padding when true, zero padding otherwise.
    #[config(default = "true")]
    use_refl: bool,
}

impl Conv3x3Config {
    /// Initializes a `Conv3x3` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> Conv3x3<B> {
        // Zero padding folds into the convolution itself.
        let (pad, conv_padding) = if self.use_refl {
            (
                Some(ReflectionPad2dConfig::uniform(1).init()),
                PaddingConfig2d::Valid,
            )
        } else {
            (None, PaddingConfig2d::Explicit(1, 1))
        };

        let conv = Conv2dConfig::new([self.in_channels, self.out_channels], [3, 3])
            .with_padding(conv_padding)
            .init(device);
        let bn = BatchNormConfig::new(self.out_channels).init(device);
        let nonlin = LeakyReluConfig::new().init();

        Conv3x3 {
            pad,
            conv,
            bn,
            nonlin,
        }
    }
}

/// Padded 3x3 convolution followed by batch norm and leaky ReLU.
#[derive(Module, Debug)]
pub struct Conv3x3<B: Backend> {
    pad: Option<ReflectionPad2d>,
    conv: Conv2d<B>,
    bn: BatchNorm<B, 2>,
    nonlin: LeakyRelu,
}

impl<B: Backend> Conv3x3<B> {
    /// Number of channels the block expects.
    pub fn in_channels(&self) -> usize {
        self.conv.weight.val().dims()[1]
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = match &self.pad {
            Some(pad) => pad.forward(x),
            None => x,
        };
        let x = self.conv.forward(x);
        let x = self.bn.forward(x);

        self.nonlin.forward(x)
    }
}

/// Configuration for the `ConvBlock` module.
#[derive(Config, Debug)]
pub struct ConvBlockConfig {
    in_channels: usize,
    out_channels: usize,
}

impl ConvBlockConfig {
    /// Initializes a `ConvBlock` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> ConvBlock<B> {
        let conv = Conv3x3Config::new(self.in_channels, self.out_channels).init(device);

        ConvBlock {
            conv,
            nonlin: Elu::new(),
        }
    }
}

/// `Conv3x3` followed by ELU.
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv3x3<B>,
    nonlin: Elu,
}

impl<B: Backend> ConvBlock<B> {
    pub fn in_channels(&self) -> usize {
        self.conv.in_channels()
    }

    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let out = self.conv.forward(x);
        self.nonlin.forward(out)
    }
}
