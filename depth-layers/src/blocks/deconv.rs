use burn::{
    nn::conv::{ConvTranspose2d, ConvTranspose2dConfig},
    prelude::*,
};
use burn_extra_ops::{Elu, ReflectionPad2d, ReflectionPad2dConfig};

/// Configuration for the `DeconvBlock` module.
#[derive(Config, Debug)]
pub struct DeconvBlockConfig {
    in_channels: usize,
    out_channels: usize,
}

impl DeconvBlockConfig {
    /// Initializes a `DeconvBlock` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> DeconvBlock<B> {
        let conv = ConvTranspose2dConfig::new([self.in_channels, self.out_channels], [3, 3])
            .with_stride([2, 2])
            .with_padding([1, 1])
            .with_padding_out([0, 0])
            .init(device);
        // The transposed conv yields 2H - 1; one reflected row/column restores 2H.
        let pad = ReflectionPad2dConfig::new([0, 1, 0, 1]).init();

        DeconvBlock {
            conv,
            pad,
            nonlin: Elu::new(),
        }
    }
}

/// Learned 2x upsampling: stride-2 transposed convolution, reflection pad, ELU.
///
/// Input height and width must be at least 2.
#[derive(Module, Debug)]
pub struct DeconvBlock<B: Backend> {
    conv: ConvTranspose2d<B>,
    pad: ReflectionPad2d,
    nonlin: Elu,
}

impl<B: Backend> DeconvBlock<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let out = self.conv.forward(x);
        let out = self.pad.forward(out);
        self.nonlin.forward(out)
    }
}
