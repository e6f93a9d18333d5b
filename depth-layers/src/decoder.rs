//! # Depth Decoder
//!
//! Composes the convolution blocks into a multi-scale disparity decoder. Starting
//! from the coarsest encoder feature, every level refines, upsamples by two,
//! optionally concatenates the next finer encoder feature as a skip connection,
//! and refines again. Selected levels emit a sigmoid disparity map.

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::sigmoid,
};
use burn_extra_ops::{ReflectionPad2d, ReflectionPad2dConfig};

use crate::blocks::{upsample, ConvBlock, ConvBlockConfig};
use crate::error::{DepthLayersError, DepthLayersResult};

/// Number of pyramid levels the decoder consumes.
pub const NUM_LEVELS: usize = 5;

/// Encoder channel counts of a ResNet-18/34 feature pyramid.
pub const RESNET18_CHANNELS: [usize; NUM_LEVELS] = [64, 64, 128, 256, 512];

/// Configuration for the `DepthDecoder` module.
#[derive(Config, Debug)]
pub struct DepthDecoderConfig {
    /// Channels of the five encoder features, finest first.
    pub num_ch_enc: Vec<usize>,
    /// Channels of the five decoder levels, finest first.
    #[config(default = "vec![16, 32, 64, 128, 256]")]
    pub num_ch_dec: Vec<usize>,
    /// Levels that produce a disparity map (0 is the finest).
    #[config(default = "vec![0, 1, 2, 3]")]
    pub scales: Vec<usize>,
    /// Channels of each disparity map.
    #[config(default = 1)]
    pub num_output_channels: usize,
    /// Concatenate encoder features after each upsampling step.
    #[config(default = true)]
    pub use_skips: bool,
}

impl DepthDecoderConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for channel lists that are not five long,
    /// zero channel counts, or scales outside the pyramid.
    pub fn validate(&self) -> DepthLayersResult<()> {
        for (name, channels) in [("num_ch_enc", &self.num_ch_enc), ("num_ch_dec", &self.num_ch_dec)]
        {
            if channels.len() != NUM_LEVELS {
                return Err(DepthLayersError::InvalidConfiguration {
                    reason: format!(
                        "{name} must have {NUM_LEVELS} entries, got {}",
                        channels.len()
                    ),
                });
            }
            if channels.contains(&0) {
                return Err(DepthLayersError::InvalidConfiguration {
                    reason: format!("{name} must not contain zero channels: {channels:?}"),
                });
            }
        }

        if self.scales.is_empty() {
            return Err(DepthLayersError::InvalidConfiguration {
                reason: "At least one output scale is required".to_string(),
            });
        }
        if let Some(scale) = self.scales.iter().find(|&&s| s >= NUM_LEVELS) {
            return Err(DepthLayersError::InvalidConfiguration {
                reason: format!("Scale {scale} is outside 0..{NUM_LEVELS}"),
            });
        }

        if self.num_output_channels == 0 {
            return Err(DepthLayersError::InvalidConfiguration {
                reason: "Output channels must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Initializes a new `DepthDecoder` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> DepthLayersResult<DepthDecoder<B>> {
        self.validate()?;
        tracing::debug!(
            num_ch_enc = ?self.num_ch_enc,
            num_ch_dec = ?self.num_ch_dec,
            scales = ?self.scales,
            use_skips = self.use_skips,
            "building depth decoder"
        );

        let mut upconvs_0 = Vec::with_capacity(NUM_LEVELS);
        let mut upconvs_1 = Vec::with_capacity(NUM_LEVELS);
        let mut dispconvs = Vec::with_capacity(NUM_LEVELS);

        for i in 0..NUM_LEVELS {
            let num_ch_in = if i == NUM_LEVELS - 1 {
                self.num_ch_enc[NUM_LEVELS - 1]
            } else {
                self.num_ch_dec[i + 1]
            };
            upconvs_0.push(ConvBlockConfig::new(num_ch_in, self.num_ch_dec[i]).init(device));

            let mut num_ch_in = self.num_ch_dec[i];
            if self.use_skips && i > 0 {
                num_ch_in += self.num_ch_enc[i - 1];
            }
            upconvs_1.push(ConvBlockConfig::new(num_ch_in, self.num_ch_dec[i]).init(device));

            dispconvs.push(self.scales.contains(&i).then(|| {
                DispHeadConfig::new(self.num_ch_dec[i], self.num_output_channels).init(device)
            }));
        }

        Ok(DepthDecoder {
            upconvs_0,
            upconvs_1,
            dispconvs,
            use_skips: self.use_skips,
        })
    }
}

/// Configuration for the `DispHead` module.
#[derive(Config, Debug)]
pub struct DispHeadConfig {
    in_channels: usize,
    out_channels: usize,
}

impl DispHeadConfig {
    /// Initializes a `DispHead` module.
    pub fn init<B: Backend>(&self, device: &Device<B>) -> DispHead<B> {
        let conv = Conv2dConfig::new([self.in_channels, self.out_channels], [3, 3])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);

        DispHead {
            pad: ReflectionPad2dConfig::uniform(1).init(),
            conv,
        }
    }
}

/// Reflection-padded 3x3 convolution followed by a sigmoid.
///
/// Unlike `Conv3x3` there is no batch norm or leaky ReLU before the sigmoid,
/// so the output covers the whole of (0, 1).
#[derive(Module, Debug)]
pub struct DispHead<B: Backend> {
    pad: ReflectionPad2d,
    conv: Conv2d<B>,
}

impl<B: Backend> DispHead<B> {
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        sigmoid(self.conv.forward(self.pad.forward(x)))
    }
}

/// Multi-scale disparity decoder.
#[derive(Module, Debug)]
pub struct DepthDecoder<B: Backend> {
    upconvs_0: Vec<ConvBlock<B>>,
    upconvs_1: Vec<ConvBlock<B>>,
    dispconvs: Vec<Option<DispHead<B>>>,
    use_skips: bool,
}

/// Disparity maps produced by a `DepthDecoder`, coarsest first.
#[derive(Debug, Clone)]
pub struct DecoderOutput<B: Backend> {
    disparities: Vec<(usize, Tensor<B, 4>)>,
}

impl<B: Backend> DecoderOutput<B> {
    /// The disparity map at `scale`, if that scale was configured.
    pub fn disp(&self, scale: usize) -> Option<&Tensor<B, 4>> {
        self.disparities
            .iter()
            .find(|(s, _)| *s == scale)
            .map(|(_, disp)| disp)
    }

    /// Configured scales in the order they were produced.
    pub fn scales(&self) -> impl Iterator<Item = usize> + '_ {
        self.disparities.iter().map(|(s, _)| *s)
    }

    pub fn into_vec(self) -> Vec<(usize, Tensor<B, 4>)> {
        self.disparities
    }
}

impl<B: Backend> DepthDecoder<B> {
    /// Decodes an encoder feature pyramid.
    ///
    /// # Shapes
    ///
    /// - features: five tensors `[batch, num_ch_enc[i], h_i, w_i]`, finest first, each
    ///   level half the height and width of the previous; the coarsest must be at
    ///   least 2x2
    /// - output at scale `s`: `[batch, num_output_channels, 2 * h_s, 2 * w_s]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidTensorShape` if the feature count, a channel count, or a skip
    /// connection's spatial size does not match the configuration, or if the
    /// coarsest feature is smaller than 2x2.
    pub fn forward(&self, features: &[Tensor<B, 4>]) -> DepthLayersResult<DecoderOutput<B>> {
        if features.len() != NUM_LEVELS {
            return Err(DepthLayersError::InvalidTensorShape {
                expected: format!("{NUM_LEVELS} encoder features"),
                actual: format!("{} encoder features", features.len()),
            });
        }

        let [_, _, height, width] = features[NUM_LEVELS - 1].dims();
        if height < 2 || width < 2 {
            return Err(DepthLayersError::InvalidTensorShape {
                expected: "coarsest feature of at least 2x2".to_string(),
                actual: format!("{:?}", features[NUM_LEVELS - 1].dims()),
            });
        }

        let mut disparities = Vec::new();
        let mut x = features[NUM_LEVELS - 1].clone();

        for i in (0..NUM_LEVELS).rev() {
            check_channels(&x, self.upconvs_0[i].in_channels())?;
            x = upsample(self.upconvs_0[i].forward(x));

            if self.use_skips && i > 0 {
                let skip = &features[i - 1];
                let [batch, _, height, width] = x.dims();
                let [skip_batch, _, skip_height, skip_width] = skip.dims();
                if (batch, height, width) != (skip_batch, skip_height, skip_width) {
                    return Err(DepthLayersError::InvalidTensorShape {
                        expected: format!("[{batch}, _, {height}, {width}]"),
                        actual: format!("{:?}", skip.dims()),
                    });
                }
                x = Tensor::cat(vec![x, skip.clone()], 1);
            }

            check_channels(&x, self.upconvs_1[i].in_channels())?;
            x = self.upconvs_1[i].forward(x);

            if let Some(dispconv) = &self.dispconvs[i] {
                disparities.push((i, dispconv.forward(x.clone())));
            }
        }

        Ok(DecoderOutput { disparities })
    }
}

fn check_channels<B: Backend>(x: &Tensor<B, 4>, expected: usize) -> DepthLayersResult<()> {
    let dims = x.dims();
    if dims[1] != expected {
        return Err(DepthLayersError::InvalidTensorShape {
            expected: format!("[_, {expected}, _, _]"),
            actual: format!("{dims:?}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use burn::tensor::{cast::ToElement, Distribution};

    use super::*;
    use crate::tests::TestBackend;

    const ENC: [usize; NUM_LEVELS] = [4, 4, 8, 8, 16];
    const DEC: [usize; NUM_LEVELS] = [2, 2, 4, 4, 8];

    fn small_config() -> DepthDecoderConfig {
        DepthDecoderConfig::new(ENC.to_vec()).with_num_ch_dec(DEC.to_vec())
    }

    /// Pyramid for a `size` x `size` input image: level i is size / 2^(i+1).
    /// `size` must be at least 64 so the coarsest level is 2x2.
    fn pyramid(batch: usize, size: usize) -> Vec<Tensor<TestBackend, 4>> {
        let device = Default::default();
        ENC.iter()
            .enumerate()
            .map(|(i, &channels)| {
                let side = size >> (i + 1);
                Tensor::random([batch, channels, side, side], Distribution::Default, &device)
            })
            .collect()
    }

    #[test]
    fn decoder_default_config() {
        let config = DepthDecoderConfig::new(RESNET18_CHANNELS.to_vec());

        assert_eq!(config.num_ch_dec, vec![16, 32, 64, 128, 256]);
        assert_eq!(config.scales, vec![0, 1, 2, 3]);
        assert_eq!(config.num_output_channels, 1);
        assert!(config.use_skips);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn decoder_emits_disparities_per_scale() {
        let device = Default::default();
        let decoder = small_config().init::<TestBackend>(&device).unwrap();

        let output = decoder.forward(&pyramid(2, 64)).unwrap();

        assert_eq!(output.scales().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
        for scale in 0..4 {
            let side = 64 >> scale;
            let disp = output.disp(scale).unwrap();
            assert_eq!(disp.dims(), [2, 1, side, side]);
        }
        assert!(output.disp(4).is_none());
    }

    #[test]
    fn decoder_disparities_are_in_unit_interval() {
        let device = Default::default();
        let decoder = small_config()
            .with_scales(vec![0])
            .with_num_output_channels(2)
            .init::<TestBackend>(&device)
            .unwrap();

        let output = decoder.forward(&pyramid(1, 64)).unwrap();
        let disp = output.disp(0).unwrap().clone();

        assert_eq!(disp.dims(), [1, 2, 64, 64]);
        assert!(disp.clone().min().into_scalar().to_f64() > 0.0);
        assert!(disp.max().into_scalar().to_f64() < 1.0);
    }

    #[test]
    fn decoder_without_skips_ignores_finer_features() {
        let device = Default::default();
        let decoder = small_config()
            .with_use_skips(false)
            .init::<TestBackend>(&device)
            .unwrap();

        let output = decoder.forward(&pyramid(1, 64)).unwrap();

        assert_eq!(output.into_vec().len(), 4);
    }

    #[test]
    fn decoder_rejects_wrong_feature_count() {
        let device = Default::default();
        let decoder = small_config().init::<TestBackend>(&device).unwrap();
        let mut features = pyramid(1, 64);
        features.pop();

        match decoder.forward(&features) {
            Err(DepthLayersError::InvalidTensorShape { expected, .. }) => {
                assert!(expected.contains("5 encoder features"));
            }
            other => panic!("Expected InvalidTensorShape error, got {other:?}"),
        }
    }

    #[test]
    fn decoder_rejects_wrong_channel_count() {
        let device = Default::default();
        let decoder = small_config().init::<TestBackend>(&device).unwrap();
        let mut features = pyramid(1, 64);
        features[4] = Tensor::zeros([1, 3, 2, 2], &Default::default());

        assert!(matches!(
            decoder.forward(&features),
            Err(DepthLayersError::InvalidTensorShape { .. })
        ));
    }

    #[test]
    fn decoder_rejects_mismatched_skip_size() {
        let device = Default::default();
        let decoder = small_config().init::<TestBackend>(&device).unwrap();
        let mut features = pyramid(1, 64);
        features[2] = Tensor::zeros([1, 8, 3, 3], &Default::default());

        assert!(matches!(
            decoder.forward(&features),
            Err(DepthLayersError::InvalidTensorShape { .. })
        ));
    }

    #[test]
    fn decoder_rejects_coarsest_feature_below_2x2() {
        let device = Default::default();
        let decoder = small_config().init::<TestBackend>(&device).unwrap();

        // A 32x32 image leaves a 1x1 coarsest level.
        match decoder.forward(&pyramid(1, 32)) {
            Err(DepthLayersError::InvalidTensorShape { expected, actual }) => {
                assert!(expected.contains("2x2"));
                assert!(actual.contains("1, 1]"));
            }
            other => panic!("Expected InvalidTensorShape error, got {other:?}"),
        }
    }

    #[test]
    fn disp_head_spans_the_unit_interval() {
        let device = Default::default();
        let head = DispHeadConfig::new(4, 1).init::<TestBackend>(&device);
        let x = Tensor::<TestBackend, 4>::random(
            [2, 4, 8, 8],
            Distribution::Normal(0.0, 5.0),
            &device,
        );

        let disp = head.forward(x);

        assert_eq!(disp.dims(), [2, 1, 8, 8]);
        let min = disp.clone().min().into_scalar().to_f64();
        let max = disp.max().into_scalar().to_f64();
        assert!(min < 0.4, "disparities should reach the lower half, min {min}");
        assert!(max > 0.6, "disparities should reach the upper half, max {max}");
        assert!(min > 0.0 && max < 1.0);
    }

    #[test]
    fn decoder_config_validation_errors() {
        let short = DepthDecoderConfig::new(vec![64, 64, 128]);
        match short.validate() {
            Err(DepthLayersError::InvalidConfiguration { reason }) => {
                assert!(reason.contains("num_ch_enc must have 5 entries"));
            }
            _ => panic!("Expected InvalidConfiguration error"),
        }

        let bad_scale = small_config().with_scales(vec![0, 5]);
        assert!(bad_scale.validate().is_err());

        let no_scales = small_config().with_scales(vec![]);
        assert!(no_scales.validate().is_err());

        let zero_dec = small_config().with_num_ch_dec(vec![0, 2, 4, 4, 8]);
        assert!(zero_dec.validate().is_err());

        let device = Default::default();
        assert!(short.init::<TestBackend>(&device).is_err());
    }
}
