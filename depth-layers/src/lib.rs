//! Building blocks for self-supervised depth estimation networks using Burn.
//!
//! ## Components
//!
//! - **[`ssim`]**: per-pixel SSIM dissimilarity map over a reflected 3x3 window,
//!   the photometric term of a reprojection loss
//! - **[`upsample`]**, **[`Upshuffle`]**, **[`DeconvBlock`]**: nearest, sub-pixel and
//!   transposed-convolution upsampling
//! - **[`Conv1x1`]**, **[`Conv3x3`]**, **[`ConvBlock`]**: fixed-size convolution blocks
//! - **[`DepthDecoder`]**: multi-scale disparity decoder assembled from the blocks above
//!
//! ## Usage Example
//!
//! ```rust
//! use burn::prelude::*;
//! use depth_layers::{ssim, SsimConfig};
//!
//! fn photometric_error<B: Backend>(pred: Tensor<B, 4>, target: Tensor<B, 4>) -> Tensor<B, 1> {
//!     ssim(&SsimConfig::new(), pred, target).mean()
//! }
//! ```
//!
//! Modules follow Burn's pattern: a `*Config` holding hyperparameters with an
//! `init(device)` constructor, and a module exposing `forward`.

mod blocks;
mod decoder;
mod error;
mod ssim;

pub use blocks::*;
pub use decoder::{
    DecoderOutput, DepthDecoder, DepthDecoderConfig, DispHead, DispHeadConfig, NUM_LEVELS,
    RESNET18_CHANNELS,
};
pub use error::{DepthLayersError, DepthLayersResult};
pub use ssim::{ssim, SsimConfig};
