//! Additional operations for the Burn deep learning framework
//!
//! This crate provides operations that are commonly used in image networks but are not
//! yet available in the core Burn framework: reflection padding, pixel shuffle and the
//! ELU activation.

use burn::prelude::*;

mod elu;
mod padding;
mod pixel_shuffle;

// Convenient re-exports
pub use elu::{elu, Elu, EluConfig};
pub use padding::{reflection_pad2d, ReflectionPad2d, ReflectionPad2dConfig};
pub use pixel_shuffle::{pixel_shuffle, PixelShuffle};

/// Additional operations for Burn image tensors
pub trait TensorExtraOps<B: Backend> {
    /// Reflect-pad height and width by `[left, right, top, bottom]`
    fn reflection_pad2d(self, padding: [usize; 4]) -> Self;

    /// Move channel depth into spatial resolution
    fn pixel_shuffle(self, upscale_factor: usize) -> Self;

    /// Apply the ELU activation
    fn elu(self, alpha: f64) -> Self;
}

impl<B: Backend> TensorExtraOps<B> for Tensor<B, 4> {
    fn reflection_pad2d(self, padding: [usize; 4]) -> Self {
        reflection_pad2d(self, padding)
    }

    fn pixel_shuffle(self, upscale_factor: usize) -> Self {
        pixel_shuffle(self, upscale_factor)
    }

    fn elu(self, alpha: f64) -> Self {
        elu(self, alpha)
    }
}
