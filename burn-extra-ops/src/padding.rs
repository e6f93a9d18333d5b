//! # Spatial Padding
//!
//! Reflection padding over the two trailing (height, width) dimensions of a tensor.
//! Burn only ships constant padding, so reflection is assembled from narrowed
//! slices and a concatenation.
//!
//! Reflection follows the PyTorch `ReflectionPad2d` convention: the border pixel
//! itself is not repeated, so `[a, b, c]` padded by one becomes `[b, a, b, c, b]`.

use burn::{
    module::{Content, DisplaySettings, ModuleDisplay},
    prelude::*,
};

/// Reflects `tensor` across the borders of its last two dimensions.
///
/// `padding` is `[left, right, top, bottom]`.
///
/// # Panics
///
/// If the tensor has fewer than two dimensions, or if any pad amount is not
/// strictly smaller than the dimension it extends.
pub fn reflection_pad2d<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    padding: [usize; 4],
) -> Tensor<B, D> {
    assert!(D >= 2, "Reflection padding needs at least 2 dimensions, got {D}");
    let [left, right, top, bottom] = padding;

    let tensor = reflect_dim(tensor, D - 2, top, bottom);
    reflect_dim(tensor, D - 1, left, right)
}

fn reflect_dim<B: Backend, const D: usize>(
    tensor: Tensor<B, D>,
    dim: usize,
    before: usize,
    after: usize,
) -> Tensor<B, D> {
    if before == 0 && after == 0 {
        return tensor;
    }

    let size = tensor.dims()[dim];
    assert!(
        before < size && after < size,
        "Reflection padding ({before}, {after}) must be smaller than dimension {dim} of size {size}"
    );

    let mut parts = Vec::with_capacity(before + after + 1);
    for i in (1..=before).rev() {
        parts.push(tensor.clone().narrow(dim, i, 1));
    }
    parts.push(tensor.clone());
    for i in 1..=after {
        parts.push(tensor.clone().narrow(dim, size - 1 - i, 1));
    }

    Tensor::cat(parts, dim)
}

/// Configuration for [ReflectionPad2d].
#[derive(Config, Debug)]
pub struct ReflectionPad2dConfig {
    /// Padding as `[left, right, top, bottom]`.
    pub padding: [usize; 4],
}

impl ReflectionPad2dConfig {
    /// Same padding on all four borders.
    pub fn uniform(padding: usize) -> Self {
        Self::new([padding; 4])
    }

    /// Initializes a [ReflectionPad2d] module.
    pub const fn init(&self) -> ReflectionPad2d {
        let [left, right, top, bottom] = self.padding;
        ReflectionPad2d {
            left,
            right,
            top,
            bottom,
        }
    }
}

/// Reflection padding layer.
#[derive(Module, Clone, Debug)]
#[module(custom_display)]
pub struct ReflectionPad2d {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl ModuleDisplay for ReflectionPad2d {
    fn custom_settings(&self) -> Option<DisplaySettings> {
        DisplaySettings::new()
            .with_new_line_after_attribute(false)
            .optional()
    }

    fn custom_content(&self, content: Content) -> Option<Content> {
        content
            .add("left", &self.left)
            .add("right", &self.right)
            .add("top", &self.top)
            .add("bottom", &self.bottom)
            .optional()
    }
}

impl ReflectionPad2d {
    pub fn forward<B: Backend, const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        reflection_pad2d(input, [self.left, self.right, self.top, self.bottom])
    }
}
