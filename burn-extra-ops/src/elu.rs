//! Exponential Linear Unit activation.

use burn::prelude::*;

/// Applies ELU element-wise: `x` for `x > 0`, `alpha * (exp(x) - 1)` otherwise.
pub fn elu<B: Backend, const D: usize>(input: Tensor<B, D>, alpha: f64) -> Tensor<B, D> {
    // clamp_max keeps exp() finite for large positive inputs
    let negative = input
        .clone()
        .clamp_max(0.0)
        .exp()
        .sub_scalar(1.0)
        .mul_scalar(alpha);

    // One branch per element: the gradient at x = 0 is alpha.
    negative.mask_where(input.clone().greater_elem(0.0), input)
}

/// Configuration for [Elu].
#[derive(Config, Debug)]
pub struct EluConfig {
    #[config(default = 1.0)]
    pub alpha: f64,
}

impl EluConfig {
    /// Initializes an [Elu] module.
    pub const fn init(&self) -> Elu {
        Elu { alpha: self.alpha }
    }
}

/// ELU activation layer.
#[derive(Module, Clone, Debug)]
pub struct Elu {
    pub alpha: f64,
}

impl Default for Elu {
    fn default() -> Self {
        Self::new()
    }
}

impl Elu {
    /// ELU with `alpha = 1.0`.
    pub fn new() -> Self {
        EluConfig::new().init()
    }

    pub fn forward<B: Backend, const D: usize>(&self, input: Tensor<B, D>) -> Tensor<B, D> {
        elu(input, self.alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{ndarray::NdArray, Autodiff},
        tensor::TensorData,
    };

    type TestBackend = NdArray;

    #[test]
    fn elu_matches_reference_values() {
        let device = Default::default();
        let input =
            Tensor::<TestBackend, 1>::from_data(TensorData::from([-2.0, -0.5, 0.0, 1.5]), &device);

        let output = Elu::new().forward(input).into_data().to_vec::<f32>().unwrap();

        let expected = [(-2.0f32).exp() - 1.0, (-0.5f32).exp() - 1.0, 0.0, 1.5];
        for (got, want) in output.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "expected {want}, got {got}");
        }
    }

    #[test]
    fn elu_scales_negative_branch_by_alpha() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 1>::from_data(TensorData::from([-1.0]), &device);

        let output = EluConfig::new()
            .with_alpha(0.5)
            .init()
            .forward(input)
            .into_data()
            .to_vec::<f32>()
            .unwrap();

        let want = 0.5 * ((-1.0f32).exp() - 1.0);
        assert!((output[0] - want).abs() < 1e-6);
    }

    #[test]
    fn elu_is_finite_for_large_inputs() {
        let device = Default::default();
        let input =
            Tensor::<TestBackend, 1>::from_data(TensorData::from([-1000.0, 1000.0]), &device);

        let output = elu(input, 1.0).into_data().to_vec::<f32>().unwrap();

        assert!((output[0] + 1.0).abs() < 1e-6);
        assert_eq!(output[1], 1000.0);
    }

    #[test]
    fn elu_backward_produces_gradients() {
        type AutodiffBackend = Autodiff<NdArray<f32>>;
        let device = Default::default();
        let input = Tensor::<AutodiffBackend, 1>::from_data(TensorData::from([-1.0, 2.0]), &device)
            .require_grad();

        let grads = elu(input.clone(), 1.0).sum().backward();
        let grad = input.grad(&grads).unwrap().into_data().to_vec::<f32>().unwrap();

        assert!((grad[0] - (-1.0f32).exp()).abs() < 1e-5);
        assert!((grad[1] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn elu_gradient_at_zero_is_alpha() {
        type AutodiffBackend = Autodiff<NdArray<f32>>;
        let device = Default::default();

        for alpha in [1.0, 0.5] {
            let input =
                Tensor::<AutodiffBackend, 1>::from_data(TensorData::from([0.0, 0.0]), &device)
                    .require_grad();

            let grads = elu(input.clone(), alpha).sum().backward();
            let grad = input.grad(&grads).unwrap().into_data().to_vec::<f32>().unwrap();

            for value in grad {
                assert!(
                    (f64::from(value) - alpha).abs() < 1e-6,
                    "expected {alpha}, got {value}"
                );
            }
        }
    }
}
