use rand::Rng;

use crate::tensor::{ExecutionMode, Tensor, TensorError};

/// Scale applied to the standard normal weight draws.
pub const WEIGHT_SCALE: f64 = 0.01;

/// Fully connected affine layer, `X · W + b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub weights: Tensor,
    pub bias: Tensor,
}

impl Layer {
    /// Weights ~ N(0, 1) * 0.01, zero bias.
    pub fn new<R: Rng + ?Sized>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        Self {
            weights: Tensor::random_normal(inputs, outputs, WEIGHT_SCALE, rng),
            bias: Tensor::zeros(1, outputs),
        }
    }

    pub fn from_parts(weights: Tensor, bias: Tensor) -> Result<Self, TensorError> {
        if bias.rows() != 1 || bias.cols() != weights.cols() {
            return Err(TensorError::DimensionMismatch { op: "layer", left: weights.dims(), right: bias.dims() });
        }
        Ok(Self { weights, bias })
    }

    pub fn inputs(&self) -> usize {
        self.weights.rows()
    }

    pub fn outputs(&self) -> usize {
        self.weights.cols()
    }

    pub fn forward(&self, input: &Tensor, execution_mode: ExecutionMode) -> Result<Tensor, TensorError> {
        input.mul(&self.weights, execution_mode)?.add_row(&self.bias)
    }
}
