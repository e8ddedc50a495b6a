use crate::tensor::{Tensor, TensorError};

pub trait LossFunction {

    fn forward(predicted: &Tensor, target: &Tensor) -> Result<f64, TensorError>;
    fn backward(predicted: &Tensor, target: &Tensor) -> Result<Tensor, TensorError>;

}

pub struct CategoricalCrossEntropy;

impl CategoricalCrossEntropy {
    /// Added inside the log to keep `ln(0)` finite.
    pub const EPSILON: f64 = 1e-8;
}

impl LossFunction for CategoricalCrossEntropy {

    // -sum(y * ln(y_hat + eps)) / N
    fn forward(predicted: &Tensor, target: &Tensor) -> Result<f64, TensorError> {
        let log_likelihood = target.hadamard(&predicted.map(|p| (p + Self::EPSILON).ln()))?;
        Ok(-log_likelihood.sum() / predicted.rows() as f64)
    }

    // softmax - y; the 1/N averaging happens when the weight gradients are formed
    fn backward(predicted: &Tensor, target: &Tensor) -> Result<Tensor, TensorError> {
        predicted.checked_sub(target)
    }

}
