use crate::activation_functions::{ActivationFunction, ReLU, Softmax};
use crate::loss_functions::{CategoricalCrossEntropy, LossFunction};
use crate::parameters::{Gradients, Parameters};
use crate::tensor::{ExecutionMode, Tensor, TensorError};

/// Intermediates of one forward pass. Recomputed every epoch, never cached.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub z1: Tensor,
    pub a1: Tensor,
    pub z2: Tensor,
    pub a2: Tensor,
}

/// Two-layer perceptron: ReLU hidden layer, softmax output layer.
#[derive(Debug, Clone)]
pub struct MLP {
    pub parameters: Parameters,
    pub execution_mode: ExecutionMode,
}

impl MLP {
    pub fn new(parameters: Parameters, execution_mode: ExecutionMode) -> Self {
        MLP { parameters, execution_mode }
    }

    pub fn into_parameters(self) -> Parameters {
        self.parameters
    }

    pub fn forward(&self, input: &Tensor) -> Result<ForwardPass, TensorError> {
        let z1 = self.parameters.hidden.forward(input, self.execution_mode)?;
        let a1 = ReLU.activate(&z1);
        let z2 = self.parameters.output.forward(&a1, self.execution_mode)?;
        let a2 = Softmax.activate(&z2);
        Ok(ForwardPass { z1, a1, z2, a2 })
    }

    /// Mean cross-entropy of the forward pass output against one-hot `target`.
    pub fn loss(&self, target: &Tensor, pass: &ForwardPass) -> Result<f64, TensorError> {
        CategoricalCrossEntropy::forward(&pass.a2, target)
    }

    /// Closed-form gradients of the mean cross-entropy, averaged over the batch.
    pub fn backward(&self, input: &Tensor, target: &Tensor, pass: &ForwardPass) -> Result<Gradients, TensorError> {
        let n = input.rows() as f64;
        let mode = self.execution_mode;

        let dz2 = CategoricalCrossEntropy::backward(&pass.a2, target)?;
        let dw2 = pass.a1.transpose_mul(&dz2, mode)?.map(|g| g / n);
        let db2 = dz2.sum_columns().map(|g| g / n);

        let dz1 = dz2
            .mul_transpose(&self.parameters.output.weights, mode)?
            .hadamard(&ReLU.derivative(&pass.z1))?;
        let dw1 = input.transpose_mul(&dz1, mode)?.map(|g| g / n);
        let db1 = dz1.sum_columns().map(|g| g / n);

        Ok(Gradients { dw1, db1, dw2, db2 })
    }

    pub fn predict_proba(&self, input: &Tensor) -> Result<Tensor, TensorError> {
        Ok(self.forward(input)?.a2)
    }

    /// Most probable class per example.
    pub fn predict(&self, input: &Tensor) -> Result<Vec<usize>, TensorError> {
        Ok(self.predict_proba(input)?.argmax_rows())
    }
}
