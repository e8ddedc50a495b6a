use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::layer::Layer;
use crate::tensor::{Tensor, TensorError};

pub const INPUT_SIZE: usize = 28 * 28;
pub const HIDDEN_SIZE: usize = 128;
pub const OUTPUT_SIZE: usize = 10;
pub const DEFAULT_SEED: u64 = 42;

/// Widths of the input, hidden and output layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerSizes {
    pub input: usize,
    pub hidden: usize,
    pub output: usize,
}

impl LayerSizes {
    pub fn new(input: usize, hidden: usize, output: usize) -> Self {
        Self { input, hidden, output }
    }
}

impl Default for LayerSizes {
    fn default() -> Self {
        Self::new(INPUT_SIZE, HIDDEN_SIZE, OUTPUT_SIZE)
    }
}

/// The learned state of the network: `W1`, `b1` in `hidden` and `W2`, `b2` in `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub hidden: Layer,
    pub output: Layer,
}

/// Same shapes as the [`Parameters`] they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub dw1: Tensor,
    pub db1: Tensor,
    pub dw2: Tensor,
    pub db2: Tensor,
}

impl Parameters {
    /// Deterministic for a given seed: W1 is drawn first, then W2, from one PCG stream.
    pub fn initialize(input_size: usize, hidden_size: usize, output_size: usize, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let hidden = Layer::new(input_size, hidden_size, &mut rng);
        let output = Layer::new(hidden_size, output_size, &mut rng);
        Self { hidden, output }
    }

    pub fn from_layers(hidden: Layer, output: Layer) -> Result<Self, TensorError> {
        if hidden.outputs() != output.inputs() {
            return Err(TensorError::DimensionMismatch {
                op: "parameters",
                left: hidden.weights.dims(),
                right: output.weights.dims(),
            });
        }
        Ok(Self { hidden, output })
    }

    pub fn input_size(&self) -> usize {
        self.hidden.inputs()
    }

    pub fn output_size(&self) -> usize {
        self.output.outputs()
    }

    /// `θ ← θ - learning_rate · ∇θ` for all four tensors.
    ///
    /// Every shape is checked before anything is written, so a bad gradient
    /// set leaves the parameters untouched.
    pub fn apply_gradients(&mut self, gradients: &Gradients, learning_rate: f64) -> Result<(), TensorError> {
        let pairs = [
            (&self.hidden.weights, &gradients.dw1),
            (&self.hidden.bias, &gradients.db1),
            (&self.output.weights, &gradients.dw2),
            (&self.output.bias, &gradients.db2),
        ];
        for (param, grad) in pairs {
            if param.dims() != grad.dims() {
                return Err(TensorError::DimensionMismatch { op: "apply_gradients", left: param.dims(), right: grad.dims() });
            }
        }

        self.hidden.weights.sub_scaled(&gradients.dw1, learning_rate)?;
        self.hidden.bias.sub_scaled(&gradients.db1, learning_rate)?;
        self.output.weights.sub_scaled(&gradients.dw2, learning_rate)?;
        self.output.bias.sub_scaled(&gradients.db2, learning_rate)?;
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::initialize(INPUT_SIZE, HIDDEN_SIZE, OUTPUT_SIZE, DEFAULT_SEED)
    }
}
