mod basic_ops;
mod matmul;
mod tensor_2d;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

pub use crate::error::TensorError;
pub use matmul::ExecutionMode;

/// Dense row-major 2-D matrix of `f64`.
///
/// The shape is fixed when the tensor is built and every binary operation
/// checks it; nothing is ever broadcast or reshaped implicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Tensor {

    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Tensor, TensorError> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(TensorError::DataLength { len: data.len(), rows, cols });
        }
        Ok(Tensor { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Tensor {
        Tensor { data: vec![0.0; rows * cols], rows, cols }
    }

    /// Entries drawn from a standard normal distribution, multiplied by `scale`.
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Tensor {
        let data = (0..rows * cols)
            .map(|_| {
                let z: f64 = StandardNormal.sample(rng);
                z * scale
            })
            .collect();
        Tensor { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    // same shape, new contents; callers guarantee the length
    pub(crate) fn with_data(&self, data: Vec<f64>) -> Tensor {
        debug_assert_eq!(data.len(), self.data.len());
        Tensor { data, rows: self.rows, cols: self.cols }
    }

}
