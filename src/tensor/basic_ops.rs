use crate::tensor::{Tensor, TensorError};

impl Tensor {

    fn check_same_shape(&self, other: &Tensor, op: &'static str) -> Result<(), TensorError> {
        if self.dims() != other.dims() {
            return Err(TensorError::DimensionMismatch { op, left: self.dims(), right: other.dims() });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Tensor, op: &'static str, f: impl Fn(f64, f64) -> f64) -> Result<Tensor, TensorError> {
        self.check_same_shape(other, op)?;
        let data = self.data.iter().zip(other.data.iter()).map(|(&a, &b)| f(a, b)).collect();
        Ok(Tensor { data, rows: self.rows, cols: self.cols })
    }

    pub fn checked_add(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, "add", |a, b| a + b)
    }

    pub fn checked_sub(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, "sub", |a, b| a - b)
    }

    // Element wise multiplication
    pub fn hadamard(&self, other: &Tensor) -> Result<Tensor, TensorError> {
        self.zip_with(other, "hadamard", |a, b| a * b)
    }

    /// `self -= scalar * other`, in place.
    pub fn sub_scaled(&mut self, other: &Tensor, scalar: f64) -> Result<(), TensorError> {
        self.check_same_shape(other, "sub_scaled")?;
        for (a, &b) in self.data.iter_mut().zip(other.data.iter()) {
            *a -= scalar * b;
        }
        Ok(())
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tensor {
        let data = self.data.iter().map(|&x| f(x)).collect();
        Tensor { data, rows: self.rows, cols: self.cols }
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

}
