use rayon::prelude::*;

use crate::tensor::{Tensor, TensorError};

/// How matrix products are computed.
///
/// Both modes accumulate every output element in the same order, so they
/// give bit-identical results; `Parallel` only spreads output rows over the
/// rayon thread pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    Sequential,
    #[default]
    Parallel,
}

impl Tensor {

    /// Matrix product `self · other`.
    pub fn mul(&self, other: &Tensor, execution_mode: ExecutionMode) -> Result<Tensor, TensorError> {
        if self.cols != other.rows {
            return Err(TensorError::DimensionMismatch { op: "mul", left: self.dims(), right: other.dims() });
        }
        let (r1, c1, c2) = (self.rows, self.cols, other.cols);
        let kernel = |i: usize, out: &mut [f64]| {
            for k in 0..c1 {
                let a = self.data[i * c1 + k];
                let b_row = &other.data[k * c2..(k + 1) * c2];
                for (o, &b) in out.iter_mut().zip(b_row.iter()) {
                    *o += a * b;
                }
            }
        };
        Ok(Tensor { data: run_rows(r1, c2, execution_mode, kernel), rows: r1, cols: c2 })
    }

    /// `selfᵗ · other` without materializing the transpose.
    pub fn transpose_mul(&self, other: &Tensor, execution_mode: ExecutionMode) -> Result<Tensor, TensorError> {
        if self.rows != other.rows {
            return Err(TensorError::DimensionMismatch { op: "transpose_mul", left: self.dims(), right: other.dims() });
        }
        let (n, c1, c2) = (self.rows, self.cols, other.cols);
        let kernel = |k: usize, out: &mut [f64]| {
            for i in 0..n {
                let a = self.data[i * c1 + k];
                let b_row = &other.data[i * c2..(i + 1) * c2];
                for (o, &b) in out.iter_mut().zip(b_row.iter()) {
                    *o += a * b;
                }
            }
        };
        Ok(Tensor { data: run_rows(c1, c2, execution_mode, kernel), rows: c1, cols: c2 })
    }

    /// `self · otherᵗ` without materializing the transpose.
    pub fn mul_transpose(&self, other: &Tensor, execution_mode: ExecutionMode) -> Result<Tensor, TensorError> {
        if self.cols != other.cols {
            return Err(TensorError::DimensionMismatch { op: "mul_transpose", left: self.dims(), right: other.dims() });
        }
        let (r1, c, r2) = (self.rows, self.cols, other.rows);
        let kernel = |i: usize, out: &mut [f64]| {
            let a_row = &self.data[i * c..(i + 1) * c];
            for (j, o) in out.iter_mut().enumerate() {
                let b_row = &other.data[j * c..(j + 1) * c];
                let mut sum = 0.0;
                for (&a, &b) in a_row.iter().zip(b_row.iter()) {
                    sum += a * b;
                }
                *o = sum;
            }
        };
        Ok(Tensor { data: run_rows(r1, r2, execution_mode, kernel), rows: r1, cols: r2 })
    }

}

fn run_rows<F>(rows: usize, cols: usize, execution_mode: ExecutionMode, kernel: F) -> Vec<f64>
where
    F: Fn(usize, &mut [f64]) + Sync,
{
    let mut result = vec![0.0; rows * cols];
    if cols == 0 {
        return result;
    }
    match execution_mode {
        ExecutionMode::Sequential => {
            result.chunks_mut(cols).enumerate().for_each(|(i, out)| kernel(i, out));
        }
        ExecutionMode::Parallel => {
            result.par_chunks_mut(cols).enumerate().for_each(|(i, out)| kernel(i, out));
        }
    }
    result
}
