use crate::tensor::{Tensor, TensorError};

impl Tensor {

    /// Builds a matrix from equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Tensor, TensorError> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(TensorError::DimensionMismatch {
                    op: "from_rows",
                    left: (1, cols),
                    right: (1, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Tensor::new(data, rows.len(), cols)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; a zero-width matrix has no data to walk anyway
        self.data.chunks(self.cols.max(1))
    }

    /// Adds a 1xC row vector to every row of an RxC matrix.
    pub fn add_row(&self, bias: &Tensor) -> Result<Tensor, TensorError> {
        if bias.rows != 1 || bias.cols != self.cols {
            return Err(TensorError::DimensionMismatch { op: "add_row", left: self.dims(), right: bias.dims() });
        }
        let mut data = self.data.clone();
        for row in data.chunks_mut(self.cols.max(1)) {
            for (x, &b) in row.iter_mut().zip(bias.data.iter()) {
                *x += b;
            }
        }
        Ok(Tensor { data, rows: self.rows, cols: self.cols })
    }

    /// Column sums as a 1xC row vector.
    pub fn sum_columns(&self) -> Tensor {
        let mut sums = vec![0.0; self.cols];
        for row in self.iter_rows() {
            for (s, &x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        Tensor { data: sums, rows: 1, cols: self.cols }
    }

    /// Column index of the largest value of every row. Ties go to the first one.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.iter_rows()
            .map(|row| {
                let mut max_idx = 0;
                let mut max_val = row[0];
                for (i, &val) in row.iter().enumerate() {
                    if val > max_val {
                        max_val = val;
                        max_idx = i;
                    }
                }
                max_idx
            })
            .collect()
    }

}
