use crate::tensor::Tensor;

pub trait ActivationFunction {

    fn activate(&self, layer: &Tensor) -> Tensor;
    fn derivative(&self, layer: &Tensor) -> Tensor;

}

/// max(0, z), elementwise.
pub struct ReLU;

impl ActivationFunction for ReLU {

    fn activate(&self, layer: &Tensor) -> Tensor {
        layer.map(|x| if x > 0.0 { x } else { 0.0 })
    }

    // 1 where z > 0, else 0 (including z == 0)
    fn derivative(&self, layer: &Tensor) -> Tensor {
        layer.map(|x| if x > 0.0 { 1.0 } else { 0.0 })
    }

}

/// Row-wise softmax: every row of the output is a probability distribution.
pub struct Softmax;

impl ActivationFunction for Softmax {

    fn activate(&self, layer: &Tensor) -> Tensor {
        let mut data = Vec::with_capacity(layer.size());
        for row in layer.iter_rows() {
            let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let start = data.len();
            data.extend(row.iter().map(|&x| (x - max).exp()));
            let sum: f64 = data[start..].iter().sum();
            for x in &mut data[start..] {
                *x /= sum;
            }
        }
        layer.with_data(data)
    }

    /// Diagonal of the per-row Jacobian, s * (1 - s).
    ///
    /// Training never calls this: the output layer uses the combined
    /// softmax + cross-entropy gradient `A2 - Y` instead.
    fn derivative(&self, layer: &Tensor) -> Tensor {
        self.activate(layer).map(|s| s * (1.0 - s))
    }

}
