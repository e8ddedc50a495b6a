pub mod activation_function;

pub use activation_function::{ActivationFunction, ReLU, Softmax};
