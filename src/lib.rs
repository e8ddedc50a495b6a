pub mod tensor;
pub mod activation_functions;
pub mod loss_functions;
pub mod layer;
pub mod parameters;
pub mod mlp;
pub mod training;
pub mod model_store;
pub mod mnist_data;
pub mod helpers;
pub mod config;
pub mod error;

pub use error::Error;
pub use tensor::Tensor;
