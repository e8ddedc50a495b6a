use std::path::PathBuf;

use crate::parameters::{DEFAULT_SEED, HIDDEN_SIZE};
use crate::tensor::ExecutionMode;

/// Hyperparameters of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub hidden_size: usize,
    /// Log the loss every this many epochs; `None` keeps training quiet.
    pub report_interval: Option<usize>,
    pub execution_mode: ExecutionMode,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs: 1000,
            learning_rate: 0.01,
            seed: DEFAULT_SEED,
            hidden_size: HIDDEN_SIZE,
            report_interval: Some(100),
            execution_mode: ExecutionMode::default(),
        }
    }
}

/// Where the interactive driver finds its dataset and model file.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    pub data_dir: PathBuf,
    pub model_path: PathBuf,
    pub train: TrainConfig,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            model_path: PathBuf::from("mnist_model.bin"),
            train: TrainConfig::default(),
        }
    }
}
