use log::{debug, info};

use crate::config::TrainConfig;
use crate::error::TrainError;
use crate::mlp::MLP;
use crate::parameters::Parameters;
use crate::tensor::{Tensor, TensorError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingState {
    Initializing,
    Iterating { epoch: usize },
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub loss: f64,
}

/// Result of a complete run: final parameters and the losses that were reported.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub parameters: Parameters,
    pub history: Vec<EpochReport>,
}

/// Full-batch gradient descent over a fixed number of epochs.
///
/// Each call to [`Trainer::step`] runs one epoch: forward pass, loss,
/// backward pass, then a single update of all four parameter tensors.
pub struct Trainer<'a> {
    mlp: MLP,
    config: TrainConfig,
    inputs: &'a Tensor,
    targets: &'a Tensor,
    state: TrainingState,
    history: Vec<EpochReport>,
}

impl<'a> Trainer<'a> {
    /// Starts from freshly initialized parameters sized from the batch shapes.
    pub fn new(config: TrainConfig, inputs: &'a Tensor, targets: &'a Tensor) -> Result<Self, TrainError> {
        let parameters = Parameters::initialize(inputs.cols(), config.hidden_size, targets.cols(), config.seed);
        Self::from_parameters(parameters, config, inputs, targets)
    }

    pub fn from_parameters(
        parameters: Parameters,
        config: TrainConfig,
        inputs: &'a Tensor,
        targets: &'a Tensor,
    ) -> Result<Self, TrainError> {
        if inputs.rows() == 0 {
            return Err(TrainError::EmptyBatch);
        }
        if inputs.rows() != targets.rows() {
            return Err(TensorError::DimensionMismatch { op: "trainer", left: inputs.dims(), right: targets.dims() }.into());
        }
        if inputs.cols() != parameters.input_size() {
            return Err(TensorError::DimensionMismatch {
                op: "trainer",
                left: inputs.dims(),
                right: parameters.hidden.weights.dims(),
            }
            .into());
        }
        if targets.cols() != parameters.output_size() {
            return Err(TensorError::DimensionMismatch {
                op: "trainer",
                left: targets.dims(),
                right: parameters.output.weights.dims(),
            }
            .into());
        }

        let mlp = MLP::new(parameters, config.execution_mode);
        Ok(Self { mlp, config, inputs, targets, state: TrainingState::Initializing, history: Vec::new() })
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn parameters(&self) -> &Parameters {
        &self.mlp.parameters
    }

    pub fn history(&self) -> &[EpochReport] {
        &self.history
    }

    fn next_epoch(&self) -> Option<usize> {
        let epoch = match self.state {
            TrainingState::Initializing => 0,
            TrainingState::Iterating { epoch } => epoch + 1,
            TrainingState::Terminated => return None,
        };
        (epoch < self.config.epochs).then_some(epoch)
    }

    /// Runs one epoch, or returns `Ok(None)` and terminates once all epochs are done.
    pub fn step(&mut self) -> Result<Option<EpochReport>, TrainError> {
        let Some(epoch) = self.next_epoch() else {
            self.state = TrainingState::Terminated;
            return Ok(None);
        };

        let pass = self.mlp.forward(self.inputs)?;
        let loss = self.mlp.loss(self.targets, &pass)?;
        let gradients = self.mlp.backward(self.inputs, self.targets, &pass)?;
        self.mlp.parameters.apply_gradients(&gradients, self.config.learning_rate)?;
        self.state = TrainingState::Iterating { epoch };

        let report = EpochReport { epoch, loss };
        match self.config.report_interval {
            Some(interval) if interval > 0 && epoch % interval == 0 => {
                info!("Epoch {}: Loss = {:.4}", epoch, loss);
                self.history.push(report);
            }
            _ => debug!("Epoch {}: Loss = {:.6}", epoch, loss),
        }
        Ok(Some(report))
    }

    pub fn run(mut self) -> Result<TrainingOutcome, TrainError> {
        info!(
            "Training on {} examples for {} epochs (learning rate {})",
            self.inputs.rows(),
            self.config.epochs,
            self.config.learning_rate
        );
        while self.step()?.is_some() {}
        Ok(self.into_outcome())
    }

    pub fn into_outcome(self) -> TrainingOutcome {
        TrainingOutcome { parameters: self.mlp.into_parameters(), history: self.history }
    }
}

/// Trains from scratch with `config` and returns the final parameters.
pub fn train(inputs: &Tensor, targets: &Tensor, config: &TrainConfig) -> Result<TrainingOutcome, TrainError> {
    Trainer::new(config.clone(), inputs, targets)?.run()
}
