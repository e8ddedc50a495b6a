use log::info;

use crate::config::TrainConfig;
use crate::error::Error;
use crate::model_store::ModelStore;
use crate::parameters::{LayerSizes, Parameters};
use crate::tensor::{Tensor, TensorError};
use crate::training;

/// Fraction of predictions equal to the argmax of the matching one-hot row.
pub fn accuracy(predictions: &[usize], targets: &Tensor) -> Result<f64, TensorError> {
    if predictions.len() != targets.rows() {
        return Err(TensorError::DimensionMismatch {
            op: "accuracy",
            left: (predictions.len(), 1),
            right: targets.dims(),
        });
    }
    if predictions.is_empty() {
        return Ok(0.0);
    }

    let correct = predictions
        .iter()
        .zip(targets.argmax_rows())
        .filter(|&(&predicted, truth)| predicted == truth)
        .count();
    Ok(correct as f64 / predictions.len() as f64)
}

/// Loads the model from `store` when one exists, otherwise trains a fresh
/// one and saves it exactly once.
///
/// A stored model must match the layer sizes a fresh training run would
/// produce: the batch widths and `config.hidden_size`.
pub fn load_or_train<S: ModelStore + ?Sized>(
    store: &S,
    config: &TrainConfig,
    train_images: &Tensor,
    train_labels: &Tensor,
) -> Result<Parameters, Error> {
    let sizes = LayerSizes::new(train_images.cols(), config.hidden_size, train_labels.cols());
    if store.exists() {
        info!("Loading model");
        return Ok(store.load(&sizes)?);
    }

    info!("No saved model found, training a new one");
    let outcome = training::train(train_images, train_labels, config)?;
    store.save(&outcome.parameters)?;
    Ok(outcome.parameters)
}
