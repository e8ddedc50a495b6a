use std::path::PathBuf;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("data length {len} doesn't match shape {rows}x{cols}")]
    DataLength { len: usize, rows: usize, cols: usize },

    #[error("{op}: dimension mismatch {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
}

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("dataset file {} not found", .0.display())]
    MissingFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("header declares {count} items of {item_size} bytes, which doesn't fit in memory")]
    Oversized { count: usize, item_size: usize },

    #[error("number of images ({images}) and labels ({labels}) don't match")]
    CountMismatch { images: usize, labels: usize },

    #[error("label {label} at index {index} is out of range for {classes} classes")]
    LabelOutOfRange { index: usize, label: u8, classes: usize },

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model decode error: {0}")]
    Decode(#[from] postcard::Error),

    #[error("model file is missing tensor '{0}'")]
    MissingTensor(&'static str),

    #[error("tensor '{name}' has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        name: &'static str,
        found: (usize, usize),
        expected: (usize, usize),
    },

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

#[derive(thiserror::Error, Debug)]
pub enum TrainError {
    #[error("training batch is empty")]
    EmptyBatch,

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Train(#[from] TrainError),
}
