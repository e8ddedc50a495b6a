use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::layer::Layer;
use crate::parameters::{LayerSizes, Parameters};
use crate::tensor::Tensor;

pub const W1: &str = "W1";
pub const B1: &str = "b1";
pub const W2: &str = "W2";
pub const B2: &str = "b2";

/// Persistence boundary for trained [`Parameters`].
pub trait ModelStore {
    fn exists(&self) -> bool;
    fn save(&self, parameters: &Parameters) -> Result<(), ModelError>;
    /// Loads the stored parameters, which must have exactly the given layer sizes.
    fn load(&self, sizes: &LayerSizes) -> Result<Parameters, ModelError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TensorRecord {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// A set of named tensors as written to disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    tensors: BTreeMap<String, TensorRecord>,
}

impl ModelFile {
    pub fn from_parameters(parameters: &Parameters) -> Self {
        let mut file = Self::default();
        file.insert(W1, &parameters.hidden.weights);
        file.insert(B1, &parameters.hidden.bias);
        file.insert(W2, &parameters.output.weights);
        file.insert(B2, &parameters.output.bias);
        file
    }

    pub fn insert(&mut self, name: &str, tensor: &Tensor) {
        let record = TensorRecord { rows: tensor.rows(), cols: tensor.cols(), data: tensor.data().to_vec() };
        self.tensors.insert(name.to_string(), record);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.tensors.remove(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        Ok(postcard::from_bytes(bytes)?)
    }

    // shape is checked against the record header before the tensor is built
    fn tensor(&self, name: &'static str, expected: (usize, usize)) -> Result<Tensor, ModelError> {
        let record = self.tensors.get(name).ok_or(ModelError::MissingTensor(name))?;
        let found = (record.rows, record.cols);
        if found != expected {
            return Err(ModelError::ShapeMismatch { name, found, expected });
        }
        Ok(Tensor::new(record.data.clone(), record.rows, record.cols)?)
    }

    /// Rebuilds the parameters, requiring all four tensors with the shapes `sizes` implies.
    pub fn into_parameters(self, sizes: &LayerSizes) -> Result<Parameters, ModelError> {
        let w1 = self.tensor(W1, (sizes.input, sizes.hidden))?;
        let b1 = self.tensor(B1, (1, sizes.hidden))?;
        let w2 = self.tensor(W2, (sizes.hidden, sizes.output))?;
        let b2 = self.tensor(B2, (1, sizes.output))?;

        let parameters = Parameters::from_layers(Layer::from_parts(w1, b1)?, Layer::from_parts(w2, b2)?)?;
        Ok(parameters)
    }
}

/// Stores the model as a postcard-encoded [`ModelFile`] at `path`.
#[derive(Debug, Clone)]
pub struct FileModelStore {
    path: PathBuf,
}

impl FileModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelStore for FileModelStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn save(&self, parameters: &Parameters) -> Result<(), ModelError> {
        let bytes = ModelFile::from_parameters(parameters).to_bytes()?;
        fs::write(&self.path, bytes)?;
        info!("Model saved to {}", self.path.display());
        Ok(())
    }

    fn load(&self, sizes: &LayerSizes) -> Result<Parameters, ModelError> {
        let bytes = fs::read(&self.path)?;
        let parameters = ModelFile::from_bytes(&bytes)?.into_parameters(sizes)?;
        info!("Model loaded from {}", self.path.display());
        Ok(parameters)
    }
}

/// Keeps the encoded model in memory and counts how often it was saved.
#[derive(Debug, Default)]
pub struct MemoryModelStore {
    bytes: RefCell<Option<Vec<u8>>>,
    saves: Cell<usize>,
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes: RefCell::new(Some(bytes)), saves: Cell::new(0) }
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl ModelStore for MemoryModelStore {
    fn exists(&self) -> bool {
        self.bytes.borrow().is_some()
    }

    fn save(&self, parameters: &Parameters) -> Result<(), ModelError> {
        let bytes = ModelFile::from_parameters(parameters).to_bytes()?;
        *self.bytes.borrow_mut() = Some(bytes);
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load(&self, sizes: &LayerSizes) -> Result<Parameters, ModelError> {
        let bytes = self.bytes.borrow();
        let bytes = bytes.as_deref().ok_or_else(|| {
            ModelError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "no model stored"))
        })?;
        ModelFile::from_bytes(bytes)?.into_parameters(sizes)
    }
}
