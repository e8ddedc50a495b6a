use std::collections::BTreeMap;
use std::path::PathBuf;

use digit_mlp::config::TrainConfig;
use digit_mlp::error::{Error, ModelError};
use digit_mlp::helpers::load_or_train;
use digit_mlp::mnist_data::one_hot;
use digit_mlp::model_store::{FileModelStore, MemoryModelStore, ModelFile, ModelStore, B2, W1, W2};
use digit_mlp::parameters::{LayerSizes, Parameters};
use digit_mlp::tensor::{ExecutionMode, Tensor, TensorError};
use serde::Serialize;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("digit_mlp_{}_{}.bin", name, std::process::id()))
}

fn bits(t: &Tensor) -> Vec<u64> {
    t.data().iter().map(|x| x.to_bits()).collect()
}

#[test]
fn test_file_round_trip_is_bit_exact() {
    let path = temp_path("round_trip");
    let store = FileModelStore::new(&path);
    let parameters = Parameters::default();

    assert!(!store.exists());
    store.save(&parameters).unwrap();
    assert!(store.exists());
    let loaded = store.load(&LayerSizes::default()).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(bits(&loaded.hidden.weights), bits(&parameters.hidden.weights));
    assert_eq!(bits(&loaded.hidden.bias), bits(&parameters.hidden.bias));
    assert_eq!(bits(&loaded.output.weights), bits(&parameters.output.weights));
    assert_eq!(bits(&loaded.output.bias), bits(&parameters.output.bias));
    assert_eq!(loaded.hidden.weights.dims(), (784, 128));
    assert_eq!(loaded.output.bias.dims(), (1, 10));
}

#[test]
fn test_model_file_names() {
    let file = ModelFile::from_parameters(&Parameters::initialize(3, 2, 2, 0));
    let names: Vec<&str> = file.names().collect();
    assert_eq!(names, vec!["W1", "W2", "b1", "b2"]);
}

#[test]
fn test_load_rejects_missing_tensor() {
    let mut file = ModelFile::from_parameters(&Parameters::initialize(3, 2, 2, 0));
    assert!(file.remove(W2));
    let store = MemoryModelStore::with_bytes(file.to_bytes().unwrap());

    assert!(store.exists());
    match store.load(&LayerSizes::new(3, 2, 2)) {
        Err(ModelError::MissingTensor(name)) => assert_eq!(name, "W2"),
        other => panic!("expected a missing tensor error, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_inconsistent_shapes() {
    let sizes = LayerSizes::new(3, 2, 2);
    let mut file = ModelFile::from_parameters(&Parameters::initialize(3, 2, 2, 0));
    file.insert(B2, &Tensor::zeros(1, 5));
    match file.clone().into_parameters(&sizes) {
        Err(ModelError::ShapeMismatch { name, found, expected }) => {
            assert_eq!(name, "b2");
            assert_eq!(found, (1, 5));
            assert_eq!(expected, (1, 2));
        }
        other => panic!("expected a shape error, got {:?}", other),
    }

    file.insert(W1, &Tensor::zeros(3, 4));
    assert!(matches!(file.into_parameters(&sizes), Err(ModelError::ShapeMismatch { name: "W1", .. })));
}

#[test]
fn test_load_rejects_model_of_other_sizes() {
    let path = temp_path("other_sizes");
    let store = FileModelStore::new(&path);
    store.save(&Parameters::initialize(3, 2, 2, 0)).unwrap();
    let result = store.load(&LayerSizes::default());
    std::fs::remove_file(&path).unwrap();

    match result {
        Err(ModelError::ShapeMismatch { name, found, expected }) => {
            assert_eq!(name, "W1");
            assert_eq!(found, (3, 2));
            assert_eq!(expected, (784, 128));
        }
        other => panic!("expected a shape error, got {:?}", other),
    }
}

// Same wire layout as the records `ModelFile` writes.
#[derive(Serialize)]
struct RawRecord {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[derive(Serialize)]
struct RawFile {
    tensors: BTreeMap<String, RawRecord>,
}

#[test]
fn test_load_rejects_oversized_record_header() {
    let record = |rows, cols, len| RawRecord { rows, cols, data: vec![0.0; len] };
    let mut tensors = BTreeMap::new();
    // rows * cols overflows usize
    tensors.insert("W1".to_string(), record(usize::MAX, 2, 4));
    tensors.insert("b1".to_string(), record(1, 2, 2));
    tensors.insert("W2".to_string(), record(2, 2, 4));
    tensors.insert("b2".to_string(), record(1, 2, 2));
    let bytes = postcard::to_allocvec(&RawFile { tensors }).unwrap();

    let file = ModelFile::from_bytes(&bytes).unwrap();
    assert!(matches!(
        file.clone().into_parameters(&LayerSizes::new(usize::MAX, 2, 2)),
        Err(ModelError::Tensor(TensorError::DataLength { .. }))
    ));
    assert!(matches!(
        file.into_parameters(&LayerSizes::new(3, 2, 2)),
        Err(ModelError::ShapeMismatch { name: "W1", .. })
    ));
}

#[test]
fn test_load_rejects_garbage() {
    let store = MemoryModelStore::with_bytes(vec![0xff, 0x01]);
    assert!(store.load(&LayerSizes::default()).is_err());

    let missing = FileModelStore::new(temp_path("never_written"));
    assert!(!missing.exists());
    assert!(matches!(missing.load(&LayerSizes::default()), Err(ModelError::Io(_))));
}

fn toy_batch() -> (Tensor, Tensor) {
    let x = Tensor::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    let y = one_hot(&[0, 1], 2).unwrap();
    (x, y)
}

fn toy_config() -> TrainConfig {
    TrainConfig { epochs: 3, hidden_size: 4, execution_mode: ExecutionMode::Sequential, ..TrainConfig::default() }
}

#[test]
fn test_load_or_train_trains_and_saves_once() {
    let (x, y) = toy_batch();
    let store = MemoryModelStore::new();
    assert!(!store.exists());

    let trained = load_or_train(&store, &toy_config(), &x, &y).unwrap();
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.load(&LayerSizes::new(2, 4, 2)).unwrap(), trained);
    assert_ne!(trained, Parameters::initialize(2, 4, 2, 42));
}

#[test]
fn test_load_or_train_prefers_stored_model() {
    let (x, y) = toy_batch();
    let stored = Parameters::initialize(2, 4, 2, 99);
    let store = MemoryModelStore::with_bytes(ModelFile::from_parameters(&stored).to_bytes().unwrap());

    let loaded = load_or_train(&store, &toy_config(), &x, &y).unwrap();
    assert_eq!(loaded, stored);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_load_or_train_rejects_stale_model() {
    let (x, y) = toy_batch();
    let stale = Parameters::initialize(2, 3, 2, 0);
    let store = MemoryModelStore::with_bytes(ModelFile::from_parameters(&stale).to_bytes().unwrap());

    let result = load_or_train(&store, &toy_config(), &x, &y);
    assert!(matches!(result, Err(Error::Model(ModelError::ShapeMismatch { name: "W1", .. }))));
    assert_eq!(store.save_count(), 0);
}

#[test]
fn test_load_or_train_surfaces_broken_model() {
    let (x, y) = toy_batch();
    let mut file = ModelFile::from_parameters(&Parameters::initialize(2, 4, 2, 0));
    file.remove(W1);
    let store = MemoryModelStore::with_bytes(file.to_bytes().unwrap());

    let result = load_or_train(&store, &toy_config(), &x, &y);
    assert!(matches!(result, Err(Error::Model(ModelError::MissingTensor("W1")))));
    assert_eq!(store.save_count(), 0);
}
