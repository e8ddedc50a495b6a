use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{info, warn};

use crate::error::DatasetError;
use crate::tensor::Tensor;

pub const IMAGES_MAGIC: u32 = 2051;
pub const LABELS_MAGIC: u32 = 2049;
pub const NUM_CLASSES: usize = 10;

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Images as an N x (rows*cols) matrix in [0, 1], labels as raw class indices.
#[derive(Debug, Clone)]
pub struct MnistData {
    pub images: Tensor,
    pub labels: Vec<u8>,
}

impl MnistData {
    pub fn load_from_files(images_path: &Path, labels_path: &Path) -> Result<Self, DatasetError> {
        let images = read_images(open(images_path)?)?;
        let labels = read_labels(open(labels_path)?)?;

        if images.rows() != labels.len() {
            return Err(DatasetError::CountMismatch { images: images.rows(), labels: labels.len() });
        }
        info!("Loaded {} images from {}", labels.len(), images_path.display());

        Ok(MnistData { images, labels })
    }

    pub fn one_hot_labels(&self) -> Result<Tensor, DatasetError> {
        one_hot(&self.labels, NUM_CLASSES)
    }
}

/// Training and held-out splits, with labels already one-hot encoded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub train_images: Tensor,
    pub train_labels: Tensor,
    pub test_images: Tensor,
    pub test_labels: Tensor,
}

impl Dataset {
    /// Loads the four standard files from `dir`, plain or `.gz`.
    ///
    /// All four must be present before anything is read.
    pub fn load_dir(dir: &Path) -> Result<Self, DatasetError> {
        let [train_images, train_labels, test_images, test_labels] =
            [TRAIN_IMAGES, TRAIN_LABELS, TEST_IMAGES, TEST_LABELS].map(|name| resolve(dir, name));
        let train_images = train_images?;
        let train_labels = train_labels?;
        let test_images = test_images?;
        let test_labels = test_labels?;

        let train = MnistData::load_from_files(&train_images, &train_labels)?;
        let test = MnistData::load_from_files(&test_images, &test_labels)?;

        Ok(Dataset {
            train_labels: train.one_hot_labels()?,
            train_images: train.images,
            test_labels: test.one_hot_labels()?,
            test_images: test.images,
        })
    }
}

fn resolve(dir: &Path, name: &str) -> Result<PathBuf, DatasetError> {
    let plain = dir.join(name);
    if plain.is_file() {
        return Ok(plain);
    }
    let gz = dir.join(format!("{}.gz", name));
    if gz.is_file() {
        return Ok(gz);
    }
    Err(DatasetError::MissingFile(plain))
}

fn open(path: &Path) -> Result<Box<dyn Read>, DatasetError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DatasetError::MissingFile(path.to_path_buf()),
        _ => DatasetError::Io(e),
    })?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

fn read_u32<R: Read>(reader: &mut R) -> Result<u32, DatasetError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(u32::from_be_bytes(bytes))
}

// Buffers only the bytes actually present, so a lying header can't force a huge allocation.
fn read_payload<R: Read>(reader: &mut R, count: usize, item_size: usize) -> Result<Vec<u8>, DatasetError> {
    let len = count
        .checked_mul(item_size)
        .ok_or(DatasetError::Oversized { count, item_size })?;

    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() != len {
        let message = format!("expected {} bytes of data, found {}", len, payload.len());
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, message).into());
    }
    Ok(payload)
}

fn check_magic(found: u32, expected: u32) {
    if found != expected {
        warn!("Unexpected magic number {} (expected {}), reading anyway", found, expected);
    }
}

/// Reads an IDX image stream into an N x (rows*cols) matrix, pixels scaled by 1/255.
pub fn read_images<R: Read>(mut reader: R) -> Result<Tensor, DatasetError> {
    check_magic(read_u32(&mut reader)?, IMAGES_MAGIC);
    let num_images = read_u32(&mut reader)? as usize;
    let rows = read_u32(&mut reader)? as usize;
    let cols = read_u32(&mut reader)? as usize;

    let image_size = rows
        .checked_mul(cols)
        .ok_or(DatasetError::Oversized { count: rows, item_size: cols })?;
    let pixels = read_payload(&mut reader, num_images, image_size)?;

    let data = pixels.iter().map(|&pixel| pixel as f64 / 255.0).collect();
    Ok(Tensor::new(data, num_images, image_size)?)
}

/// Reads an IDX label stream.
pub fn read_labels<R: Read>(mut reader: R) -> Result<Vec<u8>, DatasetError> {
    check_magic(read_u32(&mut reader)?, LABELS_MAGIC);
    let num_labels = read_u32(&mut reader)? as usize;

    read_payload(&mut reader, num_labels, 1)
}

/// N x `classes` matrix with a single 1 per row, at the label's column.
pub fn one_hot(labels: &[u8], classes: usize) -> Result<Tensor, DatasetError> {
    let mut data = vec![0.0; labels.len() * classes];
    for (index, &label) in labels.iter().enumerate() {
        if label as usize >= classes {
            return Err(DatasetError::LabelOutOfRange { index, label, classes });
        }
        data[index * classes + label as usize] = 1.0;
    }
    Ok(Tensor::new(data, labels.len(), classes)?)
}
