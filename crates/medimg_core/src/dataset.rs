//! The fixed set of supported datasets and their on-disk layout.

use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported datasets, identified on the wire by their snake_case key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    BreastUltrasound,
    ChestXray,
}

/// How a class label maps onto its directory name.
///
/// There is no shared rule between datasets; each one states its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassCase {
    Lower,
    Upper,
}

impl ClassCase {
    pub fn apply(self, class_name: &str) -> String {
        match self {
            Self::Lower => class_name.to_lowercase(),
            Self::Upper => class_name.to_uppercase(),
        }
    }
}

/// Static description of a dataset's metadata and folder layout.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSpec {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub kaggle_id: &'static str,
    pub classes: &'static [&'static str],
    /// Folder under the image root that marks the dataset as downloaded.
    pub root_dir: &'static str,
    /// Training split, relative to the image root.
    pub train_dir: &'static str,
    /// Test split, relative to the image root.
    pub test_dir: &'static str,
    pub class_case: ClassCase,
}

const BREAST_ULTRASOUND: DatasetSpec = DatasetSpec {
    key: "breast_ultrasound",
    name: "Breast Ultrasound Images",
    description: "Classify breast ultrasounds as Benign, Malignant, or Normal",
    kaggle_id: "aryashah2k/breast-ultrasound-images-dataset",
    classes: &["Normal", "Benign", "Malignant"],
    root_dir: "Dataset_BUSI_with_GT",
    train_dir: "Dataset_BUSI_with_GT",
    test_dir: "Dataset_BUSI_with_GT",
    class_case: ClassCase::Lower,
};

const CHEST_XRAY: DatasetSpec = DatasetSpec {
    key: "chest_xray",
    name: "Chest X-Ray Pneumonia Detection",
    description: "Classify chest X-rays as Normal or Pneumonia",
    kaggle_id: "paultimothymooney/chest-xray-pneumonia",
    classes: &["Normal", "Pneumonia"],
    root_dir: "chest_xray",
    train_dir: "chest_xray/train",
    test_dir: "chest_xray/test",
    class_case: ClassCase::Upper,
};

impl DatasetKind {
    pub const ALL: [DatasetKind; 2] = [DatasetKind::BreastUltrasound, DatasetKind::ChestXray];

    pub fn spec(self) -> &'static DatasetSpec {
        match self {
            Self::BreastUltrasound => &BREAST_ULTRASOUND,
            Self::ChestXray => &CHEST_XRAY,
        }
    }

    pub fn key(self) -> &'static str {
        self.spec().key
    }

    /// Parse an optional request field, rejecting absent or empty keys.
    pub fn from_request(key: Option<&str>) -> Result<Self, DatasetError> {
        match key.map(str::trim) {
            None | Some("") => Err(DatasetError::MissingDatasetKey),
            Some(k) => k.parse(),
        }
    }
}

impl DatasetSpec {
    pub fn root_path(&self, image_root: &Path) -> PathBuf {
        image_root.join(self.root_dir)
    }

    pub fn train_path(&self, image_root: &Path) -> PathBuf {
        image_root.join(self.train_dir)
    }

    pub fn test_path(&self, image_root: &Path) -> PathBuf {
        image_root.join(self.test_dir)
    }

    /// Directory holding `class_name` below `split`.
    pub fn class_path(&self, split: &Path, class_name: &str) -> PathBuf {
        split.join(self.class_case.apply(class_name))
    }
}

impl FromStr for DatasetKind {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| DatasetError::UnknownDataset(s.to_string()))
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
