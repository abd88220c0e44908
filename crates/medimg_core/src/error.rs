use std::path::PathBuf;
use thiserror::Error;

/// Request-level failures when resolving or reading a dataset.
///
/// A missing subdirectory below a dataset root is never an error; it simply
/// contributes no images.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset key required")]
    MissingDatasetKey,

    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("dataset not found; please ensure the {folder} folder exists in {}", image_root.display())]
    DatasetNotFound { folder: String, image_root: PathBuf },

    #[error("no images found for the specified class")]
    NoImages,

    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DatasetError {
    /// True when the request itself was malformed.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingDatasetKey | Self::UnknownDataset(_))
    }

    /// True when the requested data does not exist on disk.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::DatasetNotFound { .. } | Self::NoImages)
    }
}
