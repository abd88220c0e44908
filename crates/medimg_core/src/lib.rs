//! Discovery of locally downloaded medical image datasets.
//!
//! [`discover`] walks one directory tree with a depth and result bound;
//! [`Catalog`] maps dataset and class names onto those walks.

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod discovery;
pub mod error;

pub use catalog::{Catalog, DatasetSummary, SampleSet, TEST_POOL_LIMIT};
pub use config::ServiceConfig;
pub use dataset::{ClassCase, DatasetKind, DatasetSpec};
pub use discovery::{
    IMAGE_EXTENSIONS, ImageRecord, MASK_MARKER, MAX_DEPTH, PublicMount, discover,
    is_eligible_name,
};
pub use error::DatasetError;
