//! Dataset-level queries layered on top of [`discover`].

use crate::dataset::{DatasetKind, DatasetSpec};
use crate::discovery::{ImageRecord, PublicMount, discover};
use crate::error::DatasetError;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Number of candidates a random test image is drawn from.
pub const TEST_POOL_LIMIT: usize = 50;

/// Availability and metadata of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSummary {
    #[serde(skip)]
    pub kind: DatasetKind,
    pub kaggle_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub classes: Vec<&'static str>,
    pub available: bool,
    pub local_path: Option<PathBuf>,
}

/// Images sampled across several classes of a dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSet {
    /// Class-ordered concatenation, cut at the requested sample count.
    pub images: Vec<ImageRecord>,
    /// Images per class, in request order.
    pub organized: Vec<(String, Vec<ImageRecord>)>,
    /// Number of images found before the cut.
    pub count: usize,
}

/// Read-only view of the downloaded datasets under one image root.
#[derive(Debug, Clone)]
pub struct Catalog {
    mount: PublicMount,
    test_pool_limit: usize,
}

impl Catalog {
    pub fn new(mount: PublicMount) -> Self {
        Self {
            mount,
            test_pool_limit: TEST_POOL_LIMIT,
        }
    }

    pub fn with_test_pool_limit(mut self, limit: usize) -> Self {
        self.test_pool_limit = limit;
        self
    }

    pub fn image_root(&self) -> &Path {
        &self.mount.fs_root
    }

    /// Report every known dataset and whether its root folder is present.
    pub fn list(&self) -> Vec<DatasetSummary> {
        DatasetKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = kind.spec();
                let root = spec.root_path(self.image_root());
                let available = root.exists();
                DatasetSummary {
                    kind,
                    kaggle_id: spec.kaggle_id,
                    name: spec.name,
                    description: spec.description,
                    classes: spec.classes.to_vec(),
                    available,
                    local_path: available.then_some(root),
                }
            })
            .collect()
    }

    /// Sample up to `num_samples` images from each requested class of the
    /// training split.
    pub fn fetch_samples<S: AsRef<str>>(
        &self,
        kind: DatasetKind,
        classes: &[S],
        num_samples: usize,
    ) -> Result<SampleSet, DatasetError> {
        let spec = kind.spec();
        let train = spec.train_path(self.image_root());
        self.require_dir(spec, &train)?;

        let mut set = SampleSet::default();
        for class_name in classes {
            let class_name: &str = class_name.as_ref();
            let class_dir = spec.class_path(&train, class_name);
            let images = discover(&class_dir, num_samples, &self.mount);
            tracing::debug!(
                "{kind}/{class_name}: {} images from {}",
                images.len(),
                class_dir.display()
            );
            set.count += images.len();
            set.organized.push((class_name.to_string(), images));
        }

        set.images = set
            .organized
            .iter()
            .flat_map(|(_, images)| images.iter().cloned())
            .take(num_samples)
            .collect();
        Ok(set)
    }

    /// Images of a single class in the training split. A class folder that
    /// does not exist yields an empty list; an unreadable split is an error.
    pub fn class_images(
        &self,
        kind: DatasetKind,
        class_name: &str,
        limit: usize,
    ) -> Result<Vec<ImageRecord>, DatasetError> {
        let spec = kind.spec();
        let train = spec.train_path(self.image_root());
        if !probe_dir(&train)? {
            return Ok(Vec::new());
        }
        Ok(discover(spec.class_path(&train, class_name), limit, &self.mount))
    }

    /// Pick one image uniformly at random from the test split, optionally
    /// restricted to one class.
    pub fn random_test_image<R: Rng + ?Sized>(
        &self,
        kind: DatasetKind,
        class_name: Option<&str>,
        rng: &mut R,
    ) -> Result<ImageRecord, DatasetError> {
        let spec = kind.spec();
        let test = spec.test_path(self.image_root());
        if !probe_dir(&test)? {
            return Err(DatasetError::NoImages);
        }
        let search = match class_name.map(str::trim).filter(|c| !c.is_empty()) {
            Some(class_name) => spec.class_path(&test, class_name),
            None => test,
        };
        let pool = discover(&search, self.test_pool_limit, &self.mount);
        pool.choose(rng).cloned().ok_or(DatasetError::NoImages)
    }

    fn require_dir(&self, spec: &DatasetSpec, dir: &Path) -> Result<(), DatasetError> {
        if probe_dir(dir)? {
            Ok(())
        } else {
            Err(DatasetError::DatasetNotFound {
                folder: spec.root_dir.to_string(),
                image_root: self.image_root().to_path_buf(),
            })
        }
    }
}

/// Whether `dir` can be listed. Absence is `Ok(false)`; any other failure,
/// such as denied permission, is an error for the whole request.
fn probe_dir(dir: &Path) -> Result<bool, DatasetError> {
    match fs::read_dir(dir) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DatasetError::Io {
            path: dir.to_path_buf(),
            source,
        }),
    }
}
