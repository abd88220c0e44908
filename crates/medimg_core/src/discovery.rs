//! Bounded discovery of image files beneath a dataset directory.
//!
//! Traversal is depth-first in the order the file system lists entries, so
//! the records returned for a given limit are not stable across platforms.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Deepest directory level (root = 0) that is still listed.
pub const MAX_DEPTH: usize = 5;

/// Extensions accepted as images, lower-case.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Ground-truth segmentation masks carry this marker in their file name.
pub const MASK_MARKER: &str = "_mask";

/// An image file found on disk together with the path clients use to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub filename: String,
    /// Web path, always `/`-separated and rooted at the public prefix.
    pub path: String,
    #[serde(skip)]
    pub absolute_path: PathBuf,
}

/// Where image files are exposed to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicMount {
    pub fs_root: PathBuf,
    pub prefix: String,
}

impl PublicMount {
    pub fn new(fs_root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            fs_root: fs_root.into(),
            prefix: prefix.into().trim_matches('/').to_string(),
        }
    }

    /// Web path for `file`, falling back to a path relative to `scan_root`
    /// when the file lives outside the mounted root.
    pub fn web_path(&self, file: &Path, scan_root: &Path) -> String {
        let relative = file
            .strip_prefix(&self.fs_root)
            .or_else(|_| file.strip_prefix(scan_root))
            .unwrap_or(file);
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if self.prefix.is_empty() {
            format!("/{joined}")
        } else {
            format!("/{}/{joined}", self.prefix)
        }
    }
}

/// Whether a file name passes the extension and mask filters.
pub fn is_eligible_name(name: &str) -> bool {
    if name.contains(MASK_MARKER) {
        return false;
    }
    match Path::new(name).extension().and_then(|s| s.to_str()) {
        Some(ext) => {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Collect up to `limit` eligible images below `root`.
///
/// A root that is missing or unreadable yields an empty result. The same
/// goes for any subdirectory: it is skipped and the walk carries on with the
/// remaining entries.
pub fn discover(root: impl AsRef<Path>, limit: usize, mount: &PublicMount) -> Vec<ImageRecord> {
    let root = root.as_ref();
    collect_images(WalkDir::new(root), root, limit, mount)
}

/// Walk entries depth-first, descending into each directory where it is
/// listed. Entries directly under `root` are at walk depth 1, so directory
/// level `MAX_DEPTH` still has its files read.
fn collect_images(
    walker: WalkDir,
    root: &Path,
    limit: usize,
    mount: &PublicMount,
) -> Vec<ImageRecord> {
    let mut found = Vec::new();

    for entry in walker.max_depth(MAX_DEPTH + 1) {
        if found.len() >= limit {
            break;
        }
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping during image walk of {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_eligible_name(&name) {
            let path = entry.into_path();
            found.push(ImageRecord {
                path: mount.web_path(&path, root),
                filename: name,
                absolute_path: path,
            });
        }
    }

    found
}
