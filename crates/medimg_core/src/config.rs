use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::catalog::TEST_POOL_LIMIT;

/// Runtime settings for the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind_address: SocketAddr,
    /// Folder the datasets are downloaded into.
    pub image_root: PathBuf,
    /// URL prefix under which `image_root` is served.
    pub public_prefix: String,
    pub default_sample_count: usize,
    pub class_image_limit: usize,
    pub test_pool_limit: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3001)),
            image_root: PathBuf::from("downloaded_images"),
            public_prefix: "images".to_string(),
            default_sample_count: 8,
            class_image_limit: 50,
            test_pool_limit: TEST_POOL_LIMIT,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("invalid service configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Replace the port, keeping the bind host.
    pub fn with_port(mut self, port: u16) -> Self {
        self.bind_address.set_port(port);
        self
    }
}
