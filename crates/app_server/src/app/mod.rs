//! HTTP surface of the dataset image service.

pub mod api;
pub mod handlers;
pub mod settings;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use medimg_core::{Catalog, PublicMount, ServiceConfig};
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub default_sample_count: usize,
    pub class_image_limit: usize,
}

impl AppState {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let image_root = std::path::absolute(&config.image_root).with_context(|| {
            format!("cannot resolve image root {}", config.image_root.display())
        })?;
        let catalog = Catalog::new(PublicMount::new(image_root, config.public_prefix.as_str()))
            .with_test_pool_limit(config.test_pool_limit);
        Ok(Self {
            catalog: Arc::new(catalog),
            default_sample_count: config.default_sample_count,
            class_image_limit: config.class_image_limit,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/datasets", get(handlers::list_datasets))
        .route("/api/fetch-dataset-samples", post(handlers::fetch_dataset_samples))
        .route("/api/fetch-test-image", post(handlers::fetch_test_image))
        .route("/api/images/:class_name", get(handlers::class_images))
        .with_state(state)
}
