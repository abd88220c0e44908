//! Request and response bodies of the HTTP API.

use medimg_core::{DatasetSummary, ImageRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Envelope shared by every dataset endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetsPayload {
    pub datasets: BTreeMap<&'static str, DatasetSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSamplesRequest {
    pub dataset_key: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub num_samples: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplesPayload {
    pub images: Vec<ImageRecord>,
    pub organized_images: BTreeMap<String, Vec<ImageRecord>>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchTestImageRequest {
    pub dataset_key: Option<String>,
    pub class_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestImagePayload {
    pub image: ImageRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassImagesQuery {
    pub dataset: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImagesPayload {
    pub images: Vec<ImageRecord>,
}
