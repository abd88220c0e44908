//! Axum handlers for the dataset API.
//!
//! Every file-system touch runs on the blocking pool; handlers only parse the
//! request and map [`DatasetError`] onto a status code.

use super::AppState;
use super::api::{
    ApiResponse, ClassImagesQuery, DatasetsPayload, FetchSamplesRequest, FetchTestImageRequest,
    HealthResponse, ImagesPayload, SamplesPayload, TestImagePayload,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use medimg_core::{Catalog, DatasetError, DatasetKind};
use std::sync::Arc;

type Reply<T> = (StatusCode, Json<ApiResponse<T>>);

fn failure<T>(err: DatasetError) -> Reply<T> {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    if status.is_server_error() {
        tracing::error!("request failed: {err}");
    } else {
        tracing::warn!("request rejected ({status}): {err}");
    }
    (status, Json(ApiResponse::error(err.to_string())))
}

async fn run_catalog<T, F>(state: &AppState, query: F) -> Reply<T>
where
    T: Send + 'static,
    F: FnOnce(&Catalog) -> Result<T, DatasetError> + Send + 'static,
{
    let catalog = Arc::clone(&state.catalog);
    match tokio::task::spawn_blocking(move || query(&catalog)).await {
        Ok(Ok(data)) => (StatusCode::OK, Json(ApiResponse::success(data))),
        Ok(Err(err)) => failure(err),
        Err(e) => {
            tracing::error!("catalog task failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("MEDIMG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// List the known datasets and whether each has been downloaded
pub async fn list_datasets(State(state): State<AppState>) -> Reply<DatasetsPayload> {
    run_catalog(&state, |catalog| {
        let datasets = catalog
            .list()
            .into_iter()
            .map(|summary| (summary.kind.key(), summary))
            .collect();
        Ok(DatasetsPayload { datasets })
    })
    .await
}

/// Sample training images for a set of classes
pub async fn fetch_dataset_samples(
    State(state): State<AppState>,
    Json(payload): Json<FetchSamplesRequest>,
) -> Reply<SamplesPayload> {
    let kind = match DatasetKind::from_request(payload.dataset_key.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return failure(e),
    };
    let num_samples = payload.num_samples.unwrap_or(state.default_sample_count);
    let classes = payload.classes;

    run_catalog(&state, move |catalog| {
        let set = catalog.fetch_samples(kind, classes.as_slice(), num_samples)?;
        tracing::info!(
            "{kind}: {} of {} sampled images across {} classes",
            set.images.len(),
            set.count,
            set.organized.len()
        );
        Ok(SamplesPayload {
            images: set.images,
            organized_images: set.organized.into_iter().collect(),
            count: set.count,
        })
    })
    .await
}

/// Pick one random image from the test split
pub async fn fetch_test_image(
    State(state): State<AppState>,
    Json(payload): Json<FetchTestImageRequest>,
) -> Reply<TestImagePayload> {
    let kind = match DatasetKind::from_request(payload.dataset_key.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return failure(e),
    };

    run_catalog(&state, move |catalog| {
        let mut rng = rand::thread_rng();
        let image = catalog.random_test_image(kind, payload.class_name.as_deref(), &mut rng)?;
        Ok(TestImagePayload { image })
    })
    .await
}

/// Training images of one class
pub async fn class_images(
    State(state): State<AppState>,
    Path(class_name): Path<String>,
    Query(query): Query<ClassImagesQuery>,
) -> Reply<ImagesPayload> {
    let kind = match DatasetKind::from_request(query.dataset.as_deref()) {
        Ok(kind) => kind,
        Err(e) => return failure(e),
    };
    let limit = query.limit.unwrap_or(state.class_image_limit);

    run_catalog(&state, move |catalog| {
        let images = catalog.class_images(kind, &class_name, limit)?;
        Ok(ImagesPayload { images })
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimg_core::ServiceConfig;
    use std::fs::{self, File};
    use tempfile::{TempDir, tempdir};

    fn test_state(dir: &TempDir) -> AppState {
        let config = ServiceConfig {
            image_root: dir.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        AppState::new(&config).expect("state should build")
    }

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("mkdir");
        File::create(path).expect("create file");
    }

    fn samples_request(key: Option<&str>, classes: &[&str]) -> FetchSamplesRequest {
        FetchSamplesRequest {
            dataset_key: key.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            num_samples: None,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body.status, "ok");
        assert!(!body.version.is_empty());
        assert_eq!(body.version, body.version.trim());
    }

    #[tokio::test]
    async fn test_list_datasets() {
        let dir = tempdir().expect("tempdir");
        touch(&dir, "Dataset_BUSI_with_GT/benign/b.png");

        let (status, Json(body)) = list_datasets(State(test_state(&dir))).await;
        assert_eq!(status, StatusCode::OK);
        let datasets = body.data.expect("payload").datasets;
        assert!(datasets["breast_ultrasound"].available);
        assert!(!datasets["chest_xray"].available);
    }

    #[tokio::test]
    async fn test_fetch_samples_missing_key() {
        let dir = tempdir().expect("tempdir");
        let req = samples_request(None, &["Normal"]);

        let (status, Json(body)) = fetch_dataset_samples(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_fetch_samples_unknown_dataset() {
        let dir = tempdir().expect("tempdir");
        let req = samples_request(Some("retina_oct"), &["Normal"]);

        let (status, _) = fetch_dataset_samples(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fetch_samples_dataset_not_found() {
        let dir = tempdir().expect("tempdir");
        let req = samples_request(Some("chest_xray"), &["Normal", "Pneumonia"]);

        let (status, Json(body)) = fetch_dataset_samples(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.expect("message").contains("chest_xray"));
    }

    #[tokio::test]
    async fn test_fetch_samples() {
        let dir = tempdir().expect("tempdir");
        touch(&dir, "chest_xray/train/NORMAL/n1.jpeg");
        touch(&dir, "chest_xray/train/PNEUMONIA/p1.jpeg");
        touch(&dir, "chest_xray/train/PNEUMONIA/p2.jpeg");
        let mut req = samples_request(Some("chest_xray"), &["Normal", "Pneumonia"]);
        req.num_samples = Some(2);

        let (status, Json(body)) = fetch_dataset_samples(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::OK);
        let payload = body.data.expect("payload");
        assert_eq!(payload.count, 3);
        assert_eq!(payload.images.len(), 2);
        assert_eq!(payload.images[0].path, "/images/chest_xray/train/NORMAL/n1.jpeg");
        assert_eq!(payload.organized_images["Pneumonia"].len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_test_image_single_candidate() {
        let dir = tempdir().expect("tempdir");
        touch(&dir, "Dataset_BUSI_with_GT/malignant/malignant (3).png");
        touch(&dir, "Dataset_BUSI_with_GT/malignant/malignant (3)_mask.png");
        let req = FetchTestImageRequest {
            dataset_key: Some("breast_ultrasound".into()),
            class_name: Some("Malignant".into()),
        };

        let (status, Json(body)) = fetch_test_image(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.expect("payload").image.filename, "malignant (3).png");
    }

    #[tokio::test]
    async fn test_fetch_test_image_not_found() {
        let dir = tempdir().expect("tempdir");
        let req = FetchTestImageRequest {
            dataset_key: Some("chest_xray".into()),
            class_name: None,
        };

        let (status, _) = fetch_test_image(State(test_state(&dir)), Json(req)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_class_images() {
        let dir = tempdir().expect("tempdir");
        touch(&dir, "Dataset_BUSI_with_GT/normal/normal (1).png");
        let query = ClassImagesQuery {
            dataset: Some("breast_ultrasound".into()),
            limit: None,
        };

        let (status, Json(body)) =
            class_images(State(test_state(&dir)), Path("Normal".into()), Query(query)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.data.expect("payload").images.len(), 1);
    }

    #[tokio::test]
    async fn test_class_images_missing_class_is_empty() {
        let dir = tempdir().expect("tempdir");
        let query = ClassImagesQuery {
            dataset: Some("chest_xray".into()),
            limit: Some(5),
        };

        let (status, Json(body)) =
            class_images(State(test_state(&dir)), Path("Normal".into()), Query(query)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.data.expect("payload").images.is_empty());
    }

    #[tokio::test]
    async fn test_class_images_requires_dataset() {
        let dir = tempdir().expect("tempdir");

        let (status, _) = class_images(
            State(test_state(&dir)),
            Path("Normal".into()),
            Query(ClassImagesQuery::default()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_samples_unreadable_split_is_server_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        touch(&dir, "chest_xray/train/NORMAL/n1.jpeg");
        let train = dir.path().join("chest_xray/train");
        fs::set_permissions(&train, fs::Permissions::from_mode(0o000)).expect("lock");
        if fs::read_dir(&train).is_ok() {
            // Privileged users can list the locked folder.
            fs::set_permissions(&train, fs::Permissions::from_mode(0o755)).expect("unlock");
            return;
        }
        let req = samples_request(Some("chest_xray"), &["Normal"]);

        let (status, Json(body)) = fetch_dataset_samples(State(test_state(&dir)), Json(req)).await;
        fs::set_permissions(&train, fs::Permissions::from_mode(0o755)).expect("unlock");
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.success);
        assert!(body.error.is_some());
    }
}
