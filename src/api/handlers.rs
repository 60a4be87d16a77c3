//! API handlers

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::AppState;
use crate::storage::Provider;
use crate::Error;

/// Health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Upload an asset to object storage
///
/// Accepts a multipart form with a `file` field, stores it under its
/// original filename, and returns a fresh asset UUID. With S3 disabled
/// the aggregator transparently lands the file under the local root.
pub async fn upload_asset(
    State(state): State<AppState>,
    Query(params): Query<UploadAssetParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadAssetResponse>, (StatusCode, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, "File field needs a filename".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

        state
            .aggregator
            .write(
                Provider::S3,
                &file_name,
                data,
                params.bucket.as_deref(),
                content_type.as_deref(),
            )
            .await
            .map_err(error_status)?;

        return Ok(Json(UploadAssetResponse {
            uuid: Uuid::new_v4(),
        }));
    }

    Err((
        StatusCode::BAD_REQUEST,
        "Multipart form must contain a 'file' field".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UploadAssetParams {
    /// Target bucket; required when S3 is enabled.
    pub bucket: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadAssetResponse {
    pub uuid: Uuid,
}

/// Map a storage error onto an HTTP status with its message.
fn error_status(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) | Error::EmptyPrefix(_) => StatusCode::NOT_FOUND,
        Error::BackendUnavailable(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
