use crate::api::error::AppError;
use crate::entities::images;
use crate::models::images::UploadImageRequest;
use crate::services::image_service::ImageService;
use crate::services::metadata::MetadataService;
use crate::utils::validation::{sanitize_filename, validate_file_size};
use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Vec<u8>, description = "Multipart form with a `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored and recorded", body = Image),
        (status = 400, description = "Missing file or not a supported image"),
        (status = 413, description = "File too large")
    ),
    tag = "images"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    mut multipart: Multipart,
) -> Result<Json<images::Model>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let original_filename = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((original_filename, content_type, data));
    }

    let (original_filename, content_type, data) =
        upload.ok_or(AppError::BadRequest("No file provided".to_string()))?;

    if data.is_empty() {
        return Err(AppError::BadRequest("File appears to be empty".to_string()));
    }
    validate_file_size(data.len(), state.config.max_upload_size)
        .map_err(|e| AppError::PayloadTooLarge(e.to_string()))?;

    let original_filename =
        sanitize_filename(&original_filename).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let info = MetadataService::inspect_image(&data, content_type.as_deref())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let filename = format!("{}.{}", Uuid::new_v4(), info.extension());
    let key = format!("uploads/{}", filename);

    let req = UploadImageRequest {
        filename,
        original_filename,
        file_path: key.clone(),
        file_size: data.len() as i64,
        mime_type: info.mime_type.clone(),
        width: i32::try_from(info.width)
            .map_err(|_| AppError::BadRequest("Image is too wide".to_string()))?,
        height: i32::try_from(info.height)
            .map_err(|_| AppError::BadRequest("Image is too tall".to_string()))?,
    };
    req.validate()?;

    state
        .storage
        .put(&key, data.to_vec())
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store {}: {}", key, e)))?;

    match ImageService::upload(&state.db, req).await {
        Ok(image) => Ok(Json(image)),
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&key).await {
                tracing::warn!("Failed to remove orphaned upload {}: {}", key, cleanup);
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/files/{key}",
    params(
        ("key" = String, Path, description = "Storage key, e.g. uploads/<uuid>.png")
    ),
    responses(
        (status = 200, description = "File contents"),
        (status = 400, description = "Invalid key"),
        (status = 404, description = "File not found")
    ),
    tag = "images"
)]
pub async fn get_file(
    State(state): State<crate::AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let exists = state
        .storage
        .exists(&key)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !exists {
        return Err(AppError::NotFound(format!("File {} not found", key)));
    }

    let data = state
        .storage
        .get(&key)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read {}: {}", key, e)))?;

    let content_type = infer::get(&data)
        .map(|k| k.mime_type())
        .unwrap_or("application/octet-stream");

    Ok(([(header::CONTENT_TYPE, content_type.to_string())], data).into_response())
}
