use crate::api::error::AppError;
use crate::api::extract::RpcInput;
use crate::entities::images;
use crate::models::images::{DeleteImageResponse, ImageIdRequest, UploadImageRequest};
use crate::models::row_id;
use crate::services::image_service::ImageService;
use axum::{Json, extract::State};

#[utoipa::path(
    post,
    path = "/rpc/uploadImage",
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Image recorded", body = Image),
        (status = 400, description = "Invalid image metadata")
    ),
    tag = "images"
)]
pub async fn upload_image(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<UploadImageRequest>,
) -> Result<Json<images::Model>, AppError> {
    let image = ImageService::upload(&state.db, req).await?;
    Ok(Json(image))
}

#[utoipa::path(
    post,
    path = "/rpc/getImage",
    request_body = ImageIdRequest,
    responses(
        (status = 200, description = "Image, or null when absent", body = Option<Image>)
    ),
    tag = "images"
)]
pub async fn get_image(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ImageIdRequest>,
) -> Result<Json<Option<images::Model>>, AppError> {
    let image = match row_id(req.id) {
        Some(id) => ImageService::get(&state.db, id).await?,
        None => None,
    };
    Ok(Json(image))
}

#[utoipa::path(
    post,
    path = "/rpc/listImages",
    responses(
        (status = 200, description = "All images, newest first", body = Vec<Image>)
    ),
    tag = "images"
)]
pub async fn list_images(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<images::Model>>, AppError> {
    let images = ImageService::list(&state.db).await?;
    Ok(Json(images))
}

#[utoipa::path(
    post,
    path = "/rpc/deleteImage",
    request_body = ImageIdRequest,
    responses(
        (status = 200, description = "Whether a row was deleted", body = DeleteImageResponse)
    ),
    tag = "images"
)]
pub async fn delete_image(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ImageIdRequest>,
) -> Result<Json<DeleteImageResponse>, AppError> {
    let Some(id) = row_id(req.id) else {
        return Ok(Json(DeleteImageResponse { deleted: false }));
    };

    let image = ImageService::get(&state.db, id).await?;
    let deleted = ImageService::delete(&state.db, id).await?;

    // The row is gone; a leftover file is only worth a warning
    if let Some(image) = image.filter(|_| deleted) {
        if let Err(e) = state.storage.delete(&image.file_path).await {
            tracing::warn!("Failed to remove stored file {}: {}", image.file_path, e);
        }
    }

    Ok(Json(DeleteImageResponse { deleted }))
}
