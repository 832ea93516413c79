use crate::api::error::AppError;
use crate::api::extract::RpcInput;
use crate::entities::ai_operations;
use crate::models::operations::{
    ListOperationsRequest, ModifyImageRequest, OperationResultRequest, RemoveObjectRequest,
    StyleTransferRequest,
};
use crate::models::row_id;
use crate::services::operation_service::OperationService;
use axum::{Json, extract::State};

#[utoipa::path(
    post,
    path = "/rpc/removeObject",
    request_body = RemoveObjectRequest,
    responses(
        (status = 200, description = "Operation queued as pending", body = AiOperation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Image not found")
    ),
    tag = "operations"
)]
pub async fn remove_object(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<RemoveObjectRequest>,
) -> Result<Json<ai_operations::Model>, AppError> {
    let op = OperationService::remove_object(&state.db, req).await?;
    Ok(Json(op))
}

#[utoipa::path(
    post,
    path = "/rpc/applyStyleTransfer",
    request_body = StyleTransferRequest,
    responses(
        (status = 200, description = "Operation queued as pending", body = AiOperation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Image not found")
    ),
    tag = "operations"
)]
pub async fn apply_style_transfer(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<StyleTransferRequest>,
) -> Result<Json<ai_operations::Model>, AppError> {
    let op = OperationService::apply_style_transfer(&state.db, req).await?;
    Ok(Json(op))
}

#[utoipa::path(
    post,
    path = "/rpc/modifyImage",
    request_body = ModifyImageRequest,
    responses(
        (status = 200, description = "Operation queued as pending", body = AiOperation),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Image not found")
    ),
    tag = "operations"
)]
pub async fn modify_image(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ModifyImageRequest>,
) -> Result<Json<ai_operations::Model>, AppError> {
    let op = OperationService::modify_image(&state.db, req).await?;
    Ok(Json(op))
}

#[utoipa::path(
    post,
    path = "/rpc/getOperationResult",
    request_body = OperationResultRequest,
    responses(
        (status = 200, description = "Operation, or null when absent", body = Option<AiOperation>)
    ),
    tag = "operations"
)]
pub async fn get_operation_result(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<OperationResultRequest>,
) -> Result<Json<Option<ai_operations::Model>>, AppError> {
    let op = match row_id(req.operation_id) {
        Some(id) => OperationService::get(&state.db, id).await?,
        None => None,
    };
    Ok(Json(op))
}

#[utoipa::path(
    post,
    path = "/rpc/listOperations",
    request_body = ListOperationsRequest,
    responses(
        (status = 200, description = "Operations, newest first", body = Vec<AiOperation>)
    ),
    tag = "operations"
)]
pub async fn list_operations(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ListOperationsRequest>,
) -> Result<Json<Vec<ai_operations::Model>>, AppError> {
    let ops = OperationService::list(&state.db, req.image_id).await?;
    Ok(Json(ops))
}
