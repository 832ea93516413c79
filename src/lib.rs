pub mod api;
pub mod client;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::storage::StorageService;
use axum::{
    Router,
    http::{HeaderName, HeaderValue},
    middleware::from_fn,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::images::upload_image,
        api::handlers::images::get_image,
        api::handlers::images::list_images,
        api::handlers::images::delete_image,
        api::handlers::operations::remove_object,
        api::handlers::operations::apply_style_transfer,
        api::handlers::operations::modify_image,
        api::handlers::operations::get_operation_result,
        api::handlers::operations::list_operations,
        api::handlers::projects::create_project,
        api::handlers::projects::get_project,
        api::handlers::projects::list_projects,
        api::handlers::projects::update_project,
        api::handlers::files::upload_file,
        api::handlers::files::get_file,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            entities::images::Model,
            entities::ai_operations::Model,
            entities::ai_operations::OperationType,
            entities::ai_operations::OperationStatus,
            entities::projects::Model,
            models::images::UploadImageRequest,
            models::images::ImageIdRequest,
            models::images::DeleteImageResponse,
            models::operations::ObjectRemovalParameters,
            models::operations::StyleTransferParameters,
            models::operations::ModificationParameters,
            models::operations::RemoveObjectRequest,
            models::operations::StyleTransferRequest,
            models::operations::ModifyImageRequest,
            models::operations::OperationResultRequest,
            models::operations::ListOperationsRequest,
            models::projects::CreateProjectRequest,
            models::projects::ProjectIdRequest,
            models::projects::ListProjectsRequest,
            models::projects::ListProjectsResponse,
            models::projects::UpdateProjectRequest,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "images", description = "Image ingestion and lookup"),
        (name = "operations", description = "AI operation requests and results"),
        (name = "projects", description = "Saved editing sessions"),
        (name = "system", description = "Health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub storage: Arc<dyn StorageService>,
    pub config: AppConfig,
}

/// Procedure name → handler. Every procedure is a `POST` with a JSON body.
fn rpc_routes() -> Router<AppState> {
    use api::handlers::{images, operations, projects};

    Router::new()
        .route("/uploadImage", post(images::upload_image))
        .route("/getImage", post(images::get_image))
        .route("/listImages", post(images::list_images))
        .route("/deleteImage", post(images::delete_image))
        .route("/removeObject", post(operations::remove_object))
        .route("/applyStyleTransfer", post(operations::apply_style_transfer))
        .route("/modifyImage", post(operations::modify_image))
        .route("/getOperationResult", post(operations::get_operation_result))
        .route("/listOperations", post(operations::list_operations))
        .route("/createProject", post(projects::create_project))
        .route("/getProject", post(projects::get_project))
        .route("/listProjects", post(projects::list_projects))
        .route("/updateProject", post(projects::update_project))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(
            api::middleware::request_id::REQUEST_ID_HEADER,
        )]);

    if allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        ))
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .nest("/rpc", rpc_routes())
        .route("/upload", post(api::handlers::files::upload_file))
        .route("/files/*key", get(api::handlers::files::get_file))
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_upload_size + 1024 * 1024, // multipart framing overhead
        ))
        .with_state(state)
}
