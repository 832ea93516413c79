use crate::api::error::AppError;
use crate::api::extract::RpcInput;
use crate::entities::projects;
use crate::models::projects::{
    CreateProjectRequest, ListProjectsRequest, ListProjectsResponse, ProjectIdRequest,
    UpdateProjectRequest,
};
use crate::models::row_id;
use crate::services::project_service::ProjectService;
use axum::{Json, extract::State};

#[utoipa::path(
    post,
    path = "/rpc/createProject",
    request_body = CreateProjectRequest,
    responses(
        (status = 200, description = "Project created", body = Project),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Original image not found")
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<CreateProjectRequest>,
) -> Result<Json<projects::Model>, AppError> {
    let project = ProjectService::create(&state.db, req).await?;
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/rpc/getProject",
    request_body = ProjectIdRequest,
    responses(
        (status = 200, description = "Project, or null when absent", body = Option<Project>)
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ProjectIdRequest>,
) -> Result<Json<Option<projects::Model>>, AppError> {
    let project = match row_id(req.id) {
        Some(id) => ProjectService::get(&state.db, id).await?,
        None => None,
    };
    Ok(Json(project))
}

#[utoipa::path(
    post,
    path = "/rpc/listProjects",
    request_body = ListProjectsRequest,
    responses(
        (status = 200, description = "One page of projects and the total count", body = ListProjectsResponse),
        (status = 400, description = "Limit or offset out of range")
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<ListProjectsRequest>,
) -> Result<Json<ListProjectsResponse>, AppError> {
    let (projects, total) = ProjectService::list(&state.db, &req).await?;
    Ok(Json(ListProjectsResponse { projects, total }))
}

#[utoipa::path(
    post,
    path = "/rpc/updateProject",
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Updated project, or null for an unknown id", body = Option<Project>),
        (status = 400, description = "Invalid input")
    ),
    tag = "projects"
)]
pub async fn update_project(
    State(state): State<crate::AppState>,
    RpcInput(req): RpcInput<UpdateProjectRequest>,
) -> Result<Json<Option<projects::Model>>, AppError> {
    let project = ProjectService::update(&state.db, req).await?;
    Ok(Json(project))
}
