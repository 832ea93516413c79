//! Typed HTTP client for the RPC surface.
//!
//! Mirrors how the browser frontend talks to the backend, including its
//! bounded polling of `getOperationResult` while an operation is in flight.

use crate::entities::{ai_operations, images, projects};
use crate::models::images::{ImageIdRequest, UploadImageRequest};
use crate::models::operations::{
    ListOperationsRequest, ModifyImageRequest, OperationResultRequest, RemoveObjectRequest,
    StyleTransferRequest,
};
use crate::models::projects::{
    CreateProjectRequest, ListProjectsRequest, ListProjectsResponse, ProjectIdRequest,
    UpdateProjectRequest,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub type ClientResult<T> = Result<T, ClientError>;

/// How long to keep re-polling an operation that has not finished.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Reached `completed` or `failed`.
    Finished(ai_operations::Model),
    /// Attempts ran out; carries the last row seen.
    TimedOut(ai_operations::Model),
    /// The operation no longer exists (e.g. its image was deleted).
    Missing,
}

#[derive(Clone)]
pub struct EditorClient {
    http: reqwest::Client,
    base_url: String,
}

impl EditorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Calls `procedure` with `input` and decodes its JSON output.
    pub async fn call<I, O>(&self, procedure: &str, input: &I) -> ClientResult<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = format!("{}/rpc/{}", self.base_url, procedure);
        let response = self.http.post(&url).json(input).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| body["error"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());

            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<O>().await?)
    }

    pub async fn upload_image(&self, req: &UploadImageRequest) -> ClientResult<images::Model> {
        self.call("uploadImage", req).await
    }

    pub async fn get_image(&self, id: i32) -> ClientResult<Option<images::Model>> {
        self.call("getImage", &ImageIdRequest { id: id.into() }).await
    }

    pub async fn remove_object(
        &self,
        req: &RemoveObjectRequest,
    ) -> ClientResult<ai_operations::Model> {
        self.call("removeObject", req).await
    }

    pub async fn apply_style_transfer(
        &self,
        req: &StyleTransferRequest,
    ) -> ClientResult<ai_operations::Model> {
        self.call("applyStyleTransfer", req).await
    }

    pub async fn modify_image(
        &self,
        req: &ModifyImageRequest,
    ) -> ClientResult<ai_operations::Model> {
        self.call("modifyImage", req).await
    }

    pub async fn get_operation_result(
        &self,
        operation_id: i32,
    ) -> ClientResult<Option<ai_operations::Model>> {
        let req = OperationResultRequest {
            operation_id: operation_id.into(),
        };
        self.call("getOperationResult", &req).await
    }

    pub async fn list_operations(
        &self,
        image_id: Option<i32>,
    ) -> ClientResult<Vec<ai_operations::Model>> {
        self.call("listOperations", &ListOperationsRequest { image_id })
            .await
    }

    pub async fn create_project(
        &self,
        req: &CreateProjectRequest,
    ) -> ClientResult<projects::Model> {
        self.call("createProject", req).await
    }

    pub async fn get_project(&self, id: i32) -> ClientResult<Option<projects::Model>> {
        self.call("getProject", &ProjectIdRequest { id: id.into() }).await
    }

    pub async fn list_projects(
        &self,
        req: &ListProjectsRequest,
    ) -> ClientResult<ListProjectsResponse> {
        self.call("listProjects", req).await
    }

    pub async fn update_project(
        &self,
        req: &UpdateProjectRequest,
    ) -> ClientResult<Option<projects::Model>> {
        self.call("updateProject", req).await
    }

    /// Re-polls the operation until it finishes or the policy runs out.
    /// The first poll happens immediately.
    pub async fn wait_for_operation(
        &self,
        operation_id: i32,
        policy: PollPolicy,
    ) -> ClientResult<PollOutcome> {
        let mut last_seen = None;

        for attempt in 0..policy.max_attempts.max(1) {
            if attempt > 0 {
                tokio::time::sleep(policy.interval).await;
            }

            let Some(op) = self.get_operation_result(operation_id).await? else {
                return Ok(PollOutcome::Missing);
            };

            if op.status.is_terminal() {
                return Ok(PollOutcome::Finished(op));
            }

            tracing::debug!(
                "Operation {} still {} (attempt {}/{})",
                operation_id,
                op.status.as_str(),
                attempt + 1,
                policy.max_attempts
            );
            last_seen = Some(op);
        }

        Ok(last_seen.map_or(PollOutcome::Missing, PollOutcome::TimedOut))
    }
}
