use crate::entities::projects;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_PAGE_LIMIT: i64 = 20;

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

/// Any value that is present, `null` included, becomes `Some`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Project name must be between 1 and 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub original_image_id: i32,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ProjectIdRequest {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ListProjectsRequest {
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[validate(range(min = 0, message = "Offset must not be negative"))]
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub public_only: bool,
}

impl Default for ListProjectsRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
            public_only: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProjectsResponse {
    pub projects: Vec<projects::Model>,
    pub total: u64,
}

/// Fields left as `None` are not touched. `description` distinguishes an
/// absent key (`None`) from an explicit `null` (`Some(None)`), which clears it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateProjectRequest {
    pub id: i64,
    #[validate(length(min = 1, max = 255, message = "Project name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    pub current_image_path: Option<String>,
    pub operations_history: Option<String>,
    pub is_public: Option<bool>,
}
