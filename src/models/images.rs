use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Metadata of an already-stored image file.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct UploadImageRequest {
    #[validate(length(min = 1, max = 255, message = "Filename must be between 1 and 255 characters"))]
    pub filename: String,
    #[validate(length(min = 1, max = 255, message = "Original filename must be between 1 and 255 characters"))]
    pub original_filename: String,
    #[validate(length(min = 1, message = "File path must not be empty"))]
    pub file_path: String,
    #[validate(range(min = 1, message = "File size must be positive"))]
    pub file_size: i64,
    #[validate(length(min = 1, message = "MIME type must not be empty"))]
    pub mime_type: String,
    #[validate(range(min = 1, message = "Width must be positive"))]
    pub width: i32,
    #[validate(range(min = 1, message = "Height must be positive"))]
    pub height: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
pub struct ImageIdRequest {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteImageResponse {
    pub deleted: bool,
}

