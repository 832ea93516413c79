use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::images::UploadImageRequest;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

pub struct ImageService;

impl ImageService {
    /// Records metadata of an image whose bytes are already in storage.
    pub async fn upload(
        db: &DatabaseConnection,
        req: UploadImageRequest,
    ) -> Result<images::Model, AppError> {
        let now = Utc::now();
        let image = images::ActiveModel {
            filename: Set(req.filename),
            original_filename: Set(req.original_filename),
            file_path: Set(req.file_path),
            file_size: Set(req.file_size),
            mime_type: Set(req.mime_type),
            width: Set(req.width),
            height: Set(req.height),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let image = image
            .insert(db)
            .await
            .inspect_err(|e| tracing::error!("Failed to insert image: {}", e))?;

        tracing::info!("🖼️  Image {} recorded ({})", image.id, image.file_path);
        Ok(image)
    }

    /// Non-positive and unknown ids both resolve to `None`.
    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<images::Model>, AppError> {
        if id <= 0 {
            return Ok(None);
        }

        Ok(Images::find_by_id(id).one(db).await?)
    }

    /// Same as [`ImageService::get`] but absence is a referential error.
    pub async fn require(db: &DatabaseConnection, id: i32) -> Result<images::Model, AppError> {
        Self::get(db, id)
            .await?
            .ok_or_else(|| AppError::image_not_found(id))
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<images::Model>, AppError> {
        Ok(Images::find()
            .order_by_desc(images::Column::CreatedAt)
            .order_by_desc(images::Column::Id)
            .all(db)
            .await?)
    }

    /// Deletes the row; operations and projects go with it through the
    /// foreign key cascade. Returns `false` when nothing matched.
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, AppError> {
        if id <= 0 {
            return Ok(false);
        }

        let res = Images::delete_by_id(id)
            .exec(db)
            .await
            .inspect_err(|e| tracing::error!("Failed to delete image {}: {}", id, e))?;

        if res.rows_affected > 0 {
            tracing::info!("🗑️  Image {} deleted", id);
        }
        Ok(res.rows_affected > 0)
    }
}
