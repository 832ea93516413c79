use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::models::projects::{CreateProjectRequest, ListProjectsRequest, UpdateProjectRequest};
use crate::models::row_id;
use crate::services::image_service::ImageService;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

/// Stored history of a freshly created project.
pub const EMPTY_HISTORY: &str = "[]";

pub struct ProjectService;

impl ProjectService {
    pub async fn create(
        db: &DatabaseConnection,
        req: CreateProjectRequest,
    ) -> Result<projects::Model, AppError> {
        let image = ImageService::require(db, req.original_image_id).await?;

        let now = Utc::now();
        let project = projects::ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            original_image_id: Set(image.id),
            current_image_path: Set(image.file_path),
            operations_history: Set(EMPTY_HISTORY.to_string()),
            is_public: Set(req.is_public),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let project = project.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::image_not_found(image.id),
            _ => {
                tracing::error!("Failed to insert project: {}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("📁 Project {} created from image {}", project.id, image.id);
        Ok(project)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<projects::Model>, AppError> {
        if id <= 0 {
            return Ok(None);
        }

        Ok(Projects::find_by_id(id).one(db).await?)
    }

    /// Returns one page plus the total number of matching rows.
    ///
    /// Page and total come from two separate statements and may disagree
    /// under concurrent writes.
    pub async fn list(
        db: &DatabaseConnection,
        req: &ListProjectsRequest,
    ) -> Result<(Vec<projects::Model>, u64), AppError> {
        let mut select = Projects::find();
        if req.public_only {
            select = select.filter(projects::Column::IsPublic.eq(true));
        }

        let total = select.clone().count(db).await?;

        let page = select
            .order_by_desc(projects::Column::CreatedAt)
            .order_by_desc(projects::Column::Id)
            .limit(req.limit.max(1) as u64)
            .offset(req.offset.max(0) as u64)
            .all(db)
            .await?;

        Ok((page, total))
    }

    /// Applies whichever fields are present. An unknown id yields `None`.
    pub async fn update(
        db: &DatabaseConnection,
        req: UpdateProjectRequest,
    ) -> Result<Option<projects::Model>, AppError> {
        let Some(id) = row_id(req.id) else {
            return Ok(None);
        };
        let Some(existing) = Self::get(db, id).await? else {
            return Ok(None);
        };

        let previous_update = existing.updated_at;
        let mut active_model = existing.into_active_model();

        if let Some(name) = req.name {
            active_model.name = Set(name);
        }
        if let Some(description) = req.description {
            active_model.description = Set(description);
        }
        if let Some(path) = req.current_image_path {
            active_model.current_image_path = Set(path);
        }
        if let Some(history) = req.operations_history {
            active_model.operations_history = Set(history);
        }
        if let Some(is_public) = req.is_public {
            active_model.is_public = Set(is_public);
        }
        active_model.updated_at = Set(next_update_time(previous_update, Utc::now()));

        let updated = active_model
            .update(db)
            .await
            .inspect_err(|e| tracing::error!("Failed to update project {}: {}", req.id, e))?;

        Ok(Some(updated))
    }
}

/// `updated_at` must move forward on every update, even when the clock has
/// not advanced past the stored value.
fn next_update_time(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_time_moves_forward() {
        let previous = Utc::now();
        let later = previous + Duration::seconds(1);
        assert_eq!(next_update_time(previous, later), later);

        let stalled = next_update_time(previous, previous);
        assert!(stalled > previous);

        let skewed = next_update_time(previous, previous - Duration::seconds(5));
        assert!(skewed > previous);
    }
}
