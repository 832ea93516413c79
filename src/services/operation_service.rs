use crate::api::error::AppError;
use crate::entities::ai_operations::{OperationStatus, OperationType};
use crate::entities::{prelude::*, *};
use crate::models::operations::{ModifyImageRequest, RemoveObjectRequest, StyleTransferRequest};
use crate::services::image_service::ImageService;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, sea_query::Expr,
};
use serde::Serialize;

struct NewOperation {
    image_id: i32,
    operation_type: OperationType,
    prompt: Option<String>,
    mask_data: Option<String>,
    parameters: Option<String>,
}

pub struct OperationService;

impl OperationService {
    pub async fn remove_object(
        db: &DatabaseConnection,
        req: RemoveObjectRequest,
    ) -> Result<ai_operations::Model, AppError> {
        let new_op = NewOperation {
            image_id: req.image_id,
            operation_type: OperationType::ObjectRemoval,
            prompt: None,
            mask_data: Some(req.mask_data),
            parameters: encode_parameters(req.parameters.as_ref())?,
        };
        Self::create(db, new_op).await
    }

    pub async fn apply_style_transfer(
        db: &DatabaseConnection,
        req: StyleTransferRequest,
    ) -> Result<ai_operations::Model, AppError> {
        let new_op = NewOperation {
            image_id: req.image_id,
            operation_type: OperationType::StyleTransfer,
            prompt: Some(req.prompt),
            mask_data: None,
            parameters: encode_parameters(req.parameters.as_ref())?,
        };
        Self::create(db, new_op).await
    }

    pub async fn modify_image(
        db: &DatabaseConnection,
        req: ModifyImageRequest,
    ) -> Result<ai_operations::Model, AppError> {
        let new_op = NewOperation {
            image_id: req.image_id,
            operation_type: OperationType::ImageModification,
            prompt: Some(req.prompt),
            mask_data: req.mask_data,
            parameters: encode_parameters(req.parameters.as_ref())?,
        };
        Self::create(db, new_op).await
    }

    async fn create(
        db: &DatabaseConnection,
        new_op: NewOperation,
    ) -> Result<ai_operations::Model, AppError> {
        let image_id = new_op.image_id;

        // Explicit check gives the caller a readable error; the foreign key
        // still guards the insert if the image is deleted in between.
        ImageService::require(db, image_id).await?;

        let now = Utc::now();
        let op = ai_operations::ActiveModel {
            image_id: Set(image_id),
            operation_type: Set(new_op.operation_type),
            status: Set(OperationStatus::Pending),
            prompt: Set(new_op.prompt),
            mask_data: Set(new_op.mask_data),
            parameters: Set(new_op.parameters),
            result_image_path: Set(None),
            error_message: Set(None),
            processing_time: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let op = op
            .insert(db)
            .await
            .map_err(|e| referential_or_database(e, image_id))?;

        tracing::info!(
            "🎨 Operation {} ({}) queued for image {}",
            op.id,
            op.operation_type.as_str(),
            image_id
        );
        Ok(op)
    }

    pub async fn get(
        db: &DatabaseConnection,
        operation_id: i32,
    ) -> Result<Option<ai_operations::Model>, AppError> {
        if operation_id <= 0 {
            return Ok(None);
        }

        Ok(AiOperations::find_by_id(operation_id).one(db).await?)
    }

    /// Newest first, optionally restricted to one image.
    pub async fn list(
        db: &DatabaseConnection,
        image_id: Option<i32>,
    ) -> Result<Vec<ai_operations::Model>, AppError> {
        let mut select = AiOperations::find();
        if let Some(image_id) = image_id {
            select = select.filter(ai_operations::Column::ImageId.eq(image_id));
        }

        Ok(select
            .order_by_desc(ai_operations::Column::CreatedAt)
            .order_by_desc(ai_operations::Column::Id)
            .all(db)
            .await?)
    }

    /// Moves the oldest pending operation to `processing` and returns it.
    ///
    /// The move is a conditional update on `status = pending`, so two workers
    /// racing for the same row cannot both win it.
    pub async fn claim_next_pending(
        db: &DatabaseConnection,
    ) -> Result<Option<ai_operations::Model>, AppError> {
        loop {
            let Some(candidate) = AiOperations::find()
                .filter(ai_operations::Column::Status.eq(OperationStatus::Pending))
                .order_by_asc(ai_operations::Column::CreatedAt)
                .order_by_asc(ai_operations::Column::Id)
                .one(db)
                .await?
            else {
                return Ok(None);
            };

            let res = AiOperations::update_many()
                .col_expr(
                    ai_operations::Column::Status,
                    Expr::value(OperationStatus::Processing),
                )
                .col_expr(ai_operations::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(ai_operations::Column::Id.eq(candidate.id))
                .filter(ai_operations::Column::Status.eq(OperationStatus::Pending))
                .exec(db)
                .await?;

            if res.rows_affected == 0 {
                tracing::debug!("Operation {} claimed elsewhere, retrying", candidate.id);
                continue;
            }

            return Self::get(db, candidate.id).await;
        }
    }

    pub async fn mark_completed(
        db: &DatabaseConnection,
        operation_id: i32,
        result_image_path: String,
        processing_time: f64,
    ) -> Result<ai_operations::Model, AppError> {
        Self::finish(
            db,
            operation_id,
            OperationStatus::Completed,
            Some(result_image_path),
            None,
            processing_time,
        )
        .await
    }

    pub async fn mark_failed(
        db: &DatabaseConnection,
        operation_id: i32,
        error_message: String,
        processing_time: f64,
    ) -> Result<ai_operations::Model, AppError> {
        Self::finish(
            db,
            operation_id,
            OperationStatus::Failed,
            None,
            Some(error_message),
            processing_time,
        )
        .await
    }

    async fn finish(
        db: &DatabaseConnection,
        operation_id: i32,
        next: OperationStatus,
        result_image_path: Option<String>,
        error_message: Option<String>,
        processing_time: f64,
    ) -> Result<ai_operations::Model, AppError> {
        let current = Self::get(db, operation_id)
            .await?
            .ok_or_else(|| AppError::operation_not_found(operation_id))?;

        if !current.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Operation {} cannot move from {} to {}",
                operation_id,
                current.status.as_str(),
                next.as_str()
            )));
        }

        let res = AiOperations::update_many()
            .col_expr(ai_operations::Column::Status, Expr::value(next))
            .col_expr(
                ai_operations::Column::ResultImagePath,
                Expr::value(result_image_path),
            )
            .col_expr(
                ai_operations::Column::ErrorMessage,
                Expr::value(error_message),
            )
            .col_expr(
                ai_operations::Column::ProcessingTime,
                Expr::value(processing_time),
            )
            .col_expr(ai_operations::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(ai_operations::Column::Id.eq(operation_id))
            .filter(ai_operations::Column::Status.eq(current.status))
            .exec(db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "Operation {} changed status concurrently",
                operation_id
            )));
        }

        Self::get(db, operation_id)
            .await?
            .ok_or_else(|| AppError::operation_not_found(operation_id))
    }
}

/// An absent bag stays `NULL` rather than becoming `{}`.
fn encode_parameters<P: Serialize>(parameters: Option<&P>) -> Result<Option<String>, AppError> {
    parameters
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| AppError::Internal(format!("Failed to serialize parameters: {}", e)))
}

fn referential_or_database(err: DbErr, image_id: i32) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::image_not_found(image_id),
        _ => {
            tracing::error!("Failed to insert operation for image {}: {}", image_id, err);
            AppError::Database(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operations::ObjectRemovalParameters;

    #[test]
    fn test_absent_bag_is_not_stored() {
        let encoded = encode_parameters::<ObjectRemovalParameters>(None).unwrap();
        assert!(encoded.is_none());
    }

    #[test]
    fn test_bag_round_trips() {
        let params = ObjectRemovalParameters {
            inpaint_strength: 0.9,
            guidance_scale: 10.0,
        };
        let encoded = encode_parameters(Some(&params)).unwrap().unwrap();
        let decoded: ObjectRemovalParameters = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, params);
    }
}
