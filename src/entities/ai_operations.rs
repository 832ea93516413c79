use sea_orm::entity::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Values of the `ai_operation_type` enum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(32))",
    enum_name = "ai_operation_type"
)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    #[sea_orm(string_value = "object_removal")]
    ObjectRemoval,
    #[sea_orm(string_value = "style_transfer")]
    StyleTransfer,
    #[sea_orm(string_value = "image_modification")]
    ImageModification,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::ObjectRemoval => "object_removal",
            OperationType::StyleTransfer => "style_transfer",
            OperationType::ImageModification => "image_modification",
        }
    }
}

/// Values of the `ai_operation_status` enum.
///
/// Operations are created `Pending`. Only a transformation worker moves them
/// on, along `Pending -> Processing -> Completed | Failed`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(16))",
    enum_name = "ai_operation_status"
)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Pending => "pending",
            OperationStatus::Processing => "processing",
            OperationStatus::Completed => "completed",
            OperationStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }

    pub fn can_transition_to(self, next: OperationStatus) -> bool {
        matches!(
            (self, next),
            (OperationStatus::Pending, OperationStatus::Processing)
                | (OperationStatus::Processing, OperationStatus::Completed)
                | (OperationStatus::Processing, OperationStatus::Failed)
        )
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "ai_operations")]
#[schema(as = AiOperation)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub image_id: i32,
    pub operation_type: OperationType,
    pub status: OperationStatus,
    #[sea_orm(column_type = "Text", nullable)]
    pub prompt: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub mask_data: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub parameters: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub result_image_path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub error_message: Option<String>,
    /// Seconds spent by the transformation worker.
    pub processing_time: Option<f64>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeUtc,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Decodes the stored parameter bag. `Ok(None)` when none was supplied.
    pub fn decode_parameters<T: DeserializeOwned>(&self) -> serde_json::Result<Option<T>> {
        self.parameters
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::images::Entity",
        from = "Column::ImageId",
        to = "super::images::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Images,
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
