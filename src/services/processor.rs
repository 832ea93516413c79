use crate::entities::{ai_operations, images};
use crate::services::storage::StorageService;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Output of a transformation: where the result image was written.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    pub result_image_path: String,
}

/// Contract for whatever performs the actual AI transformation.
///
/// The worker hands over one claimed operation and its source image. An
/// `Ok` marks the operation completed with the returned path; an `Err`
/// marks it failed with the error text. Elapsed time is recorded either way.
#[async_trait::async_trait]
pub trait OperationProcessor: Send + Sync {
    async fn process(
        &self,
        operation: &ai_operations::Model,
        image: &images::Model,
    ) -> Result<ProcessedImage>;

    fn name(&self) -> &'static str;
}

/// Development processor: the "result" is a byte-for-byte copy of the source.
pub struct PassthroughProcessor {
    storage: Arc<dyn StorageService>,
}

impl PassthroughProcessor {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self { storage }
    }
}

#[async_trait::async_trait]
impl OperationProcessor for PassthroughProcessor {
    async fn process(
        &self,
        operation: &ai_operations::Model,
        image: &images::Model,
    ) -> Result<ProcessedImage> {
        let result_key = result_key_for(operation, &image.file_path);
        self.storage.copy(&image.file_path, &result_key).await?;

        Ok(ProcessedImage {
            result_image_path: result_key,
        })
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}

/// `results/<operation id>-<operation type>.<source extension>`
pub fn result_key_for(operation: &ai_operations::Model, source_path: &str) -> String {
    let stem = format!(
        "results/{}-{}",
        operation.id,
        operation.operation_type.as_str()
    );

    match Path::new(source_path).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext.to_lowercase()),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ai_operations::{OperationStatus, OperationType};
    use chrono::Utc;

    fn operation(id: i32, operation_type: OperationType) -> ai_operations::Model {
        ai_operations::Model {
            id,
            image_id: 1,
            operation_type,
            status: OperationStatus::Processing,
            prompt: None,
            mask_data: None,
            parameters: None,
            result_image_path: None,
            error_message: None,
            processing_time: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_result_key_keeps_extension() {
        let op = operation(7, OperationType::StyleTransfer);
        assert_eq!(
            result_key_for(&op, "uploads/abc.PNG"),
            "results/7-style_transfer.png"
        );
        assert_eq!(
            result_key_for(&op, "uploads/noext"),
            "results/7-style_transfer"
        );
    }
}
