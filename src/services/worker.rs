use crate::api::error::AppError;
use crate::entities::ai_operations;
use crate::services::image_service::ImageService;
use crate::services::operation_service::OperationService;
use crate::services::processor::OperationProcessor;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tokio::time::{Duration, sleep};

/// Drives pending operations through the configured processor.
pub struct OperationWorker {
    db: DatabaseConnection,
    processor: Arc<dyn OperationProcessor>,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl OperationWorker {
    pub fn new(
        db: DatabaseConnection,
        processor: Arc<dyn OperationProcessor>,
        poll_interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            db,
            processor,
            poll_interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            "🚀 Operation worker started (processor: {}, poll every {:?})",
            self.processor.name(),
            self.poll_interval
        );

        loop {
            tokio::select! {
                _ = self.shutdown.changed() => {
                    tracing::info!("🛑 Operation worker shutting down");
                    break;
                }
                _ = sleep(self.poll_interval) => {
                    self.drain().await;
                }
            }
        }
    }

    /// Processes pending operations until none are left.
    async fn drain(&self) {
        loop {
            if *self.shutdown.borrow() {
                return;
            }

            match self.run_once().await {
                Ok(Some(_)) => continue,
                Ok(None) => return,
                Err(e) => {
                    tracing::error!("❌ Operation worker iteration failed: {}", e);
                    return;
                }
            }
        }
    }

    /// Claims and processes a single operation, returning its final row.
    /// `Ok(None)` means nothing was pending.
    pub async fn run_once(&self) -> Result<Option<ai_operations::Model>, AppError> {
        let Some(operation) = OperationService::claim_next_pending(&self.db).await? else {
            return Ok(None);
        };

        tracing::info!(
            "⚙️  Processing operation {} ({})",
            operation.id,
            operation.operation_type.as_str()
        );

        let started = Instant::now();
        let outcome = match ImageService::get(&self.db, operation.image_id).await {
            Ok(Some(image)) => self.processor.process(&operation, &image).await,
            Ok(None) => Err(anyhow::anyhow!(
                "Image with id {} not found",
                operation.image_id
            )),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to load image {}: {}",
                operation.image_id,
                e
            )),
        };
        let elapsed = started.elapsed().as_secs_f64();

        let finished = match outcome {
            Ok(processed) => {
                tracing::info!(
                    "✅ Operation {} completed in {:.3}s -> {}",
                    operation.id,
                    elapsed,
                    processed.result_image_path
                );
                match OperationService::mark_completed(
                    &self.db,
                    operation.id,
                    processed.result_image_path,
                    elapsed,
                )
                .await
                {
                    Ok(done) => done,
                    Err(e) => {
                        // A claimed row must not be left in `processing`
                        tracing::error!(
                            "❌ Failed to record result of operation {}: {}",
                            operation.id,
                            e
                        );
                        self.fail(operation.id, format!("Failed to record result: {}", e), elapsed)
                            .await?
                    }
                }
            }
            Err(e) => {
                tracing::warn!("⚠️  Operation {} failed: {}", operation.id, e);
                self.fail(operation.id, e.to_string(), elapsed).await?
            }
        };

        Ok(Some(finished))
    }

    async fn fail(
        &self,
        operation_id: i32,
        message: String,
        elapsed: f64,
    ) -> Result<ai_operations::Model, AppError> {
        OperationService::mark_failed(&self.db, operation_id, message, elapsed)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "❌ Operation {} left in processing, could not mark failed: {}",
                    operation_id,
                    e
                )
            })
    }
}
