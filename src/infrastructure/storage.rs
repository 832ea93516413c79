use crate::services::storage::LocalStorageService;
use std::sync::Arc;
use tracing::info;

pub async fn setup_storage(storage_root: &str) -> anyhow::Result<Arc<LocalStorageService>> {
    tokio::fs::create_dir_all(storage_root).await?;

    info!("🗄️  Local storage: {}", storage_root);

    Ok(Arc::new(LocalStorageService::new(storage_root)))
}
