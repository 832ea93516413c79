use crate::entities::{ai_operations, images, projects};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use std::time::Duration;
use tracing::info;

pub async fn setup_database(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    info!("📂 Database: {}", database_url);

    let db = connect(database_url).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

pub async fn connect(database_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url);

    // Every pooled connection to `sqlite::memory:` would see its own empty
    // database, so the pool is pinned to a single connection.
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(100)
            .min_connections(5)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800));
    }

    opt.connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    Ok(Database::connect(opt).await?)
}

pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    info!("🔄 Running auto-migrations...");

    // Order matters for foreign keys: images before its dependents
    let stmts = vec![
        (
            "images",
            schema
                .create_table_from_entity(images::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "ai_operations",
            schema
                .create_table_from_entity(ai_operations::Entity)
                .if_not_exists()
                .to_owned(),
        ),
        (
            "projects",
            schema
                .create_table_from_entity(projects::Entity)
                .if_not_exists()
                .to_owned(),
        ),
    ];

    for (name, stmt) in stmts {
        let stmt = builder.build(&stmt);
        db.execute(stmt).await.inspect_err(|e| {
            tracing::error!("   - Failed to create table '{}': {}", name, e);
        })?;
        info!("   - Table '{}' checked/created", name);
    }

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_ai_operations_image_id ON ai_operations(image_id)",
        "CREATE INDEX IF NOT EXISTS idx_ai_operations_status ON ai_operations(status)",
        "CREATE INDEX IF NOT EXISTS idx_ai_operations_created_at ON ai_operations(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_projects_original_image_id ON projects(original_image_id)",
        "CREATE INDEX IF NOT EXISTS idx_projects_is_public ON projects(is_public)",
        "CREATE INDEX IF NOT EXISTS idx_projects_created_at ON projects(created_at)",
    ];

    for query in indexes {
        match db
            .execute(sea_orm::Statement::from_string(builder, query.to_owned()))
            .await
        {
            Ok(_) => tracing::debug!("   - Index ensured: {}", query),
            Err(e) => tracing::warn!("   - Index creation warning: {} -> {}", query, e),
        }
    }

    Ok(())
}
