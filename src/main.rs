use ai_photo_editor::config::{AppConfig, ProcessorKind};
use ai_photo_editor::infrastructure::{database, storage};
use ai_photo_editor::services::processor::PassthroughProcessor;
use ai_photo_editor::services::worker::OperationWorker;
use ai_photo_editor::{AppState, create_app};
use clap::{Parser, ValueEnum};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Api,
    Worker,
    All,
}

impl Mode {
    fn runs_api(self) -> bool {
        matches!(self, Mode::Api | Mode::All)
    }

    fn runs_worker(self) -> bool {
        matches!(self, Mode::Worker | Mode::All)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Service type to run
    #[arg(short, long, value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Port for the API server
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment & logging
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_photo_editor=info,tower_http=info,metrics=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting AI Photo Editor backend [Mode: {:?}]...", args.mode);

    // 2. Common infrastructure
    let config = AppConfig::from_env();
    info!(
        "🛡️  Config: Max Upload={}MB, Processor={:?}, Origins={}",
        config.max_upload_size / 1024 / 1024,
        config.operation_processor,
        config.allowed_origins.join(",")
    );

    let db = database::setup_database(&config.database_url).await?;
    let storage_service = storage::setup_storage(&config.storage_root).await?;

    // 3. Graceful shutdown channel
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let mut handles = Vec::new();

    // 4. Operation worker
    if args.mode.runs_worker() {
        match config.operation_processor {
            ProcessorKind::Passthrough => {
                let worker = OperationWorker::new(
                    db.clone(),
                    Arc::new(PassthroughProcessor::new(storage_service.clone())),
                    Duration::from_secs(config.worker_poll_interval_secs),
                    shutdown_rx.clone(),
                );
                handles.push(tokio::spawn(worker.run()));
                info!("👷 Operation worker initialized.");
            }
            ProcessorKind::None => {
                warn!("⚠️  No operation processor configured; operations will stay pending.");
            }
        }
    }

    // 5. API server
    if args.mode.runs_api() {
        let state = AppState {
            db: db.clone(),
            storage: storage_service.clone(),
            config: config.clone(),
        };

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            })
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                info!("📥 {} {}", request.method(), request.uri());
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    info!(
                        "📤 Finished in {:?} with status {}",
                        latency,
                        response.status()
                    );
                },
            );

        let app = create_app(state).layer(trace_layer);
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("✅ API Server listening on: http://0.0.0.0:{}", args.port);
        info!(
            "📖 Swagger UI documentation: http://localhost:{}/swagger-ui",
            args.port
        );

        let mut server_shutdown = shutdown_rx.clone();
        handles.push(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.changed().await;
                })
                .await
            {
                error!("❌ Server runtime error: {}", e);
            }
        }));
    }

    // 6. Wait for a signal, then fan it out
    shutdown_signal().await;
    let _ = shutdown_tx.send(true);

    info!("🛑 Shutting down backend services...");

    for handle in handles {
        if let Err(e) = handle.await {
            error!("❌ Service task ended abnormally: {}", e);
        }
    }

    info!("👋 Backend exited cleanly.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, initiating graceful shutdown...");
        },
    }
}
