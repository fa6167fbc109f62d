//! Service planner HTTP server

mod config;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use clap::Parser;
use config::{AppConfig, LogFormat};
use service_planner::ServicePlannerModule;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "service_planner=info,planner_server=info,tower_http=info";

#[derive(Debug, Parser)]
#[command(name = "planner-server", version, about = "Service planner HTTP server")]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(
            error = %e,
            "Failed to listen for shutdown signal; graceful shutdown unavailable"
        );
        return;
    }
    tracing::info!("Shutdown requested");
    cancel.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_tracing(config.log_format);

    config::ensure_data_dir(&config.database_url)?;
    let db = sea_orm::Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database_url))?;
    tracing::info!("Database connection established");

    ServicePlannerModule::migrate(&db).await?;

    let module = ServicePlannerModule::new(db, config.planner.clone());
    let seeded = module.bootstrap().await?;
    if seeded.is_empty() {
        tracing::info!("Sample data not seeded");
    }

    // headroom above the import limit so oversized imports reach the planner's own check
    let body_limit = config.planner.max_import_bytes.saturating_mul(2);
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(module.router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Starting server");

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
