//! HRPredict Service - Main Entry Point
//!
//! Loads the frozen attrition classifier bundle, connects to the audit
//! database, and serves predictions over HTTP.

use actix_web::{web, App, HttpServer};
use anyhow::Result;
use hrpredict::{
    api::{self, AppState},
    artifact::load_artifact,
    audit::PgAuditStore,
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    orchestrator::PredictionService,
};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hrpredict=info".parse()?),
        )
        .init();

    info!("Starting HRPredict service");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        artifact = %config.model.artifact_path,
        "Configuration loaded"
    );

    // Load the model artifact; a malformed bundle is fatal and the service
    // must not accept any requests in that state
    let artifact = load_artifact(
        Path::new(&config.model.artifact_path),
        config.model.onnx_threads,
    )?;
    info!(
        features = artifact.features_order.len(),
        scaled = artifact.cols_to_scale.len(),
        threshold = artifact.threshold,
        "Model artifact ready"
    );
    let artifact = Arc::new(artifact);

    // Connect to the audit database
    let audit = Arc::new(
        PgAuditStore::connect(&config.database.url, config.database.max_connections).await?,
    );
    info!("Connected to audit database");

    // Initialize metrics and start the periodic reporter
    let metrics = Arc::new(ServiceMetrics::new());
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    let service = Arc::new(PredictionService::new(artifact, audit, metrics.clone()));
    let state = web::Data::new(AppState { service });

    info!(
        workers = config.server.workers,
        "Listening on {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}
