//! Binary crate for the solar insolation HTTP API.
//!
//! This crate focuses on:
//! - Wiring the long-lived store/inference clients from config
//! - HTTP transport (router, CORS, status mapping)
//! - Startup logging

use std::sync::Arc;

use anyhow::Context;
use insolation_core::{
    Config, CoverageWindow, Orchestrator, inference::gradio::GradioModel,
    store::postgrest::PostgrestStore,
};
use insolation_server::routes;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    config.ensure_complete()?;

    let store = Arc::new(PostgrestStore::new(
        config.store.url.clone(),
        config.store.api_key.clone(),
        config.store_table().to_string(),
    ));
    let feature_model = Arc::new(GradioModel::new(config.inference.feature_url.clone()));
    let forecast_model = Arc::new(GradioModel::new(config.inference.forecast_url.clone()));

    let orchestrator = Orchestrator::new(
        store,
        feature_model,
        forecast_model,
        CoverageWindow { min_year: config.coverage.min_year, max_year: config.coverage.max_year },
        config.forecast_fallback(),
    );

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = routes::router(routes::AppState { orchestrator: Arc::new(orchestrator) }).layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;

    tracing::info!("insolation API listening on http://{}", config.server.bind);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
