mod analysis;
mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::gateway::{Gateway, RetryPolicy};
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::InMemoryReportStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CVLens API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the Gemini client behind the retry/fallback gateway
    let generator = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));
    let gateway = Gateway::new(generator, RetryPolicy::default());
    info!(
        "Generation gateway initialized (primary model: {})",
        llm_client::PRIMARY_MODEL
    );

    // Completed reports live in a single slot; a new run replaces the previous one
    let reports = Arc::new(InMemoryReportStore::default());

    // Build app state
    let state = AppState { gateway, reports };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
