mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting interview API v{} (debug={})",
        env!("CARGO_PKG_VERSION"),
        config.debug
    );

    let store = SessionStore::new(config.answers_file.clone());
    info!("Session store at {}", store.path().display());

    let llm = LlmClient::new(config.groq_api_key.clone(), &config.llm_api_url)
        .context("Failed to build LLM client")?;
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm_client::MODEL,
        config.llm_api_url
    );

    let state = AppState {
        store,
        llm: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
