mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod users;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::google::GoogleProvider;
use crate::auth::jwt::TokenIssuer;
use crate::auth::state_cookie::StateSigner;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resume::analyzer::LlmResumeAnalyzer;
use crate::routes::{build_router, cors_layer};
use crate::state::AppState;
use crate::users::store::PgUserStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting ResumePort API v{} ({})",
        env!("CARGO_PKG_VERSION"),
        config.environment.as_str()
    );

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Google OAuth client
    let google = GoogleProvider::new(
        config.google_client_id.clone(),
        config.google_client_secret.clone(),
        config.oauth_callback_url(),
    )
    .context("failed to configure Google OAuth client")?;
    info!("Google OAuth callback: {}", config.oauth_callback_url());

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build app state
    let state = AppState {
        users: Arc::new(PgUserStore::new(db)),
        identity: Arc::new(google),
        analyzer: Arc::new(LlmResumeAnalyzer::new(llm)),
        tokens: TokenIssuer::new(&config.jwt_secret),
        state_signer: StateSigner::new(
            &config.session_secret,
            config.environment.is_production(),
        ),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
