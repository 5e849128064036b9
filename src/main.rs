//! Chain Reputation Server
//!
//! Serves cross-chain reputation scores for Stellar and Polkadot accounts.
//! Chain data is fetched upstream; this server scores it, explains the score
//! and classifies the account's profile.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};

use chain_reputation::app;
use chain_reputation::config::Config;
use chain_reputation::services::{HttpNarrator, InsightEngine, ReputationEngine};
use chain_reputation::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(environment = config.environment.as_str(), "Starting reputation server");

    // Insight engine, optionally narrated
    let insights = match &config.narrator {
        Some(narrator) => {
            tracing::info!(
                url = %narrator.url,
                model = %narrator.model,
                timeout_ms = narrator.timeout.as_millis() as u64,
                "Summary narrator enabled"
            );
            let http_narrator = HttpNarrator::new(
                narrator.url.clone(),
                narrator.api_key.clone(),
                narrator.model.clone(),
                narrator.timeout,
            )
            .context("Failed to build narrator HTTP client")?;
            InsightEngine::with_narrator(Arc::new(http_narrator), narrator.timeout)
        }
        None => {
            tracing::info!("NARRATOR_URL not set, using templated summaries");
            InsightEngine::rule_based()
        }
    };

    let reputation_engine = Arc::new(ReputationEngine::new(insights));
    let app_state = AppState::new(reputation_engine);

    let app = app::router(app_state).layer(configure_cors(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check at http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

fn configure_cors(config: &Config) -> CorsLayer {
    let allowed_origins_str = config.cors_allowed_origins.clone().unwrap_or_default();

    if allowed_origins_str.is_empty() {
        if config.environment.is_production() {
            tracing::error!("CORS_ALLOWED_ORIGINS should be set in production");
        }
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins_str
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
