//! SmartMailGuard API Server
//!
//! Email trust scoring API built with axum and tokio. The disposable domain
//! list is loaded once at startup and refreshed in the background for the
//! lifetime of the process.

use axum::Router;
use mailguard_core::{
    disposable::DisposableDomainCache, dns::DnsResolver, sources::HttpDomainFetcher,
    ValidationService,
};
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api_handler;
mod config;
mod routes;

use config::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub validation_service: Arc<ValidationService>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing/logging
    init_tracing(&config)?;

    info!("Starting SmartMailGuard API v{}", env!("CARGO_PKG_VERSION"));

    let validation_config = &config.validation;
    validation_config.validate()?;

    // Bootstrap the disposable domain list before accepting requests
    let fetcher = HttpDomainFetcher::new(validation_config.fetch_timeout())
        .map_err(|e| format!("Failed to initialize domain fetcher: {}", e))?;
    let disposable_cache = Arc::new(DisposableDomainCache::new(
        Arc::new(fetcher),
        validation_config.sources.clone(),
    ));
    disposable_cache.initialize().await;

    let shutdown = CancellationToken::new();
    let refresh_task = disposable_cache
        .spawn_refresh_loop(validation_config.refresh_interval(), shutdown.clone());

    let dns_resolver = DnsResolver::new(validation_config.dns_timeout_ms, validation_config.dns_attempts)
        .map_err(|e| format!("Failed to initialize DNS resolver: {}", e))?;

    let validation_service =
        ValidationService::new(validation_config, disposable_cache, Arc::new(dns_resolver));

    let stats = validation_service.stats();
    info!(
        "Validation service ready - {} disposable domains, {} suspicious TLDs",
        stats.disposable_domains_count, stats.suspicious_tlds_count
    );

    // Create shared application state
    let app_state = AppState {
        validation_service: Arc::new(validation_service),
        config: Arc::new(config.clone()),
    };

    // Build the router
    let app = create_router(app_state);

    // Start the server
    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;

    info!("Server listening on {}", addr);
    info!("Health check available at http://{}/health", addr);
    info!("Metrics available at http://{}/metrics", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown.cancel();
    refresh_task.await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    routes::build_routes(Arc::new(state))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(tower_http::cors::Any),
        )
        .layer(CompressionLayer::new())
}

/// Initialize tracing and logging
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.observability.log_level))?;

    if config.observability.json_logs {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        // Human-readable format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
