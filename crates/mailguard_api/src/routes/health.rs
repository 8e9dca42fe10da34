//! Health check and monitoring routes
//!
//! This module contains endpoints for service health checks and monitoring
//! metrics.

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use mailguard_core::validation_service::ServiceStats;
use serde::Serialize;
use std::sync::Arc;
use std::time::UNIX_EPOCH;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint - GET /health
///
/// The router only starts serving after startup initialization, so reaching
/// this handler means the service is up.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Metrics endpoint - GET /metrics
///
/// Returns Prometheus-compatible metrics for monitoring.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> (StatusCode, String) {
    let stats = state.validation_service.stats();

    let published_at = stats
        .disposable_list_published_at
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let metrics = format!(
        "# HELP mailguard_disposable_domains_total Number of domains in the published disposable list\n\
         # TYPE mailguard_disposable_domains_total gauge\n\
         mailguard_disposable_domains_total {}\n\
         \n\
         # HELP mailguard_disposable_list_published_timestamp_seconds Unix time the disposable list was published\n\
         # TYPE mailguard_disposable_list_published_timestamp_seconds gauge\n\
         mailguard_disposable_list_published_timestamp_seconds {}\n\
         \n\
         # HELP mailguard_mx_cache_entries Number of memoized MX results\n\
         # TYPE mailguard_mx_cache_entries gauge\n\
         mailguard_mx_cache_entries {}\n\
         \n\
         # HELP mailguard_suspicious_tlds_total Number of suspicious TLDs\n\
         # TYPE mailguard_suspicious_tlds_total gauge\n\
         mailguard_suspicious_tlds_total {}\n\
         \n\
         # HELP mailguard_build_info Build information\n\
         # TYPE mailguard_build_info gauge\n\
         mailguard_build_info{{version=\"{}\"}} 1\n",
        stats.disposable_domains_count,
        published_at,
        stats.mx_cache_entries,
        stats.suspicious_tlds_count,
        env!("CARGO_PKG_VERSION")
    );

    (StatusCode::OK, metrics)
}

/// Statistics response
#[derive(Serialize)]
pub struct StatsResponse {
    pub version: String,
    pub service_stats: ServiceStats,
    pub timestamp: String,
}

/// Statistics endpoint - GET /admin/stats
///
/// Returns detailed statistics about the validation service.
pub async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        service_stats: state.validation_service.stats(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
