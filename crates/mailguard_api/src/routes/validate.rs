//! Single email validation route handler

use crate::{api_handler::*, AppState};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// POST /validate
///
/// Scores one address from its disposable, suspicious-TLD and MX signals.
/// Lookup failures never surface here; they only lower the score.
#[instrument(skip(state), fields(email = %payload.email, request_id))]
pub async fn validate_email_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ValidateRequest>,
) -> ApiResult<ValidateResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", &request_id);

    ensure_valid_email(&payload.email)?;

    let start_time = std::time::Instant::now();

    let result = state.validation_service.validate_one(&payload.email).await;

    info!(
        "Email validation completed: {} -> score={}, disposable={}, mx_found={} ({}ms)",
        payload.email,
        result.score,
        result.disposable,
        result.mx_found,
        start_time.elapsed().as_millis()
    );

    Ok(Json(ValidateResponse::from(result)))
}
