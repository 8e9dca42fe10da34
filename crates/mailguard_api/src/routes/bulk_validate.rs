//! Bulk email validation route handler

use crate::{api_handler::*, AppState};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// POST /bulk-validate
///
/// Validates every address concurrently and returns results in input order.
/// The whole batch is rejected if any address is malformed.
#[instrument(skip(state, payload), fields(count = payload.emails.len(), request_id))]
pub async fn bulk_validate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BulkValidateRequest>,
) -> ApiResult<BulkValidateResponse> {
    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", &request_id);

    if payload.emails.is_empty() {
        return Err(ApiError::EmptyBatch);
    }

    let max = state.config.validation.max_bulk_emails;
    if payload.emails.len() > max {
        warn!("Bulk request too large: {} emails", payload.emails.len());
        return Err(ApiError::BatchTooLarge {
            max,
            received: payload.emails.len(),
        });
    }

    for email in &payload.emails {
        ensure_valid_email(email)?;
    }

    let start_time = std::time::Instant::now();

    let results = state.validation_service.validate_many(&payload.emails).await;

    info!(
        "Bulk validation completed: {} emails ({}ms)",
        results.len(),
        start_time.elapsed().as_millis()
    );

    Ok(Json(BulkValidateResponse {
        results: results.into_iter().map(ValidateResponse::from).collect(),
    }))
}
