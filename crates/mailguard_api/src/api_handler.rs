//! Shared API types and utilities
//!
//! This module contains request/response types, error handling, and input
//! checks used across all API endpoints.

use axum::{http::StatusCode, response::Json};
use email_address::EmailAddress;
use mailguard_core::ValidationResult;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Request body for POST /validate
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub email: String,
}

/// Request body for POST /bulk-validate
#[derive(Debug, Deserialize)]
pub struct BulkValidateRequest {
    pub emails: Vec<String>,
}

/// API response for a single email
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidateResponse {
    /// The email address as submitted
    pub email: String,
    /// Always true; malformed addresses are rejected before validation
    pub valid_format: bool,
    /// Whether the domain is disposable or under a suspicious TLD
    pub disposable: bool,
    /// Whether the domain has MX records
    pub mx_found: bool,
    /// Score and tier, e.g. `"100 (High trust: valid format, likely safe)"`
    pub score: String,
}

impl From<ValidationResult> for ValidateResponse {
    fn from(result: ValidationResult) -> Self {
        let score = result.score_label();
        Self {
            email: result.email,
            valid_format: result.valid_format,
            disposable: result.disposable,
            mx_found: result.mx_found,
            score,
        }
    }
}

/// API response for POST /bulk-validate
#[derive(Debug, Serialize)]
pub struct BulkValidateResponse {
    pub results: Vec<ValidateResponse>,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    pub request_id: String,
    pub timestamp: String,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    InvalidEmail(String),
    EmptyBatch,
    BatchTooLarge { max: usize, received: usize },
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            ApiError::InvalidEmail(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_EMAIL", msg),
            ApiError::EmptyBatch => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_BATCH",
                "At least one email is required".to_string(),
            ),
            ApiError::BatchTooLarge { max, received } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "BATCH_TOO_LARGE",
                format!("Received {} emails, at most {} are allowed", received, max),
            ),
        };

        let error_response = ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Reject addresses that are not syntactically valid
pub fn ensure_valid_email(email: &str) -> Result<(), ApiError> {
    EmailAddress::from_str(email)
        .map(|_| ())
        .map_err(|e| ApiError::InvalidEmail(format!("Invalid email '{}': {}", email, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use mailguard_core::scoring::TrustTier;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_from_result() {
        let result = ValidationResult {
            email: "someone@gmail.com".to_string(),
            domain: "gmail.com".to_string(),
            valid_format: true,
            disposable: false,
            suspicious_tld: false,
            mx_found: false,
            score: 70,
            tier: TrustTier::Medium,
        };

        assert_eq!(
            ValidateResponse::from(result),
            ValidateResponse {
                email: "someone@gmail.com".to_string(),
                valid_format: true,
                disposable: false,
                mx_found: false,
                score: "70 (Medium trust: may be valid but needs caution)".to_string(),
            }
        );
    }

    #[test]
    fn test_ensure_valid_email() {
        assert!(ensure_valid_email("user@example.com").is_ok());
        assert!(ensure_valid_email("first.last+tag@sub.example.co.uk").is_ok());

        assert!(ensure_valid_email("").is_err());
        assert!(ensure_valid_email("no-at-sign").is_err());
        assert!(ensure_valid_email("user@").is_err());
        assert!(ensure_valid_email("@example.com").is_err());
    }

    #[test]
    fn test_error_status_codes() {
        let response = ApiError::InvalidEmail("bad".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ApiError::EmptyBatch.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = ApiError::BatchTooLarge { max: 2, received: 3 }.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
