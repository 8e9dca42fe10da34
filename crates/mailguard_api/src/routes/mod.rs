//! API Routes Module
//!
//! This module organizes all HTTP endpoints into logical groups:
//! - `validate`: Single email validation
//! - `bulk_validate`: Ordered batch validation
//! - `health`: Health checks and monitoring endpoints

pub mod bulk_validate;
pub mod health;
pub mod validate;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build all API routes and return a configured Router
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Validation endpoints
        .route("/validate", post(validate::validate_email_handler))
        .route("/bulk-validate", post(bulk_validate::bulk_validate_handler))

        // Health and monitoring endpoints
        .route("/health", get(health::health_handler))
        .route("/metrics", get(health::metrics_handler))
        .route("/admin/stats", get(health::stats_handler))

        // Apply shared state to all routes
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use mailguard_core::{
        disposable::DisposableDomainCache,
        dns::MxLookup,
        sources::{DomainFetcher, DomainSet, SourceSpec},
        ValidationError, ValidationService,
    };
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    struct StaticFetcher;

    #[async_trait]
    impl DomainFetcher for StaticFetcher {
        async fn fetch(&self, _sources: &[SourceSpec]) -> DomainSet {
            ["mailinator.com", "yopmail.com"].into_iter().collect()
        }
    }

    /// gmail.com and yopmail.com have MX records; slow.example answers late
    struct FakeLookup;

    #[async_trait]
    impl MxLookup for FakeLookup {
        async fn has_mx_records(&self, domain: &str) -> mailguard_core::Result<bool> {
            match domain {
                "gmail.com" | "yopmail.com" => Ok(true),
                "slow.example" => {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    Ok(true)
                }
                "nomx.example" => Ok(false),
                _ => Err(ValidationError::ConfigurationError("no such domain".to_string())),
            }
        }
    }

    async fn test_router(max_bulk_emails: usize) -> Router {
        let mut config = AppConfig::default();
        config.validation.max_bulk_emails = max_bulk_emails;

        let cache = Arc::new(DisposableDomainCache::new(Arc::new(StaticFetcher), Vec::new()));
        cache.initialize().await;

        let service = ValidationService::new(&config.validation, cache, Arc::new(FakeLookup));

        build_routes(Arc::new(AppState {
            validation_service: Arc::new(service),
            config: Arc::new(config),
        }))
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = test_router(10).await;
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_validate_clean_address() {
        let router = test_router(10).await;

        let (status, body) = send(router, post_json("/validate", json!({"email": "someone@gmail.com"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({
                "email": "someone@gmail.com",
                "valid_format": true,
                "disposable": false,
                "mx_found": true,
                "score": "100 (High trust: valid format, likely safe)"
            })
        );
    }

    #[tokio::test]
    async fn test_validate_suspicious_tld() {
        let router = test_router(10).await;

        let (status, body) = send(router, post_json("/validate", json!({"email": "user@promo.xyz"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_slice::<Value>(&body).unwrap(),
            json!({
                "email": "user@promo.xyz",
                "valid_format": true,
                "disposable": true,
                "mx_found": false,
                "score": "20 (Very low trust: likely fake or invalid)"
            })
        );
    }

    #[tokio::test]
    async fn test_validate_rejects_malformed_email() {
        let router = test_router(10).await;

        let (status, body) = send(router, post_json("/validate", json!({"email": "not-an-email"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_code"], "INVALID_EMAIL");
    }

    #[tokio::test]
    async fn test_bulk_validate_preserves_order() {
        let router = test_router(10).await;

        let emails = json!(["a@slow.example", "b@yopmail.com", "c@nomx.example"]);
        let (status, body) = send(router, post_json("/bulk-validate", json!({"emails": emails}))).await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_slice(&body).unwrap();
        let results = body["results"].as_array().unwrap();
        let emails: Vec<&str> = results.iter().map(|r| r["email"].as_str().unwrap()).collect();
        assert_eq!(emails, vec!["a@slow.example", "b@yopmail.com", "c@nomx.example"]);

        assert_eq!(results[0]["score"], "100 (High trust: valid format, likely safe)");
        assert_eq!(results[1]["score"], "50 (Low trust: suspicious or disposable)");
        assert_eq!(results[2]["score"], "70 (Medium trust: may be valid but needs caution)");
    }

    #[tokio::test]
    async fn test_bulk_validate_rejects_bad_batches() {
        let router = test_router(2).await;

        let (status, _) = send(router.clone(), post_json("/bulk-validate", json!({"emails": []}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = send(
            router.clone(),
            post_json("/bulk-validate", json!({"emails": ["a@gmail.com", "b@gmail.com", "c@gmail.com"]})),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

        let (status, body) = send(
            router,
            post_json("/bulk-validate", json!({"emails": ["a@gmail.com", "broken"]})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error_code"], "INVALID_EMAIL");
    }

    #[tokio::test]
    async fn test_metrics_and_stats() {
        let router = test_router(10).await;

        let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
        let (status, body) = send(router.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("mailguard_disposable_domains_total 2\n"));
        assert!(text.contains("mailguard_suspicious_tlds_total 7\n"));

        let request = Request::builder().uri("/admin/stats").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["service_stats"]["disposable_domains_count"], 2);
    }
}
