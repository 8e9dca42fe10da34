//! # mailguard_core
//!
//! Email trust scoring built from three cheap signals: disposable-domain list
//! membership, suspicious top-level domains, and MX record existence.
//!
//! ## Features
//!
//! - **Hot-swappable disposable domain list** fetched from remote block-lists and
//!   refreshed in the background without blocking readers
//! - **MX lookups** via hickory-resolver with a bounded memoization cache
//! - **Suspicious TLD heuristics** as a fallback when list membership is unknown
//! - **Ordered bulk validation** with bounded concurrency
//!
//! ## Example
//!
//! ```rust,no_run
//! use mailguard_core::{
//!     disposable::DisposableDomainCache, dns::DnsResolver, sources::HttpDomainFetcher,
//!     ValidationConfig, ValidationService,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ValidationConfig::default();
//!     let fetcher = Arc::new(HttpDomainFetcher::new(config.fetch_timeout())?);
//!     let cache = Arc::new(DisposableDomainCache::new(fetcher, config.sources.clone()));
//!     cache.initialize().await;
//!
//!     let dns = Arc::new(DnsResolver::new(config.dns_timeout_ms, config.dns_attempts)?);
//!     let service = ValidationService::new(&config, cache, dns);
//!
//!     let result = service.validate_one("someone@example.com").await;
//!     println!("{} -> {}", result.email, result.score_label());
//!     Ok(())
//! }
//! ```

pub mod disposable;
pub mod dns;
pub mod heuristics;
pub mod scoring;
pub mod sources;
pub mod validation_service;

use serde::{Deserialize, Serialize};
use sources::SourceSpec;
use std::time::Duration;
use thiserror::Error;

/// Slack added on top of the resolver's own retry budget for one MX lookup
const MX_LOOKUP_MARGIN: Duration = Duration::from_millis(500);

/// Configuration for the validation service and its collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Interval between background refreshes of the disposable list, in seconds
    pub refresh_interval_secs: u64,
    /// Per-source fetch timeout in seconds
    pub fetch_timeout_secs: u64,
    /// Top-level domains treated as disposable regardless of list membership
    pub suspicious_tlds: Vec<String>,
    /// Maximum number of memoized MX results
    pub mx_cache_capacity: u64,
    /// DNS query timeout in milliseconds
    pub dns_timeout_ms: u64,
    /// Maximum number of DNS lookup attempts
    pub dns_attempts: usize,
    /// Maximum number of emails validated concurrently within one bulk request
    pub bulk_concurrency: usize,
    /// Maximum number of emails accepted in one bulk request
    pub max_bulk_emails: usize,
    /// Remote disposable domain lists
    pub sources: Vec<SourceSpec>,
}

impl ValidationConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns_timeout_ms)
    }

    /// Overall bound on one MX lookup: every resolver attempt plus a margin
    pub fn mx_lookup_timeout(&self) -> Duration {
        self.dns_timeout() * self.dns_attempts.max(1) as u32 + MX_LOOKUP_MARGIN
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(ValidationError::ConfigurationError(
                "refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.mx_cache_capacity == 0 {
            return Err(ValidationError::ConfigurationError(
                "mx_cache_capacity must be greater than zero".to_string(),
            ));
        }
        if self.bulk_concurrency == 0 {
            return Err(ValidationError::ConfigurationError(
                "bulk_concurrency must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 12 * 60 * 60,
            fetch_timeout_secs: 10,
            suspicious_tlds: heuristics::DEFAULT_SUSPICIOUS_TLDS
                .iter()
                .map(|tld| tld.to_string())
                .collect(),
            mx_cache_capacity: 1000,
            dns_timeout_ms: 2000,
            dns_attempts: 2,
            bulk_concurrency: 16,
            max_bulk_emails: 1000,
            sources: sources::default_sources(),
        }
    }
}

/// Validation result for a single email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The email address as submitted
    pub email: String,
    /// Lowercased domain part of the address
    pub domain: String,
    /// Format is checked before the address reaches the service, so always true
    pub valid_format: bool,
    /// List membership or a suspicious TLD
    pub disposable: bool,
    /// Whether the TLD alone matched the suspicious set
    pub suspicious_tld: bool,
    /// Whether the domain has MX records
    pub mx_found: bool,
    /// Trust score (0-100, higher = more trustworthy)
    pub score: u8,
    /// Human-readable trust tier derived from the score
    pub tier: scoring::TrustTier,
}

impl ValidationResult {
    /// Score rendered as `"<score> (<tier description>)"`
    pub fn score_label(&self) -> String {
        format!("{} ({})", self.score, self.tier)
    }
}

/// Errors that can occur while building or querying collaborators
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("DNS resolution failed: {0}")]
    DnsResolutionFailed(#[from] hickory_resolver::error::ResolveError),
    #[error("DNS lookup timed out after {0:?}")]
    DnsTimeout(Duration),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

// Re-export main types
pub use validation_service::ValidationService;
