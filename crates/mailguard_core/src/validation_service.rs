//! Validation service orchestrating all email checks
//!
//! For each address the service reads the disposable list (lock-free), applies
//! the suspicious TLD heuristic, resolves MX records through the memoizing
//! resolver and scores the combined signals.

use crate::{
    disposable::DisposableDomainCache,
    dns::{MxLookup, MxResolver},
    heuristics::SuspiciousTldDetector,
    scoring, ValidationConfig, ValidationResult,
};

use futures::{stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, instrument};

/// Per-request validation over shared, long-lived collaborators
pub struct ValidationService {
    disposable_cache: Arc<DisposableDomainCache>,
    mx_resolver: MxResolver,
    tld_detector: SuspiciousTldDetector,
    bulk_concurrency: usize,
}

impl ValidationService {
    /// Create a new validation service
    ///
    /// # Arguments
    /// * `config` - Validation configuration
    /// * `disposable_cache` - Shared disposable list, already initialized
    /// * `mx_lookup` - Underlying MX lookup, wrapped in a memoizing cache here
    pub fn new(
        config: &ValidationConfig,
        disposable_cache: Arc<DisposableDomainCache>,
        mx_lookup: Arc<dyn MxLookup>,
    ) -> Self {
        let mx_resolver =
            MxResolver::new(mx_lookup, config.mx_cache_capacity, config.mx_lookup_timeout());
        let tld_detector = SuspiciousTldDetector::with_tlds(&config.suspicious_tlds);

        info!(
            "Validation service initialized - {} suspicious TLDs, MX cache capacity {}, bulk concurrency {}",
            tld_detector.tld_count(),
            config.mx_cache_capacity,
            config.bulk_concurrency
        );

        Self {
            disposable_cache,
            mx_resolver,
            tld_detector,
            bulk_concurrency: config.bulk_concurrency.max(1),
        }
    }

    /// Validate a single, syntactically valid email address
    #[instrument(skip_all, fields(email = %email))]
    pub async fn validate_one(&self, email: &str) -> ValidationResult {
        let domain = extract_domain(email);

        let listed = self.disposable_cache.contains(&domain);
        let suspicious_tld = self.tld_detector.is_suspicious(&domain);
        let disposable = listed || suspicious_tld;

        let mx_found = self.mx_resolver.has_mx(&domain).await;

        let trust = scoring::score(disposable, mx_found);

        debug!(
            "Validated {}: listed={}, suspicious_tld={}, mx_found={}, score={}",
            domain, listed, suspicious_tld, mx_found, trust.score
        );

        ValidationResult {
            email: email.to_string(),
            domain,
            valid_format: true,
            disposable,
            suspicious_tld,
            mx_found,
            score: trust.score,
            tier: trust.tier,
        }
    }

    /// Validate many addresses concurrently
    ///
    /// At most `bulk_concurrency` addresses are in flight at once. The i-th
    /// result always belongs to the i-th input, whatever order lookups finish in.
    pub async fn validate_many<S: AsRef<str>>(&self, emails: &[S]) -> Vec<ValidationResult> {
        debug!("Validating batch of {} emails", emails.len());

        let emails: Vec<String> = emails.iter().map(|e| e.as_ref().to_string()).collect();

        stream::iter(emails)
            .map(|email| async move { self.validate_one(&email).await })
            .buffered(self.bulk_concurrency)
            .collect()
            .await
    }

    /// Get service statistics for monitoring
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            disposable_domains_count: self.disposable_cache.domain_count(),
            disposable_list_published_at: self.disposable_cache.published_at(),
            mx_cache_entries: self.mx_resolver.entry_count(),
            suspicious_tlds_count: self.tld_detector.tld_count(),
        }
    }
}

/// Lowercased text after the last `@`
pub fn extract_domain(email: &str) -> String {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain)
        .unwrap_or(email)
        .trim()
        .to_lowercase()
}

/// Statistics about the validation service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStats {
    pub disposable_domains_count: usize,
    pub disposable_list_published_at: SystemTime,
    pub mx_cache_entries: u64,
    pub suspicious_tlds_count: usize,
}
