//! MX record lookups with bounded memoization
//!
//! [`DnsResolver`] performs the actual queries through hickory-resolver.
//! [`MxResolver`] sits in front of any [`MxLookup`] and memoizes results in a
//! bounded concurrent cache, turning every failure into "no MX".

use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    error::ResolveErrorKind,
    TokioAsyncResolver,
};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::ValidationError;

/// Source of truth for MX record existence
#[async_trait]
pub trait MxLookup: Send + Sync {
    /// `Ok(false)` when the domain exists but has no MX records,
    /// `Err(_)` when the query itself failed
    async fn has_mx_records(&self, domain: &str) -> crate::Result<bool>;
}

/// DNS resolver wrapper
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// Create a new DNS resolver
    ///
    /// # Arguments
    /// * `timeout_ms` - DNS query timeout in milliseconds
    /// * `attempts` - Maximum number of retry attempts
    pub fn new(timeout_ms: u64, attempts: usize) -> crate::Result<Self> {
        if attempts == 0 {
            return Err(ValidationError::ConfigurationError(
                "dns_attempts must be at least 1".to_string(),
            ));
        }

        let config = ResolverConfig::cloudflare();

        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_millis(timeout_ms);
        opts.attempts = attempts;

        let resolver = TokioAsyncResolver::tokio(config, opts);

        info!(
            "DNS resolver initialized - timeout: {}ms, attempts: {}",
            timeout_ms, attempts
        );

        Ok(Self { resolver })
    }
}

#[async_trait]
impl MxLookup for DnsResolver {
    async fn has_mx_records(&self, domain: &str) -> crate::Result<bool> {
        debug!("Checking MX records for domain: {}", domain);

        match self.resolver.mx_lookup(domain).await {
            Ok(response) => {
                let mx_count = response.iter().count();
                debug!("Domain {} has {} MX record(s)", domain, mx_count);
                Ok(mx_count > 0)
            }
            Err(e) => match e.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => {
                    debug!("Domain {} has no MX records", domain);
                    Ok(false)
                }
                _ => Err(e.into()),
            },
        }
    }
}

/// Memoizing MX checker with a fixed capacity
pub struct MxResolver {
    lookup: Arc<dyn MxLookup>,
    cache: Cache<String, bool>,
    timeout: Duration,
}

impl MxResolver {
    /// # Arguments
    /// * `lookup` - Underlying MX lookup
    /// * `capacity` - Maximum number of memoized domains
    /// * `timeout` - Upper bound on a single lookup
    pub fn new(lookup: Arc<dyn MxLookup>, capacity: u64, timeout: Duration) -> Self {
        debug!("MX cache initialized with capacity {}", capacity);

        Self {
            lookup,
            cache: Cache::builder().max_capacity(capacity).build(),
            timeout,
        }
    }

    /// Check whether a domain has MX records
    ///
    /// Results are memoized whether positive or negative. Concurrent callers
    /// asking for the same uncached domain share a single lookup.
    pub async fn has_mx(&self, domain: &str) -> bool {
        let key = domain.trim().trim_end_matches('.').to_lowercase();
        self.cache.get_with(key.clone(), self.resolve(&key)).await
    }

    async fn resolve(&self, domain: &str) -> bool {
        let result = match tokio::time::timeout(self.timeout, self.lookup.has_mx_records(domain)).await {
            Ok(result) => result,
            Err(_) => Err(ValidationError::DnsTimeout(self.timeout)),
        };

        match result {
            Ok(found) => found,
            Err(e) => {
                debug!("MX lookup for {} failed, treating as no MX: {}", domain, e);
                false
            }
        }
    }

    /// Approximate number of memoized domains
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}
