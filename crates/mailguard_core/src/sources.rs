//! Remote disposable domain lists
//!
//! This module fetches disposable domain block-lists over HTTP and parses them
//! into a normalized [`DomainSet`]. Each source is fetched independently; a
//! source that fails to download or parse is logged and skipped so the others
//! still contribute.

use async_trait::async_trait;
use futures::{stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ValidationError;

/// Upper bound on list downloads in flight at once
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Default block-lists: one structured, two line-delimited
pub const DEFAULT_SOURCE_URLS: &[&str] = &[
    "https://raw.githubusercontent.com/tompec/disposable-email-domains/main/index.json",
    "https://raw.githubusercontent.com/disposable/disposable-email-domains/master/domains.txt",
    "https://raw.githubusercontent.com/disposable-email-domains/disposable-email-domains/refs/heads/main/disposable_email_blocklist.conf",
];

pub fn default_sources() -> Vec<SourceSpec> {
    DEFAULT_SOURCE_URLS
        .iter()
        .map(|url| SourceSpec::from_url(*url))
        .collect()
}

/// How a fetched payload is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// A JSON array of domain strings
    Json,
    /// One domain per line; blank lines and `#` comments are ignored
    Lines,
}

/// A remote list endpoint together with its payload format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SourceSpecRepr")]
pub struct SourceSpec {
    pub url: String,
    pub format: SourceFormat,
}

impl SourceSpec {
    pub fn new(url: impl Into<String>, format: SourceFormat) -> Self {
        Self {
            url: url.into(),
            format,
        }
    }

    /// Build a source spec, inferring the format from the URL suffix
    ///
    /// URLs ending in `.json` are structured lists, everything else is
    /// treated as line-delimited text.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let format = if url.to_ascii_lowercase().ends_with(".json") {
            SourceFormat::Json
        } else {
            SourceFormat::Lines
        };
        Self { url, format }
    }
}

/// Config files may list a source as a bare URL or as `{ url, format }`
#[derive(Deserialize)]
#[serde(untagged)]
enum SourceSpecRepr {
    Url(String),
    Full { url: String, format: SourceFormat },
}

impl From<SourceSpecRepr> for SourceSpec {
    fn from(repr: SourceSpecRepr) -> Self {
        match repr {
            SourceSpecRepr::Url(url) => SourceSpec::from_url(url),
            SourceSpecRepr::Full { url, format } => SourceSpec::new(url, format),
        }
    }
}

/// Set of lowercase, trimmed, non-empty domain names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: HashSet<String>,
}

impl DomainSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and insert a domain. Blank input is ignored.
    pub fn insert(&mut self, raw: &str) -> bool {
        let domain = raw.trim().to_lowercase();
        if domain.is_empty() {
            return false;
        }
        self.domains.insert(domain)
    }

    /// Exact lookup; callers pass an already lowercased domain
    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    /// Union another set into this one
    pub fn merge(&mut self, other: DomainSet) {
        if self.domains.is_empty() {
            self.domains = other.domains;
        } else {
            self.domains.extend(other.domains);
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for DomainSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = DomainSet::new();
        for domain in iter {
            set.insert(domain.as_ref());
        }
        set
    }
}

/// Why a single source contributed nothing to a refresh
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("payload from {url} is not a JSON list of strings: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a fetched payload according to its declared format
pub fn parse_payload(body: &str, format: SourceFormat) -> Result<DomainSet, serde_json::Error> {
    match format {
        SourceFormat::Json => {
            let entries: Vec<String> = serde_json::from_str(body)?;
            Ok(entries.iter().collect())
        }
        SourceFormat::Lines => Ok(body.lines().filter_map(parse_line).collect()),
    }
}

fn parse_line(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line)
}

/// Produces a fresh domain set from a list of sources
///
/// Implementations never fail: unreachable or malformed sources are skipped,
/// and an empty set means every source failed.
#[async_trait]
pub trait DomainFetcher: Send + Sync {
    async fn fetch(&self, sources: &[SourceSpec]) -> DomainSet;
}

/// [`DomainFetcher`] backed by plain HTTPS GET requests
pub struct HttpDomainFetcher {
    client: Client,
}

impl HttpDomainFetcher {
    /// Create a fetcher whose requests are each bounded by `timeout`
    pub fn new(timeout: Duration) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mailguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ValidationError::ConfigurationError(format!("failed to build HTTP client: {}", e))
            })?;

        debug!("HTTP domain fetcher initialized with {:?} timeout", timeout);
        Ok(Self { client })
    }

    async fn fetch_source(&self, source: &SourceSpec) -> Result<DomainSet, SourceError> {
        let url = source.url.clone();
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|source| SourceError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| SourceError::Body {
            url: url.clone(),
            source,
        })?;

        parse_payload(&body, source.format).map_err(|source| SourceError::Parse { url, source })
    }
}

#[async_trait]
impl DomainFetcher for HttpDomainFetcher {
    async fn fetch(&self, sources: &[SourceSpec]) -> DomainSet {
        let results: Vec<_> = stream::iter(sources.to_vec())
            .map(|source| async move {
                let result = self.fetch_source(&source).await;
                (source, result)
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut domains = DomainSet::new();
        let mut failed = 0;

        for (source, result) in results {
            match result {
                Ok(set) => {
                    info!("Fetched {} domains from {}", set.len(), source.url);
                    domains.merge(set);
                }
                Err(e) => {
                    failed += 1;
                    warn!("Skipping disposable list source: {}", e);
                }
            }
        }

        info!(
            "Fetched {} distinct disposable domains ({} of {} sources failed)",
            domains.len(),
            failed,
            sources.len()
        );

        domains
    }
}
