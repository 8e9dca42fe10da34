//! Disposable domain detection backed by a hot-swappable domain list
//!
//! The published list is an immutable [`CacheState`] held behind an
//! [`ArcSwap`]. Readers take a lock-free snapshot on every lookup; refreshes
//! build a complete new state off to the side and publish it with a single
//! pointer swap, so a reader sees either the old list or the new one in full.

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::sources::{DomainFetcher, DomainSet, SourceSpec};

/// A published domain list and the moment it was published
#[derive(Debug)]
pub struct CacheState {
    pub domains: DomainSet,
    pub published_at: SystemTime,
}

impl CacheState {
    fn empty() -> Self {
        Self {
            domains: DomainSet::new(),
            published_at: SystemTime::UNIX_EPOCH,
        }
    }
}

/// What a refresh cycle did to the published list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new list with this many domains was published
    Replaced { domains: usize },
    /// Every source failed; the previous list with this many domains stays live
    Retained { domains: usize },
}

/// Process-wide disposable domain list with background refresh
pub struct DisposableDomainCache {
    state: ArcSwap<CacheState>,
    fetcher: Arc<dyn DomainFetcher>,
    sources: Vec<SourceSpec>,
}

impl DisposableDomainCache {
    /// Create an empty cache. Call [`initialize`](Self::initialize) before serving.
    pub fn new(fetcher: Arc<dyn DomainFetcher>, sources: Vec<SourceSpec>) -> Self {
        Self {
            state: ArcSwap::from_pointee(CacheState::empty()),
            fetcher,
            sources,
        }
    }

    /// Fetch every source once and publish the result, even if it is empty
    ///
    /// Startup accepts an empty list rather than blocking until a source
    /// becomes reachable; the refresh loop fills it in later.
    pub async fn initialize(&self) -> usize {
        info!(
            "Loading disposable domain list from {} sources",
            self.sources.len()
        );

        let domains = self.fetcher.fetch(&self.sources).await;
        let count = domains.len();
        if count == 0 {
            warn!("All disposable list sources failed at startup; starting with an empty list");
        }

        self.publish(domains);
        info!("Disposable domain list initialized with {} domains", count);
        count
    }

    /// Check a domain against the currently published list
    pub fn contains(&self, domain: &str) -> bool {
        let result = self.state.load().domains.contains(domain);
        if result {
            debug!("Domain '{}' found in disposable list", domain);
        }
        result
    }

    /// Current published state
    pub fn snapshot(&self) -> Arc<CacheState> {
        self.state.load_full()
    }

    pub fn domain_count(&self) -> usize {
        self.state.load().domains.len()
    }

    pub fn published_at(&self) -> SystemTime {
        self.state.load().published_at
    }

    /// Run one refresh cycle
    ///
    /// A non-empty fetch replaces the published list. An empty fetch means
    /// every source failed, and the previous list stays authoritative.
    pub async fn refresh(&self) -> RefreshOutcome {
        info!("Refreshing disposable domain list");

        let domains = self.fetcher.fetch(&self.sources).await;
        if domains.is_empty() {
            let retained = self.domain_count();
            warn!(
                "Disposable list refresh produced no domains; keeping previous list of {}",
                retained
            );
            return RefreshOutcome::Retained { domains: retained };
        }

        let count = domains.len();
        self.publish(domains);
        info!("Disposable domain list refreshed with {} domains", count);
        RefreshOutcome::Replaced { domains: count }
    }

    /// Spawn the periodic refresh task
    ///
    /// The first refresh happens one `interval` after spawning, since
    /// [`initialize`](Self::initialize) has just loaded the list. The task
    /// exits when `shutdown` is cancelled.
    pub fn spawn_refresh_loop(
        self: &Arc<Self>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> JoinHandle<()> {
        let cache = Arc::clone(self);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            info!("Disposable list refresh scheduled every {:?}", interval);

            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        info!("Disposable list refresh loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        cache.refresh().await;
                    }
                }
            }
        })
    }

    fn publish(&self, domains: DomainSet) {
        self.state.store(Arc::new(CacheState {
            domains,
            published_at: SystemTime::now(),
        }));
    }
}
