//! In-memory caching using moka
//!
//! Holds the season/settings snapshot used for pricing. Seasons change a few
//! times a year, so a short TTL is enough to pick up admin edits made through
//! another instance while keeping the database out of every quote.
//!
//! Every snapshot is tagged with the invalidation generation current when its
//! fetch started. A snapshot whose fetch overlapped an `invalidate()` is served
//! to the callers that were waiting on it but never reused afterwards.
//!
//! When a refresh fails the last good snapshot is served; if there never was
//! one, the hard-coded default settings are used. Pricing always gets an
//! answer.

use moka::future::Cache;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::pricing::store::SeasonStore;
use crate::pricing::{PricingError, SeasonSnapshot};

/// Default lifetime of a fetched snapshot
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(5 * 60);

const SNAPSHOT_KEY: &str = "seasons";

/// Season snapshot cache with stale fallback
#[derive(Clone)]
pub struct SeasonCache {
    store: Arc<dyn SeasonStore>,
    /// Fresh snapshot and its generation (single entry, expires after `ttl`)
    snapshot: Cache<&'static str, (u64, Arc<SeasonSnapshot>)>,
    /// Bumped by every `invalidate()`
    generation: Arc<AtomicU64>,
    /// Last successfully fetched snapshot, kept past expiry
    last_good: Arc<RwLock<Option<Arc<SeasonSnapshot>>>>,
    ttl: Duration,
}

impl SeasonCache {
    /// Create a new cache over `store` with the given snapshot TTL
    pub fn new(store: Arc<dyn SeasonStore>, ttl: Duration) -> Self {
        Self {
            store,
            snapshot: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            generation: Arc::new(AtomicU64::new(0)),
            last_good: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    pub fn store(&self) -> &Arc<dyn SeasonStore> {
        &self.store
    }

    /// Get the current snapshot.
    ///
    /// Concurrent callers that miss the cache share a single fetch. A caller
    /// never gets a snapshot whose fetch started before an `invalidate()`
    /// that completed before the call.
    pub async fn snapshot(&self) -> Arc<SeasonSnapshot> {
        let wanted = self.generation.load(Ordering::Acquire);

        loop {
            if let Some((generation, cached)) = self.snapshot.get(&SNAPSHOT_KEY).await {
                if generation >= wanted {
                    debug!("Cache HIT for season snapshot");
                    return cached;
                }
                // Fetched before the last invalidation
                self.snapshot.invalidate(&SNAPSHOT_KEY).await;
            }
            debug!("Cache MISS for season snapshot");

            let store = Arc::clone(&self.store);
            let last_good = Arc::clone(&self.last_good);
            let current = Arc::clone(&self.generation);
            let fetched = self
                .snapshot
                .try_get_with(SNAPSHOT_KEY, async move {
                    let generation = current.load(Ordering::Acquire);
                    let snapshot = Arc::new(store.fetch_snapshot().await?);
                    *last_good.write().await = Some(Arc::clone(&snapshot));
                    info!(
                        "Season snapshot refreshed from {}: {} seasons",
                        store.backend_tag(),
                        snapshot.seasons.len()
                    );
                    Ok::<_, PricingError>((generation, snapshot))
                })
                .await;

            match fetched {
                Ok((generation, snapshot)) if generation >= wanted => return snapshot,
                Ok(_) => debug!("Discarding season snapshot fetched before invalidation"),
                Err(e) => return self.fallback(&e).await,
            }
        }
    }

    async fn fallback(&self, err: &PricingError) -> Arc<SeasonSnapshot> {
        match self.last_good.read().await.as_ref() {
            Some(stale) => {
                warn!("Failed to refresh season snapshot, serving stale copy: {}", err);
                Arc::clone(stale)
            }
            None => {
                warn!("Failed to load season snapshot, using default pricing: {}", err);
                Arc::new(SeasonSnapshot::default())
            }
        }
    }

    /// Drop the fresh snapshot so the next read refetches.
    ///
    /// The stale fallback is kept.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.snapshot.invalidate(&SNAPSHOT_KEY).await;
        info!("Season snapshot cache invalidated");
    }

    /// Get cache statistics for monitoring
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            backend: self.store.backend_tag(),
            snapshot_cached: self
                .snapshot
                .get(&SNAPSHOT_KEY)
                .await
                .is_some_and(|(generation, _)| generation == self.generation.load(Ordering::Acquire)),
            stale_fallback: self.last_good.read().await.is_some(),
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Load the snapshot once at startup
    pub async fn warm(&self) {
        info!("Starting cache warm-up...");
        let snapshot = self.snapshot().await;
        if snapshot.is_default() {
            warn!("Season store unavailable at startup, pricing with defaults");
        }
        info!("Cache warm-up complete. Stats: {:?}", self.stats().await);
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub backend: &'static str,
    pub snapshot_cached: bool,
    pub stale_fallback: bool,
    pub ttl_secs: u64,
}
