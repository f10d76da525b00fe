//! Season storage backends.
//!
//! The engine never talks to the database directly: it reads snapshots
//! through [`SeasonStore`], which the cache and the admin services share.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{PricingSettings, SeasonPeriod, SeasonSnapshot};
use super::queries;
use super::services::PricingError;

#[async_trait]
pub trait SeasonStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    /// Active seasons (ordered by start date, then name) and the settings singleton
    async fn fetch_snapshot(&self) -> Result<SeasonSnapshot, PricingError>;

    /// Active seasons sharing at least one date with `start..=end`
    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeasonPeriod>, PricingError>;

    async fn insert_season(&self, season: SeasonPeriod) -> Result<SeasonPeriod, PricingError>;

    async fn delete_season(&self, id: Uuid) -> Result<(), PricingError>;

    async fn save_settings(&self, settings: PricingSettings)
        -> Result<PricingSettings, PricingError>;
}

/// Postgres-backed store reading the booking site's tables
#[derive(Clone)]
pub struct PgSeasonStore {
    pool: PgPool,
}

impl PgSeasonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SeasonStore for PgSeasonStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn fetch_snapshot(&self) -> Result<SeasonSnapshot, PricingError> {
        let seasons = queries::list_active_seasons(&self.pool, &queries::booking_years()).await?;
        let settings = queries::get_pricing_settings(&self.pool).await?;
        Ok(SeasonSnapshot::new(seasons, settings))
    }

    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeasonPeriod>, PricingError> {
        Ok(queries::find_overlapping_seasons(&self.pool, start, end).await?)
    }

    async fn insert_season(&self, season: SeasonPeriod) -> Result<SeasonPeriod, PricingError> {
        Ok(queries::insert_season(&self.pool, &season).await?)
    }

    async fn delete_season(&self, id: Uuid) -> Result<(), PricingError> {
        if queries::delete_season(&self.pool, id).await? {
            Ok(())
        } else {
            Err(PricingError::SeasonNotFound(id))
        }
    }

    async fn save_settings(
        &self,
        settings: PricingSettings,
    ) -> Result<PricingSettings, PricingError> {
        Ok(queries::save_pricing_settings(&self.pool, &settings).await?)
    }
}

/// In-memory store.
///
/// `set_unavailable` and `with_fetch_delay` simulate an unhealthy or slow
/// database.
#[derive(Default)]
pub struct MemorySeasonStore {
    seasons: RwLock<Vec<SeasonPeriod>>,
    settings: RwLock<PricingSettings>,
    fetch_calls: AtomicU64,
    unavailable: AtomicBool,
    fetch_delay: Duration,
}

impl MemorySeasonStore {
    pub fn new(seasons: Vec<SeasonPeriod>, settings: PricingSettings) -> Self {
        Self {
            seasons: RwLock::new(seasons),
            settings: RwLock::new(settings),
            ..Self::default()
        }
    }

    pub fn with_fetch_delay(mut self, delay: Duration) -> Self {
        self.fetch_delay = delay;
        self
    }

    /// Number of snapshot fetches served so far
    pub fn fetch_count(&self) -> u64 {
        self.fetch_calls.load(Ordering::Relaxed)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), PricingError> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(PricingError::Storage("season store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SeasonStore for MemorySeasonStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn fetch_snapshot(&self) -> Result<SeasonSnapshot, PricingError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        self.check_available()?;

        let mut seasons: Vec<SeasonPeriod> = self
            .seasons
            .read()
            .await
            .iter()
            .filter(|s| s.is_active)
            .cloned()
            .collect();
        seasons.sort_by(|a, b| (a.start_date, &a.name).cmp(&(b.start_date, &b.name)));

        let settings = self.settings.read().await.clone();

        // Rows are read first; the delay models a slow response
        if !self.fetch_delay.is_zero() {
            tokio::time::sleep(self.fetch_delay).await;
        }
        Ok(SeasonSnapshot::new(seasons, settings))
    }

    async fn find_overlapping(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SeasonPeriod>, PricingError> {
        self.check_available()?;
        Ok(self
            .seasons
            .read()
            .await
            .iter()
            .filter(|s| s.is_active && s.start_date <= end && start <= s.end_date)
            .cloned()
            .collect())
    }

    async fn insert_season(&self, season: SeasonPeriod) -> Result<SeasonPeriod, PricingError> {
        self.check_available()?;
        self.seasons.write().await.push(season.clone());
        Ok(season)
    }

    async fn delete_season(&self, id: Uuid) -> Result<(), PricingError> {
        self.check_available()?;
        let mut seasons = self.seasons.write().await;
        let before = seasons.len();
        seasons.retain(|s| s.id != id);
        if seasons.len() == before {
            return Err(PricingError::SeasonNotFound(id));
        }
        Ok(())
    }

    async fn save_settings(
        &self,
        settings: PricingSettings,
    ) -> Result<PricingSettings, PricingError> {
        self.check_available()?;
        *self.settings.write().await = settings.clone();
        Ok(settings)
    }
}
