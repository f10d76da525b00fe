//! Season and settings models for the pricing engine.
//!
//! Rows are read straight from the booking site's tables via sqlx's
//! `FromRow`; the engine itself only ever sees them as read-only snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Season classification stored as `high` / `low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonType {
    High,
    Low,
}

impl SeasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::High => "high",
            SeasonType::Low => "low",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown value in the `season_type` column
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown season type '{0}'")]
pub struct ParseSeasonTypeError(String);

impl FromStr for SeasonType {
    type Err = ParseSeasonTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(SeasonType::High),
            "low" => Ok(SeasonType::Low),
            other => Err(ParseSeasonTypeError(other.to_string())),
        }
    }
}

impl TryFrom<String> for SeasonType {
    type Error = ParseSeasonTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Season period from villa_seasons
///
/// `start_date..=end_date` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct SeasonPeriod {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[sqlx(try_from = "String")]
    pub season_type: SeasonType,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    pub minimum_stay: i32,
    pub sunday_to_sunday: bool,
    pub year: i32,
    pub is_active: bool,
}

impl SeasonPeriod {
    /// Check if the period covers the given date
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Check if two periods share at least one date
    pub fn overlaps(&self, other: &SeasonPeriod) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// Pricing settings singleton from villa_pricing_settings
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct PricingSettings {
    #[serde(with = "rust_decimal::serde::str")]
    pub cleaning_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub linen_per_person: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tourist_tax_per_person_per_night: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub default_high_season_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub default_low_season_price: Decimal,
    pub default_minimum_stay: i32,
    pub high_season_minimum_stay: i32,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            cleaning_fee: dec!(150),
            linen_per_person: dec!(25),
            tourist_tax_per_person_per_night: dec!(2.50),
            deposit_amount: dec!(500),
            default_high_season_price: dec!(410),
            default_low_season_price: dec!(300),
            default_minimum_stay: 3,
            high_season_minimum_stay: 7,
        }
    }
}

/// Seasons and settings as read together from the store.
///
/// `fetched_at` is `None` when the snapshot was built from the hard-coded
/// defaults because the store was unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonSnapshot {
    pub seasons: Vec<SeasonPeriod>,
    pub settings: PricingSettings,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl SeasonSnapshot {
    pub fn new(seasons: Vec<SeasonPeriod>, settings: PricingSettings) -> Self {
        Self {
            seasons,
            settings,
            fetched_at: Some(Utc::now()),
        }
    }

    pub fn is_default(&self) -> bool {
        self.fetched_at.is_none()
    }
}
