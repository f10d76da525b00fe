//! Request DTOs for pricing API endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::SeasonType;

/// Request to quote or validate a stay
#[derive(Debug, Deserialize)]
pub struct StayRequest {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[serde(default)]
    pub guests: Option<u32>,
}

/// Request to create a season period
#[derive(Debug, Deserialize)]
pub struct CreateSeasonRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub season_type: SeasonType,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_night: Decimal,
    pub minimum_stay: i32,
    #[serde(default)]
    pub sunday_to_sunday: bool,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Request to replace the pricing settings
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
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
