//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::cache::CacheStats;

use super::calculators::{GuestCharges, NightlyRate, PriceBreakdown};
use super::models::{PricingSettings, SeasonPeriod, SeasonSnapshot, SeasonType};
use super::services::StayQuote;
use super::validation::BookingValidation;

/// One night of the breakdown
#[derive(Debug, Serialize)]
pub struct NightlyRateResponse {
    pub date: NaiveDate,
    pub season_type: SeasonType,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub period_name: Option<String>,
}

impl From<NightlyRate> for NightlyRateResponse {
    fn from(night: NightlyRate) -> Self {
        Self {
            date: night.date,
            season_type: night.season_type,
            price: night.price,
            period_name: night.period_name,
        }
    }
}

/// Response for stay price calculation
#[derive(Debug, Serialize)]
pub struct PriceBreakdownResponse {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub cleaning_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub deposit_amount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub breakdown: Vec<NightlyRateResponse>,
}

impl From<PriceBreakdown> for PriceBreakdownResponse {
    fn from(price: PriceBreakdown) -> Self {
        Self {
            check_in: price.check_in,
            check_out: price.check_out,
            nights: price.nights,
            base_price: price.base_price,
            cleaning_fee: price.cleaning_fee,
            deposit_amount: price.deposit_amount,
            total: price.total,
            breakdown: price.breakdown.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response for booking date validation
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub is_valid: bool,
    pub nights: i64,
    pub minimum_stay: i32,
    pub requires_sunday_to_sunday: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_localized: Option<String>,
}

impl From<BookingValidation> for ValidationResponse {
    fn from(validation: BookingValidation) -> Self {
        Self {
            is_valid: validation.is_valid,
            nights: validation.nights,
            minimum_stay: validation.minimum_stay,
            requires_sunday_to_sunday: validation.requires_sunday_to_sunday,
            code: validation.violation.map(|v| v.code()),
            error: validation.error(),
            error_localized: validation.error_localized(),
        }
    }
}

/// Linen and tourist tax for the party
#[derive(Debug, Serialize)]
pub struct GuestChargesResponse {
    pub guests: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub linen: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tourist_tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
}

impl From<GuestCharges> for GuestChargesResponse {
    fn from(charges: GuestCharges) -> Self {
        Self {
            guests: charges.guests,
            linen: charges.linen,
            tourist_tax: charges.tourist_tax,
            total: charges.total,
        }
    }
}

/// Response for a full stay quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub price: PriceBreakdownResponse,
    pub validation: ValidationResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_charges: Option<GuestChargesResponse>,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
    pub pricing_as_of: Option<DateTime<Utc>>,
    pub using_default_pricing: bool,
}

impl From<StayQuote> for QuoteResponse {
    fn from(quote: StayQuote) -> Self {
        Self {
            price: quote.price.into(),
            validation: quote.validation.into(),
            guest_charges: quote.guest_charges.map(Into::into),
            grand_total: quote.grand_total,
            using_default_pricing: quote.pricing_as_of.is_none(),
            pricing_as_of: quote.pricing_as_of,
        }
    }
}

/// Response listing the seasons and settings currently used for pricing
#[derive(Debug, Serialize)]
pub struct SeasonsResponse {
    pub seasons: Vec<SeasonPeriod>,
    pub settings: PricingSettings,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl From<&SeasonSnapshot> for SeasonsResponse {
    fn from(snapshot: &SeasonSnapshot) -> Self {
        Self {
            seasons: snapshot.seasons.clone(),
            settings: snapshot.settings.clone(),
            fetched_at: snapshot.fetched_at,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
