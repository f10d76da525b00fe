//! Pricing service functions with store access.
//!
//! Reads go through the season cache; admin writes go straight to the store
//! and invalidate the cache so the next quote sees them.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::SeasonCache;
use crate::error::AppError;

use super::calculators::{
    calculate_guest_charges, compute_stay_price, GuestCharges, PriceBreakdown, MAX_STAY_NIGHTS,
};
use super::models::{PricingSettings, SeasonPeriod, SeasonSnapshot};
use super::requests::{CreateSeasonRequest, UpdateSettingsRequest};
use super::resolver::find_overlap;
use super::validation::{validate_booking_dates, BookingValidation};

/// Pricing error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("Check-out date {check_out} must be after check-in date {check_in}")]
    InvalidDateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("Stay of {nights} nights exceeds the maximum of {maximum} nights")]
    StayTooLong { nights: i64, maximum: i64 },

    #[error("Amount is too large to price")]
    AmountOverflow,

    #[error("Invalid season: {0}")]
    InvalidSeason(String),

    #[error("Season '{name}' overlaps active season '{existing}'")]
    OverlappingSeason { name: String, existing: String },

    #[error("Season {0} not found")]
    SeasonNotFound(Uuid),

    #[error("Invalid pricing settings: {0}")]
    InvalidSettings(String),

    #[error("Season store error: {0}")]
    Storage(String),
}

impl PricingError {
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidDateRange { .. } => "invalid_date_range",
            PricingError::StayTooLong { .. } => "stay_too_long",
            PricingError::AmountOverflow => "amount_overflow",
            PricingError::InvalidSeason(_) => "invalid_season",
            PricingError::OverlappingSeason { .. } => "overlapping_season",
            PricingError::SeasonNotFound(_) => "season_not_found",
            PricingError::InvalidSettings(_) => "invalid_settings",
            PricingError::Storage(_) => "storage",
        }
    }
}

impl From<AppError> for PricingError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Pricing(inner) => inner,
            other => PricingError::Storage(other.to_string()),
        }
    }
}

/// Largest price or fee accepted from the admin API
pub const MAX_AMOUNT: Decimal = dec!(1000000);

/// Result of a full stay quote
#[derive(Debug, Clone)]
pub struct StayQuote {
    pub price: PriceBreakdown,
    pub validation: BookingValidation,
    pub guest_charges: Option<GuestCharges>,
    pub grand_total: Decimal,
    pub pricing_as_of: Option<DateTime<Utc>>,
}

/// Price and validate a stay against the current season snapshot.
///
/// The quote is returned even when the booking rules reject the dates so the
/// booking form can show the price next to the reason; only a reversed or
/// empty date range is an error.
pub async fn quote_stay(
    cache: &SeasonCache,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: Option<u32>,
) -> Result<StayQuote, PricingError> {
    let snapshot = cache.snapshot().await;
    let quote = build_quote(&snapshot, check_in, check_out, guests)?;

    debug!(
        "Quoted {} -> {}: {} nights, total {}, valid={}",
        check_in, check_out, quote.price.nights, quote.grand_total, quote.validation.is_valid
    );

    Ok(quote)
}

fn build_quote(
    snapshot: &SeasonSnapshot,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: Option<u32>,
) -> Result<StayQuote, PricingError> {
    let price = compute_stay_price(check_in, check_out, &snapshot.seasons, &snapshot.settings)?;
    let validation =
        validate_booking_dates(check_in, check_out, &snapshot.seasons, &snapshot.settings);
    let guest_charges = guests
        .map(|count| calculate_guest_charges(price.nights, count, &snapshot.settings))
        .transpose()?;

    let grand_total = price
        .total
        .checked_add(guest_charges.as_ref().map_or(Decimal::ZERO, |c| c.total))
        .ok_or(PricingError::AmountOverflow)?;

    Ok(StayQuote {
        price,
        validation,
        guest_charges,
        grand_total,
        pricing_as_of: snapshot.fetched_at,
    })
}

/// Validate booking dates against the current season snapshot
pub async fn validate_stay(
    cache: &SeasonCache,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> BookingValidation {
    let snapshot = cache.snapshot().await;
    validate_booking_dates(check_in, check_out, &snapshot.seasons, &snapshot.settings)
}

/// Create a season period.
///
/// Rejects a new active period that shares a date with an existing active one,
/// so that season resolution never depends on list order.
pub async fn create_season(
    cache: &SeasonCache,
    request: CreateSeasonRequest,
) -> Result<SeasonPeriod, PricingError> {
    let season = season_from_request(request)?;

    let nearby = cache
        .store()
        .find_overlapping(season.start_date, season.end_date)
        .await?;
    if let Some(existing) = find_overlap(&season, &nearby) {
        return Err(PricingError::OverlappingSeason {
            name: season.name,
            existing: existing.name.clone(),
        });
    }

    let saved = cache.store().insert_season(season).await?;
    cache.invalidate().await;

    info!(
        "Created season '{}' ({} .. {}, {} at {})",
        saved.name, saved.start_date, saved.end_date, saved.season_type, saved.price_per_night
    );
    Ok(saved)
}

fn season_from_request(request: CreateSeasonRequest) -> Result<SeasonPeriod, PricingError> {
    let name = request.name.trim().to_string();
    if name.is_empty() {
        return Err(PricingError::InvalidSeason("name must not be empty".to_string()));
    }
    if request.start_date > request.end_date {
        return Err(PricingError::InvalidSeason(format!(
            "start date {} is after end date {}",
            request.start_date, request.end_date
        )));
    }
    if request.price_per_night <= Decimal::ZERO {
        return Err(PricingError::InvalidSeason(
            "price per night must be positive".to_string(),
        ));
    }
    if request.price_per_night > MAX_AMOUNT {
        return Err(PricingError::InvalidSeason(format!(
            "price per night must not exceed {}",
            MAX_AMOUNT
        )));
    }
    if request.minimum_stay < 1 || i64::from(request.minimum_stay) > MAX_STAY_NIGHTS {
        return Err(PricingError::InvalidSeason(format!(
            "minimum stay must be between 1 and {} nights",
            MAX_STAY_NIGHTS
        )));
    }

    Ok(SeasonPeriod {
        id: Uuid::new_v4(),
        name,
        start_date: request.start_date,
        end_date: request.end_date,
        season_type: request.season_type,
        price_per_night: request.price_per_night,
        minimum_stay: request.minimum_stay,
        sunday_to_sunday: request.sunday_to_sunday,
        year: request.year.unwrap_or_else(|| request.start_date.year()),
        is_active: request.is_active,
    })
}

/// Delete a season period
pub async fn delete_season(cache: &SeasonCache, id: Uuid) -> Result<(), PricingError> {
    cache.store().delete_season(id).await?;
    cache.invalidate().await;
    info!("Deleted season {}", id);
    Ok(())
}

/// Replace the pricing settings singleton
pub async fn update_settings(
    cache: &SeasonCache,
    request: UpdateSettingsRequest,
) -> Result<PricingSettings, PricingError> {
    let settings = settings_from_request(request)?;
    let saved = cache.store().save_settings(settings).await?;
    cache.invalidate().await;
    info!("Pricing settings updated");
    Ok(saved)
}

fn settings_from_request(request: UpdateSettingsRequest) -> Result<PricingSettings, PricingError> {
    let amounts = [
        ("cleaning_fee", request.cleaning_fee),
        ("linen_per_person", request.linen_per_person),
        (
            "tourist_tax_per_person_per_night",
            request.tourist_tax_per_person_per_night,
        ),
        ("deposit_amount", request.deposit_amount),
        ("default_high_season_price", request.default_high_season_price),
        ("default_low_season_price", request.default_low_season_price),
    ];

    let errors: Vec<String> = amounts
        .iter()
        .filter(|(_, amount)| *amount <= Decimal::ZERO || *amount > MAX_AMOUNT)
        .map(|(field, _)| format!("{} must be positive and at most {}", field, MAX_AMOUNT))
        .chain(
            [
                ("default_minimum_stay", request.default_minimum_stay),
                ("high_season_minimum_stay", request.high_season_minimum_stay),
            ]
            .iter()
            .filter(|(_, nights)| *nights < 1 || i64::from(*nights) > MAX_STAY_NIGHTS)
            .map(|(field, _)| {
                format!("{} must be between 1 and {} nights", field, MAX_STAY_NIGHTS)
            }),
        )
        .collect();

    if !errors.is_empty() {
        return Err(PricingError::InvalidSettings(errors.join(", ")));
    }

    Ok(PricingSettings {
        cleaning_fee: request.cleaning_fee,
        linen_per_person: request.linen_per_person,
        tourist_tax_per_person_per_night: request.tourist_tax_per_person_per_night,
        deposit_amount: request.deposit_amount,
        default_high_season_price: request.default_high_season_price,
        default_low_season_price: request.default_low_season_price,
        default_minimum_stay: request.default_minimum_stay,
        high_season_minimum_stay: request.high_season_minimum_stay,
    })
}
