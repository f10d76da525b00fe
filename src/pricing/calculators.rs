//! Core pricing calculation functions.
//!
//! Pure functions for stay pricing - no database access. Every function
//! works on a snapshot of seasons and settings handed in by the caller.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{PricingSettings, SeasonPeriod, SeasonType};
use super::resolver::resolve_season;
use super::services::PricingError;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use villa_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Longest stay that can be priced or booked
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Number of nights between check-in and check-out.
///
/// Check-out is the departure day and is not a stayed night. A range where
/// check-out does not come after check-in is rejected, as is a stay longer
/// than [`MAX_STAY_NIGHTS`].
pub fn stay_nights(check_in: NaiveDate, check_out: NaiveDate) -> Result<i64, PricingError> {
    let nights = (check_out - check_in).num_days();
    if nights <= 0 {
        return Err(PricingError::InvalidDateRange {
            check_in,
            check_out,
        });
    }
    if nights > MAX_STAY_NIGHTS {
        return Err(PricingError::StayTooLong {
            nights,
            maximum: MAX_STAY_NIGHTS,
        });
    }
    Ok(nights)
}

/// A single priced night
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub season_type: SeasonType,
    pub price: Decimal,
    pub period_name: Option<String>,
}

/// Result of stay price calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub base_price: Decimal,
    pub cleaning_fee: Decimal,
    pub deposit_amount: Decimal,
    pub total: Decimal,
    pub breakdown: Vec<NightlyRate>,
}

/// Price every night of a stay.
///
/// Each night is resolved against `seasons`; nights outside any active period
/// fall back to `settings.default_low_season_price`. The total is the sum of
/// the nightly prices plus the cleaning fee. The deposit is flat and reported
/// separately.
pub fn compute_stay_price(
    check_in: NaiveDate,
    check_out: NaiveDate,
    seasons: &[SeasonPeriod],
    settings: &PricingSettings,
) -> Result<PriceBreakdown, PricingError> {
    let nights = stay_nights(check_in, check_out)?;

    let breakdown: Vec<NightlyRate> = check_in
        .iter_days()
        .take(nights as usize)
        .map(|night| match resolve_season(night, seasons) {
            Some(season) => NightlyRate {
                date: night,
                season_type: season.season_type,
                price: season.price_per_night,
                period_name: Some(season.name.clone()),
            },
            None => NightlyRate {
                date: night,
                season_type: SeasonType::Low,
                price: settings.default_low_season_price,
                period_name: None,
            },
        })
        .collect();

    let base_price = breakdown
        .iter()
        .try_fold(Decimal::ZERO, |sum, night| sum.checked_add(night.price))
        .ok_or(PricingError::AmountOverflow)?;
    let total = base_price
        .checked_add(settings.cleaning_fee)
        .ok_or(PricingError::AmountOverflow)?;

    Ok(PriceBreakdown {
        check_in,
        check_out,
        nights,
        base_price,
        cleaning_fee: settings.cleaning_fee,
        deposit_amount: settings.deposit_amount,
        total,
        breakdown,
    })
}

/// Per-guest extras for a stay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestCharges {
    pub guests: u32,
    pub linen: Decimal,
    pub tourist_tax: Decimal,
    pub total: Decimal,
}

/// Calculate linen and tourist tax for a party.
///
/// Linen is charged once per guest; tourist tax per guest per night.
pub fn calculate_guest_charges(
    nights: i64,
    guests: u32,
    settings: &PricingSettings,
) -> Result<GuestCharges, PricingError> {
    let guest_count = Decimal::from(guests);
    let nights = Decimal::from(nights.max(0));

    let linen = guest_count
        .checked_mul(settings.linen_per_person)
        .ok_or(PricingError::AmountOverflow)?;
    let tourist_tax = guest_count
        .checked_mul(nights)
        .and_then(|guest_nights| guest_nights.checked_mul(settings.tourist_tax_per_person_per_night))
        .ok_or(PricingError::AmountOverflow)?;

    let linen = round_money(linen, 2);
    let tourist_tax = round_money(tourist_tax, 2);
    let total = linen
        .checked_add(tourist_tax)
        .ok_or(PricingError::AmountOverflow)?;

    Ok(GuestCharges {
        guests,
        linen,
        tourist_tax,
        total,
    })
}
