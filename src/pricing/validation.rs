//! Booking date validation.
//!
//! A stay is checked against two rules derived from every season it touches:
//!
//! - **Minimum stay**: the high season minimum applies as soon as a single
//!   night falls in a high season period, otherwise the default minimum.
//! - **Sunday to Sunday**: if any night falls in a period flagged
//!   `sunday_to_sunday`, both check-in and check-out must be Sundays.
//!
//! Violations are reported as data. Callers must check `is_valid` before
//! accepting a booking.

use chrono::{Datelike, NaiveDate, Weekday};

use super::calculators::stay_nights;
use super::models::{PricingSettings, SeasonPeriod, SeasonType};
use super::resolver::resolve_season;
use super::services::PricingError;

/// Reason a booking was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingViolation {
    /// Check-out is not after check-in
    InvalidDateRange,
    /// Fewer nights than the applicable minimum
    MinimumStay { required: i32 },
    /// More nights than can be booked at once
    MaximumStay { maximum: i64 },
    /// Stay touches a Sunday-to-Sunday period but does not start and end on Sunday
    SundayToSunday,
}

impl BookingViolation {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            BookingViolation::InvalidDateRange => "invalid_date_range",
            BookingViolation::MinimumStay { .. } => "minimum_stay",
            BookingViolation::MaximumStay { .. } => "maximum_stay",
            BookingViolation::SundayToSunday => "sunday_to_sunday",
        }
    }

    /// English message
    pub fn message(&self) -> String {
        match self {
            BookingViolation::InvalidDateRange => {
                "Check-out date must be after check-in date".to_string()
            }
            BookingViolation::MinimumStay { required } => {
                format!("Minimum stay of {} nights required", required)
            }
            BookingViolation::MaximumStay { maximum } => {
                format!("Stays are limited to {} nights", maximum)
            }
            BookingViolation::SundayToSunday => {
                "Bookings in this period must start and end on a Sunday".to_string()
            }
        }
    }

    /// French message shown on the French version of the booking form
    pub fn message_localized(&self) -> String {
        match self {
            BookingViolation::InvalidDateRange => {
                "La date de départ doit être postérieure à la date d'arrivée".to_string()
            }
            BookingViolation::MinimumStay { required } => {
                format!("Séjour minimum de {} nuits requis", required)
            }
            BookingViolation::MaximumStay { maximum } => {
                format!("Les séjours sont limités à {} nuits", maximum)
            }
            BookingViolation::SundayToSunday => {
                "Les réservations sur cette période se font du dimanche au dimanche".to_string()
            }
        }
    }
}

/// Result of booking date validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingValidation {
    pub is_valid: bool,
    pub nights: i64,
    pub minimum_stay: i32,
    pub requires_sunday_to_sunday: bool,
    pub violation: Option<BookingViolation>,
}

impl BookingValidation {
    fn rejected(nights: i64, minimum_stay: i32, requires_sunday: bool, violation: BookingViolation) -> Self {
        Self {
            is_valid: false,
            nights,
            minimum_stay,
            requires_sunday_to_sunday: requires_sunday,
            violation: Some(violation),
        }
    }

    pub fn error(&self) -> Option<String> {
        self.violation.map(|v| v.message())
    }

    pub fn error_localized(&self) -> Option<String> {
        self.violation.map(|v| v.message_localized())
    }
}

/// Validate a stay against minimum-stay and Sunday-to-Sunday rules.
///
/// The minimum-stay rule is checked first; only the first failing rule is
/// reported. Weekdays come from the calendar date alone, so the result does
/// not depend on the server's timezone.
pub fn validate_booking_dates(
    check_in: NaiveDate,
    check_out: NaiveDate,
    seasons: &[SeasonPeriod],
    settings: &PricingSettings,
) -> BookingValidation {
    let nights = match stay_nights(check_in, check_out) {
        Ok(n) => n,
        Err(err) => {
            let violation = match err {
                PricingError::StayTooLong { maximum, .. } => BookingViolation::MaximumStay { maximum },
                _ => BookingViolation::InvalidDateRange,
            };
            return BookingValidation::rejected(
                (check_out - check_in).num_days(),
                settings.default_minimum_stay,
                false,
                violation,
            );
        }
    };

    let mut has_high_season = false;
    let mut requires_sunday = false;

    for night in check_in.iter_days().take(nights as usize) {
        if let Some(season) = resolve_season(night, seasons) {
            if season.season_type == SeasonType::High {
                has_high_season = true;
            }
            if season.sunday_to_sunday {
                requires_sunday = true;
            }
        }
    }

    let minimum_stay = if has_high_season {
        settings.high_season_minimum_stay
    } else {
        settings.default_minimum_stay
    };

    if nights < i64::from(minimum_stay) {
        return BookingValidation::rejected(
            nights,
            minimum_stay,
            requires_sunday,
            BookingViolation::MinimumStay {
                required: minimum_stay,
            },
        );
    }

    if requires_sunday && (check_in.weekday() != Weekday::Sun || check_out.weekday() != Weekday::Sun) {
        return BookingValidation::rejected(
            nights,
            minimum_stay,
            requires_sunday,
            BookingViolation::SundayToSunday,
        );
    }

    BookingValidation {
        is_valid: true,
        nights,
        minimum_stay,
        requires_sunday_to_sunday: requires_sunday,
        violation: None,
    }
}
