//! Pricing engine module for the villa booking site.
//!
//! Computes nightly stay prices from season periods and validates booking
//! dates against minimum-stay and Sunday-to-Sunday rules. The booking form
//! calls it for live price previews and the reservation handler calls it
//! again before accepting a booking.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod resolver;
pub mod responses;
pub mod routes;
pub mod services;
pub mod store;
pub mod validation;

// Re-export commonly used items
pub use calculators::{
    calculate_guest_charges, compute_stay_price, round_money, stay_nights, GuestCharges,
    NightlyRate, PriceBreakdown, MAX_STAY_NIGHTS,
};
pub use models::{PricingSettings, SeasonPeriod, SeasonSnapshot, SeasonType};
pub use resolver::{find_overlap, resolve_season};
pub use routes::router;
pub use services::{PricingError, StayQuote};
pub use store::{MemorySeasonStore, PgSeasonStore, SeasonStore};
pub use validation::{validate_booking_dates, BookingValidation, BookingViolation};
