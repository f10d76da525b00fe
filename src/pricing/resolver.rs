//! Date to season resolution.
//!
//! Seasons are scanned in the order supplied and the first active period
//! covering the date wins. Stores hand seasons back ordered by
//! `start_date, name`, and `find_overlap` keeps overlapping active periods
//! out of the table at write time, so in practice at most one period matches.

use chrono::NaiveDate;

use super::models::SeasonPeriod;

/// Resolve the season for a single night.
///
/// Inactive periods are skipped. Returns `None` when no active period covers
/// `date`; callers then price the night at the default low season rate.
pub fn resolve_season(date: NaiveDate, seasons: &[SeasonPeriod]) -> Option<&SeasonPeriod> {
    seasons
        .iter()
        .find(|season| season.is_active && season.contains(date))
}

/// Find the first active period that would collide with `candidate`.
///
/// The candidate itself (same id) is ignored so an edit can be re-checked
/// against the table it already lives in. An inactive candidate never
/// conflicts.
pub fn find_overlap<'a>(
    candidate: &SeasonPeriod,
    existing: &'a [SeasonPeriod],
) -> Option<&'a SeasonPeriod> {
    if !candidate.is_active {
        return None;
    }

    existing.iter().find(|season| {
        season.is_active && season.id != candidate.id && season.overlaps(candidate)
    })
}
