//! Database queries for the pricing engine.
//!
//! Seasons live in `villa_seasons`; the settings singleton is row `id = 1`
//! of `villa_pricing_settings`.

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

use super::models::{PricingSettings, SeasonPeriod};

const SETTINGS_ID: i32 = 1;

/// Years whose seasons are loaded into the pricing snapshot (current and next)
pub fn booking_years() -> Vec<i32> {
    let current = Utc::now().year();
    vec![current, current + 1]
}

/// List active seasons for the given years
pub async fn list_active_seasons(
    pool: &PgPool,
    years: &[i32],
) -> Result<Vec<SeasonPeriod>, AppError> {
    let seasons = sqlx::query_as::<_, SeasonPeriod>(
        r#"
        SELECT
            id, name, start_date, end_date, season_type,
            price_per_night, minimum_stay, sunday_to_sunday,
            year, is_active
        FROM villa_seasons
        WHERE is_active = true
          AND year = ANY($1)
        ORDER BY start_date, name
        "#,
    )
    .bind(years)
    .fetch_all(pool)
    .await?;

    Ok(seasons)
}

/// Find active seasons intersecting an inclusive date range
pub async fn find_overlapping_seasons(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<SeasonPeriod>, AppError> {
    let seasons = sqlx::query_as::<_, SeasonPeriod>(
        r#"
        SELECT
            id, name, start_date, end_date, season_type,
            price_per_night, minimum_stay, sunday_to_sunday,
            year, is_active
        FROM villa_seasons
        WHERE is_active = true
          AND start_date <= $2
          AND end_date >= $1
        ORDER BY start_date, name
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(seasons)
}

/// Insert a season period
pub async fn insert_season(pool: &PgPool, season: &SeasonPeriod) -> Result<SeasonPeriod, AppError> {
    let saved = sqlx::query_as::<_, SeasonPeriod>(
        r#"
        INSERT INTO villa_seasons (
            id, name, start_date, end_date, season_type,
            price_per_night, minimum_stay, sunday_to_sunday,
            year, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id, name, start_date, end_date, season_type,
            price_per_night, minimum_stay, sunday_to_sunday,
            year, is_active
        "#,
    )
    .bind(season.id)
    .bind(&season.name)
    .bind(season.start_date)
    .bind(season.end_date)
    .bind(season.season_type.as_str())
    .bind(season.price_per_night)
    .bind(season.minimum_stay)
    .bind(season.sunday_to_sunday)
    .bind(season.year)
    .bind(season.is_active)
    .fetch_one(pool)
    .await?;

    Ok(saved)
}

/// Delete a season period; returns false if no row matched
pub async fn delete_season(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM villa_seasons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Get the pricing settings, creating the row with defaults on first read
pub async fn get_pricing_settings(pool: &PgPool) -> Result<PricingSettings, AppError> {
    if let Some(settings) = fetch_pricing_settings(pool).await? {
        return Ok(settings);
    }

    tracing::info!("No pricing settings row found, creating defaults");
    let defaults = PricingSettings::default();
    sqlx::query(
        r#"
        INSERT INTO villa_pricing_settings (
            id, cleaning_fee, linen_per_person, tourist_tax_per_person_per_night,
            deposit_amount, default_high_season_price, default_low_season_price,
            default_minimum_stay, high_season_minimum_stay
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(defaults.cleaning_fee)
    .bind(defaults.linen_per_person)
    .bind(defaults.tourist_tax_per_person_per_night)
    .bind(defaults.deposit_amount)
    .bind(defaults.default_high_season_price)
    .bind(defaults.default_low_season_price)
    .bind(defaults.default_minimum_stay)
    .bind(defaults.high_season_minimum_stay)
    .execute(pool)
    .await?;

    // Another instance may have won the insert; read back whatever is stored
    fetch_pricing_settings(pool)
        .await?
        .ok_or_else(|| AppError::Internal("pricing settings row missing after insert".to_string()))
}

async fn fetch_pricing_settings(pool: &PgPool) -> Result<Option<PricingSettings>, AppError> {
    let settings = sqlx::query_as::<_, PricingSettings>(
        r#"
        SELECT
            cleaning_fee, linen_per_person, tourist_tax_per_person_per_night,
            deposit_amount, default_high_season_price, default_low_season_price,
            default_minimum_stay, high_season_minimum_stay
        FROM villa_pricing_settings
        WHERE id = $1
        "#,
    )
    .bind(SETTINGS_ID)
    .fetch_optional(pool)
    .await?;

    Ok(settings)
}

/// Create or replace the pricing settings singleton
pub async fn save_pricing_settings(
    pool: &PgPool,
    settings: &PricingSettings,
) -> Result<PricingSettings, AppError> {
    let saved = sqlx::query_as::<_, PricingSettings>(
        r#"
        INSERT INTO villa_pricing_settings (
            id, cleaning_fee, linen_per_person, tourist_tax_per_person_per_night,
            deposit_amount, default_high_season_price, default_low_season_price,
            default_minimum_stay, high_season_minimum_stay
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (id) DO UPDATE SET
            cleaning_fee = EXCLUDED.cleaning_fee,
            linen_per_person = EXCLUDED.linen_per_person,
            tourist_tax_per_person_per_night = EXCLUDED.tourist_tax_per_person_per_night,
            deposit_amount = EXCLUDED.deposit_amount,
            default_high_season_price = EXCLUDED.default_high_season_price,
            default_low_season_price = EXCLUDED.default_low_season_price,
            default_minimum_stay = EXCLUDED.default_minimum_stay,
            high_season_minimum_stay = EXCLUDED.high_season_minimum_stay
        RETURNING
            cleaning_fee, linen_per_person, tourist_tax_per_person_per_night,
            deposit_amount, default_high_season_price, default_low_season_price,
            default_minimum_stay, high_season_minimum_stay
        "#,
    )
    .bind(SETTINGS_ID)
    .bind(settings.cleaning_fee)
    .bind(settings.linen_per_person)
    .bind(settings.tourist_tax_per_person_per_night)
    .bind(settings.deposit_amount)
    .bind(settings.default_high_season_price)
    .bind(settings.default_low_season_price)
    .bind(settings.default_minimum_stay)
    .bind(settings.high_season_minimum_stay)
    .fetch_one(pool)
    .await?;

    Ok(saved)
}
