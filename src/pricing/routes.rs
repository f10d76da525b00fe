//! Pricing API route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::error::Result;
use crate::AppState;

use super::models::{PricingSettings, SeasonPeriod};
use super::requests::{CreateSeasonRequest, StayRequest, UpdateSettingsRequest};
use super::responses::{QuoteResponse, SeasonsResponse, ValidationResponse};
use super::services;

/// Pricing and season administration routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/pricing/validate", post(validate))
        .route("/api/pricing/seasons", get(seasons))
        .route("/api/admin/seasons", post(create_season))
        .route("/api/admin/seasons/:id", delete(delete_season))
        .route("/api/admin/settings", put(update_settings))
        .route("/api/admin/cache/invalidate", post(invalidate_cache))
}

/// Price and validate a stay
async fn quote(
    State(state): State<AppState>,
    Json(request): Json<StayRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote =
        services::quote_stay(&state.cache, request.check_in, request.check_out, request.guests)
            .await?;
    Ok(Json(quote.into()))
}

/// Validate booking dates only
async fn validate(
    State(state): State<AppState>,
    Json(request): Json<StayRequest>,
) -> Json<ValidationResponse> {
    let validation =
        services::validate_stay(&state.cache, request.check_in, request.check_out).await;
    Json(validation.into())
}

/// Seasons and settings currently used for pricing
async fn seasons(State(state): State<AppState>) -> Json<SeasonsResponse> {
    let snapshot = state.cache.snapshot().await;
    Json(SeasonsResponse::from(snapshot.as_ref()))
}

async fn create_season(
    State(state): State<AppState>,
    Json(request): Json<CreateSeasonRequest>,
) -> Result<(StatusCode, Json<SeasonPeriod>)> {
    let season = services::create_season(&state.cache, request).await?;
    Ok((StatusCode::CREATED, Json(season)))
}

async fn delete_season(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    services::delete_season(&state.cache, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Json<PricingSettings>> {
    let settings = services::update_settings(&state.cache, request).await?;
    Ok(Json(settings))
}

async fn invalidate_cache(State(state): State<AppState>) -> StatusCode {
    state.cache.invalidate().await;
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{SeasonCache, DEFAULT_SNAPSHOT_TTL};
    use crate::pricing::store::MemorySeasonStore;
    use crate::pricing::SeasonType;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn february_high() -> SeasonPeriod {
        SeasonPeriod {
            id: Uuid::new_v4(),
            name: "February".to_string(),
            start_date: "2025-02-01".parse().unwrap(),
            end_date: "2025-02-28".parse().unwrap(),
            season_type: SeasonType::High,
            price_per_night: dec!(410),
            minimum_stay: 7,
            sunday_to_sunday: true,
            year: 2025,
            is_active: true,
        }
    }

    fn test_app(seasons: Vec<SeasonPeriod>) -> (Router, Arc<MemorySeasonStore>) {
        let store = Arc::new(MemorySeasonStore::new(seasons, PricingSettings::default()));
        let state = AppState {
            cache: SeasonCache::new(store.clone(), DEFAULT_SNAPSHOT_TTL),
        };
        (crate::app(state), store)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_quote_valid_high_season_week() {
        let (app, _) = test_app(vec![february_high()]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-02-02", "check_out": "2025-02-09", "guests": 2})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"]["nights"], 7);
        assert_eq!(body["price"]["base_price"], "2870");
        assert_eq!(body["price"]["total"], "3020");
        assert_eq!(body["price"]["breakdown"].as_array().unwrap().len(), 7);
        assert_eq!(body["price"]["breakdown"][0]["season_type"], "high");
        assert_eq!(body["price"]["breakdown"][0]["period_name"], "February");
        assert_eq!(body["validation"]["is_valid"], true);
        assert_eq!(body["guest_charges"]["total"], "85.00");
        assert_eq!(body["grand_total"], "3105.00");
        assert_eq!(body["using_default_pricing"], false);
    }

    #[tokio::test]
    async fn test_quote_monday_start_is_priced_but_invalid() {
        let (app, _) = test_app(vec![february_high()]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-02-03", "check_out": "2025-02-10"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["price"]["nights"], 7);
        assert_eq!(body["validation"]["is_valid"], false);
        assert_eq!(body["validation"]["code"], "sunday_to_sunday");
        assert!(body["validation"]["error"].is_string());
        assert!(body["validation"]["error_localized"].is_string());
        assert!(body.get("guest_charges").is_none());
    }

    #[tokio::test]
    async fn test_quote_reversed_range_is_unprocessable() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-02-09", "check_out": "2025-02-02"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_date_range");
    }

    #[tokio::test]
    async fn test_validate_short_low_season_stay() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/validate",
            Some(json!({"check_in": "2025-06-10", "check_out": "2025-06-12"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], false);
        assert_eq!(body["nights"], 2);
        assert_eq!(body["minimum_stay"], 3);
        assert_eq!(body["code"], "minimum_stay");
        assert_eq!(body["error"], "Minimum stay of 3 nights required");
    }

    #[tokio::test]
    async fn test_validate_valid_stay_has_no_error_fields() {
        let (app, _) = test_app(vec![]);

        let (_, body) = send(
            &app,
            "POST",
            "/api/pricing/validate",
            Some(json!({"check_in": "2025-06-10", "check_out": "2025-06-14"})),
        )
        .await;

        assert_eq!(body["is_valid"], true);
        assert!(body.get("error").is_none());
        assert!(body.get("error_localized").is_none());
    }

    #[tokio::test]
    async fn test_seasons_listing() {
        let (app, _) = test_app(vec![february_high()]);

        let (status, body) = send(&app, "GET", "/api/pricing/seasons", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["seasons"][0]["name"], "February");
        assert_eq!(body["seasons"][0]["price_per_night"], "410");
        assert_eq!(body["settings"]["cleaning_fee"], "150");
        assert!(body["fetched_at"].is_string());
    }

    #[tokio::test]
    async fn test_create_season_and_conflict() {
        let (app, _) = test_app(vec![february_high()]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/seasons",
            Some(json!({
                "name": "Summer",
                "start_date": "2025-07-01",
                "end_date": "2025-08-31",
                "season_type": "high",
                "price_per_night": "450",
                "minimum_stay": 7,
                "sunday_to_sunday": true
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["year"], 2025);
        assert_eq!(body["is_active"], true);

        let (status, body) = send(
            &app,
            "POST",
            "/api/admin/seasons",
            Some(json!({
                "name": "Late February",
                "start_date": "2025-02-20",
                "end_date": "2025-03-10",
                "season_type": "low",
                "price_per_night": "300",
                "minimum_stay": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error_type"], "overlapping_season");
    }

    #[tokio::test]
    async fn test_created_season_is_used_for_pricing() {
        let (app, _) = test_app(vec![]);

        // Prime the cache before the season exists
        let (_, before) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-07-06", "check_out": "2025-07-13"})),
        )
        .await;
        assert_eq!(before["price"]["base_price"], "2100");

        send(
            &app,
            "POST",
            "/api/admin/seasons",
            Some(json!({
                "name": "Summer",
                "start_date": "2025-07-01",
                "end_date": "2025-08-31",
                "season_type": "high",
                "price_per_night": "410",
                "minimum_stay": 7,
                "sunday_to_sunday": true
            })),
        )
        .await;

        let (_, after) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-07-06", "check_out": "2025-07-13"})),
        )
        .await;
        assert_eq!(after["price"]["base_price"], "2870");
    }

    #[tokio::test]
    async fn test_delete_season() {
        let season = february_high();
        let id = season.id;
        let (app, _) = test_app(vec![season]);

        let uri = format!("/api/admin/seasons/{}", id);
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_type"], "season_not_found");
    }

    #[tokio::test]
    async fn test_update_settings() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/admin/settings",
            Some(json!({
                "cleaning_fee": "200",
                "linen_per_person": "30",
                "tourist_tax_per_person_per_night": "3",
                "deposit_amount": "750",
                "default_high_season_price": "450",
                "default_low_season_price": "320",
                "default_minimum_stay": 2,
                "high_season_minimum_stay": 7
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cleaning_fee"], "200");

        let (_, quote) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-06-10", "check_out": "2025-06-12"})),
        )
        .await;
        assert_eq!(quote["price"]["base_price"], "640");
        assert_eq!(quote["price"]["total"], "840");
        assert_eq!(quote["price"]["deposit_amount"], "750");
        assert_eq!(quote["validation"]["is_valid"], true);
    }

    #[tokio::test]
    async fn test_update_settings_rejects_zero_fee() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/admin/settings",
            Some(json!({
                "cleaning_fee": "0",
                "linen_per_person": "30",
                "tourist_tax_per_person_per_night": "3",
                "deposit_amount": "750",
                "default_high_season_price": "450",
                "default_low_season_price": "320",
                "default_minimum_stay": 2,
                "high_season_minimum_stay": 7
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_settings");
    }

    #[tokio::test]
    async fn test_update_settings_rejects_oversized_price() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "PUT",
            "/api/admin/settings",
            Some(json!({
                "cleaning_fee": "150",
                "linen_per_person": "25",
                "tourist_tax_per_person_per_night": "2.50",
                "deposit_amount": "500",
                "default_high_season_price": "410",
                "default_low_season_price": "79228162514264337593543950335",
                "default_minimum_stay": 3,
                "high_season_minimum_stay": 7
            })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "invalid_settings");

        let (status, quote) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-06-10", "check_out": "2025-06-13"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(quote["price"]["base_price"], "900");
    }

    #[tokio::test]
    async fn test_quote_overlong_stay_is_unprocessable() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "-262143-01-01", "check_out": "9999-12-31"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_type"], "stay_too_long");
    }

    #[tokio::test]
    async fn test_validate_overlong_stay() {
        let (app, _) = test_app(vec![february_high()]);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/validate",
            Some(json!({"check_in": "2025-01-05", "check_out": "2026-01-11"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_valid"], false);
        assert_eq!(body["nights"], 371);
        assert_eq!(body["code"], "maximum_stay");
        assert_eq!(body["error"], "Stays are limited to 365 nights");
    }

    #[tokio::test]
    async fn test_quote_falls_back_to_defaults_when_store_down() {
        let (app, store) = test_app(vec![february_high()]);
        store.set_unavailable(true);

        let (status, body) = send(
            &app,
            "POST",
            "/api/pricing/quote",
            Some(json!({"check_in": "2025-02-02", "check_out": "2025-02-09"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["using_default_pricing"], true);
        assert_eq!(body["price"]["base_price"], "2100");
    }

    #[tokio::test]
    async fn test_invalidate_cache_endpoint() {
        let (app, store) = test_app(vec![]);

        send(&app, "GET", "/api/pricing/seasons", None).await;
        let (status, _) = send(&app, "POST", "/api/admin/cache/invalidate", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        send(&app, "GET", "/api/pricing/seasons", None).await;

        assert_eq!(store.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app(vec![]);

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cache"]["backend"], "memory");
    }
}
