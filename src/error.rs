//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::ErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Pricing(err) => match err {
                PricingError::InvalidDateRange { .. }
                | PricingError::StayTooLong { .. }
                | PricingError::AmountOverflow
                | PricingError::InvalidSeason(_)
                | PricingError::InvalidSettings(_) => StatusCode::UNPROCESSABLE_ENTITY,
                PricingError::OverlappingSeason { .. } => StatusCode::CONFLICT,
                PricingError::SeasonNotFound(_) => StatusCode::NOT_FOUND,
                PricingError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Pricing(err) => err.error_type(),
            AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and reported generically
        let message = if status.is_server_error() {
            tracing::error!("{}", self);
            match &self {
                AppError::Database(_) => "Database error".to_string(),
                AppError::Pricing(PricingError::Storage(_)) => {
                    "Season store unavailable".to_string()
                }
                _ => "Internal error".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error_type: self.error_type().to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
