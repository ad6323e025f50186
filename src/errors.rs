use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::models::DraftError;
use crate::services::backend::BackendError;
use crate::services::conversation::SessionError;
use crate::services::materializer::BookingError;
use crate::services::temporal::TemporalError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Backend(String),
}

impl From<DraftError> for AppError {
    fn from(e: DraftError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<TemporalError> for AppError {
    fn from(e: TemporalError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<BackendError> for AppError {
    fn from(e: BackendError) -> Self {
        AppError::Backend(e.to_string())
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NotLoggedIn => AppError::Unauthorized(e.to_string()),
            BookingError::MissingTenant => AppError::Forbidden(e.to_string()),
            BookingError::Persistence(detail) => AppError::Backend(detail),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::NoBooking => AppError::NotFound(e.to_string()),
            SessionError::AlreadySubmitted
            | SessionError::SaveInProgress
            | SessionError::Speech(_) => AppError::Conflict(e.to_string()),
            SessionError::InvalidBooking(e) => e.into(),
            SessionError::Temporal(e) => e.into(),
            SessionError::Booking(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
