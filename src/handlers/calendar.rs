use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::calendar::generate_ics;
use crate::state::AppState;

// GET /api/sessions/:id/booking.ics
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))?;
    let booking = session
        .booking()
        .ok_or_else(|| AppError::NotFound("no finalized booking in this session".to_string()))?;

    let ics = generate_ics(
        &booking,
        id,
        &state.deps.profile.company_name,
        state.config.appointment_duration_minutes,
    );
    let filename = format!(
        "appointment-{}.ics",
        booking.appointment_date.format("%Y-%m-%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
