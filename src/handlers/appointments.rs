use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::errors::AppError;
use crate::handlers::auth::{optional_actor, require_actor};
use crate::models::employee::group_by_department;
use crate::models::{Appointment, Department, ManualBookingForm};
use crate::services::materializer::materialize;
use crate::services::temporal::check_not_elapsed;
use crate::state::AppState;

// GET /api/directory
pub async fn get_directory(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Department>>, AppError> {
    let actor = optional_actor(&headers, &state.config.jwt_secret)?;
    let entries = state.deps.directory.list_employees(actor.as_ref()).await?;
    Ok(Json(group_by_department(&entries)))
}

// POST /api/appointments
pub async fn create_manual_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(form): Json<ManualBookingForm>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let actor = require_actor(&headers, &state.config.jwt_secret)?;

    let now = state.deps.clock.now();
    let (request, starts_at) = form.into_request(now.date())?;
    check_not_elapsed(starts_at.date(), starts_at.time(), now)?;

    let appointment =
        materialize(Some(&actor), &request, state.deps.appointments.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}
