use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::auth::optional_actor;
use crate::models::{Appointment, BookingEdit};
use crate::services::conversation::{ConversationSession, SessionSnapshot, SubmitOutcome};
use crate::state::AppState;

fn lookup(state: &AppState, id: &Uuid) -> Result<Arc<ConversationSession>, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("session {id}")))
}

// POST /api/sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SessionSnapshot>), AppError> {
    let actor = optional_actor(&headers, &state.config.jwt_secret)?;
    let session = state.sessions.create(actor);
    Ok((StatusCode::CREATED, Json(session.snapshot())))
}

// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(lookup(&state, &id)?.snapshot()))
}

// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("session {id}")))
    }
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    /// True when nothing was sent: blank text or a reply still pending.
    pub ignored: bool,
    pub reply: Option<String>,
    pub session: SessionSnapshot,
}

fn message_response(outcome: SubmitOutcome, session: &ConversationSession) -> MessageResponse {
    let (ignored, reply) = match outcome {
        SubmitOutcome::Answered(text) => (false, Some(text)),
        SubmitOutcome::Ignored | SubmitOutcome::Superseded => (true, None),
    };
    MessageResponse {
        ignored,
        reply,
        session: session.snapshot(),
    }
}

// POST /api/sessions/:id/messages
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = lookup(&state, &id)?;
    let outcome = session.submit(&payload.text).await;
    Ok(Json(message_response(outcome, &session)))
}

// POST /api/sessions/:id/reset
pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lookup(&state, &id)?;
    session.reset();
    Ok(Json(session.snapshot()))
}

// PUT /api/sessions/:id/booking
pub async fn edit_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(edit): Json<BookingEdit>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lookup(&state, &id)?;
    session.edit_booking(&edit)?;
    Ok(Json(session.snapshot()))
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub appointment: Appointment,
    pub session: SessionSnapshot,
}

// POST /api/sessions/:id/booking/save
pub async fn save_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SaveResponse>, AppError> {
    let session = lookup(&state, &id)?;
    let appointment = session.save().await?;
    Ok(Json(SaveResponse {
        appointment,
        session: session.snapshot(),
    }))
}

// POST /api/sessions/:id/speech/listen
pub async fn start_listening(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lookup(&state, &id)?;
    session.start_listening()?;
    Ok(Json(session.snapshot()))
}

// POST /api/sessions/:id/speech/stop
pub async fn stop_listening(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lookup(&state, &id)?;
    session.stop_listening();
    Ok(Json(session.snapshot()))
}

// POST /api/sessions/:id/speech/result
pub async fn recognition_result(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let session = lookup(&state, &id)?;
    let outcome = session.recognition_result(&payload.text).await;
    Ok(Json(message_response(outcome, &session)))
}

// POST /api/sessions/:id/speech/finished
pub async fn speech_finished(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lookup(&state, &id)?;
    session.speech_finished();
    Ok(Json(session.snapshot()))
}
