pub mod appointments;
pub mod auth;
pub mod calendar;
pub mod health;
pub mod sessions;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/:id/messages", post(sessions::post_message))
        .route("/api/sessions/:id/reset", post(sessions::reset_session))
        .route(
            "/api/sessions/:id/booking",
            put(sessions::edit_booking),
        )
        .route(
            "/api/sessions/:id/booking/save",
            post(sessions::save_booking),
        )
        .route(
            "/api/sessions/:id/booking.ics",
            get(calendar::download_ics),
        )
        .route(
            "/api/sessions/:id/speech/listen",
            post(sessions::start_listening),
        )
        .route(
            "/api/sessions/:id/speech/stop",
            post(sessions::stop_listening),
        )
        .route(
            "/api/sessions/:id/speech/result",
            post(sessions::recognition_result),
        )
        .route(
            "/api/sessions/:id/speech/finished",
            post(sessions::speech_finished),
        )
        .route("/api/directory", get(appointments::get_directory))
        .route(
            "/api/appointments",
            post(appointments::create_manual_appointment),
        )
        .with_state(state)
}
