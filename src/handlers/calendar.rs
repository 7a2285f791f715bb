use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::queries;
use crate::services::calendar::generate_ics;
use crate::state::AppState;

// GET /calendar/feed.ics: every live appointment as one feed.
pub async fn calendar_feed(State(state): State<Arc<AppState>>) -> Response {
    let appointments = {
        let db = state.db.lock().unwrap();
        match queries::all_appointments(&db) {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(error = %e, "failed to load appointments for feed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        }
    };

    let ics = generate_ics(&appointments, state.config.appointment_minutes);
    ([(header::CONTENT_TYPE, "text/calendar; charset=utf-8")], ics).into_response()
}

// GET /calendar/:customer_id: one customer's appointments as a download.
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Response {
    let customer_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let appointments = {
        let db = state.db.lock().unwrap();
        match queries::appointments_for_customer(&db, customer_id) {
            Ok(a) => a,
            Err(e) => {
                tracing::error!(error = %e, "failed to load appointments for .ics");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response();
            }
        }
    };

    if appointments.is_empty() {
        return (StatusCode::NOT_FOUND, "No appointments for that customer").into_response();
    }

    let ics = generate_ics(&appointments, state.config.appointment_minutes);
    let disposition = format!("attachment; filename=\"appointments-{customer_id}.ics\"");

    (
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    )
        .into_response()
}
