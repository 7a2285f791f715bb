use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::models::{Appointment, Customer};
use crate::state::AppState;

#[allow(clippy::result_large_err)]
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), Response> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"success": false, "error": "unauthorized"})),
        )
            .into_response());
    }
    Ok(())
}

fn internal_error(e: anyhow::Error) -> Response {
    tracing::error!(error = %e, "admin query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"success": false, "error": e.to_string()})),
    )
        .into_response()
}

// GET /api/admin/appointments

#[derive(Serialize)]
pub struct AppointmentsResponse {
    pub success: bool,
    pub appointments: Vec<Appointment>,
}

pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<AppointmentsResponse>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let appointments = {
        let db = state.db.lock().unwrap();
        queries::all_appointments(&db).map_err(internal_error)?
    };
    Ok(Json(AppointmentsResponse {
        success: true,
        appointments,
    }))
}

// GET /api/admin/customers

#[derive(Serialize)]
pub struct CustomersResponse {
    pub success: bool,
    pub customers: Vec<Customer>,
}

pub async fn get_customers(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CustomersResponse>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let customers = {
        let db = state.db.lock().unwrap();
        queries::all_customers(&db).map_err(internal_error)?
    };
    Ok(Json(CustomersResponse {
        success: true,
        customers,
    }))
}

// GET /api/admin/status

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub active_sessions: usize,
    pub customer_count: i64,
    pub appointment_count: i64,
    pub upcoming_count: i64,
}

pub async fn get_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let stats = {
        let db = state.db.lock().unwrap();
        queries::store_stats(&db, state.today()).map_err(internal_error)?
    };
    Ok(Json(StatusResponse {
        success: true,
        active_sessions: state.sessions.len(),
        customer_count: stats.customer_count,
        appointment_count: stats.appointment_count,
        upcoming_count: stats.upcoming_count,
    }))
}

// DELETE /api/admin/appointments/:id

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, Response> {
    check_auth(&headers, &state.config.admin_token)?;

    let deleted = {
        let db = state.db.lock().unwrap();
        queries::delete_appointment(&db, &id).map_err(internal_error)?
    };
    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"success": false, "error": "appointment not found"})),
        )
            .into_response());
    }
    Ok(Json(serde_json::json!({"success": true})))
}
