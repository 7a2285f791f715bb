use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ConversationMessage;
use crate::services::conversation::{self, GREETING};
use crate::state::AppState;

// POST /api/start-session

#[derive(Serialize)]
pub struct StartSessionResponse {
    pub success: bool,
    pub session_id: String,
    pub message: &'static str,
}

pub async fn start_session(State(state): State<Arc<AppState>>) -> Json<StartSessionResponse> {
    let handle = state.sessions.start();
    Json(StartSessionResponse {
        success: true,
        session_id: handle.id.clone(),
        message: GREETING,
    })
}

// POST /api/send-message

#[derive(Deserialize)]
pub struct SendMessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub response: String,
    pub stage: &'static str,
}

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    let message = req.message.trim().to_string();
    if message.is_empty() {
        return Err(AppError::BadRequest("message cannot be empty".to_string()));
    }

    let handle = state
        .sessions
        .get(&req.session_id)
        .ok_or(AppError::InvalidSession)?;

    // Serializes turns within this session; other sessions are unaffected.
    let mut conv = handle.conversation.lock().await;
    let response = conversation::process_message(&state, &mut conv, &message)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, session = %req.session_id, "failed to process turn");
            // A turn only errors on store access; provider failures are
            // absorbed by the extractor fallback and the commit retry path.
            match e.downcast::<rusqlite::Error>() {
                Ok(db) => AppError::Database(db),
                Err(other) => AppError::Internal(other.to_string()),
            }
        })?;

    Ok(Json(SendMessageResponse {
        success: true,
        response,
        stage: conv.stage.as_str(),
    }))
}

// POST /api/reset-session

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn reset_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let handle = state
        .sessions
        .get(&req.session_id)
        .ok_or(AppError::InvalidSession)?;

    let mut conv = handle.conversation.lock().await;
    *conv = crate::models::Conversation::new(Utc::now().naive_utc());

    Ok(Json(OkResponse {
        success: true,
        message: "session reset",
    }))
}

// POST /api/end-session

pub async fn end_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> Json<OkResponse> {
    // Ending an already-gone session is not an error.
    state.sessions.end(&req.session_id);
    Json(OkResponse {
        success: true,
        message: "session ended",
    })
}

// GET /api/get-history?session_id=

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub session_id: String,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: Vec<ConversationMessage>,
    pub stage: &'static str,
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let handle = state
        .sessions
        .get(&query.session_id)
        .ok_or(AppError::InvalidSession)?;

    let conv = handle.conversation.lock().await;
    Ok(Json(HistoryResponse {
        success: true,
        history: conv.messages.clone(),
        stage: conv.stage.as_str(),
    }))
}
