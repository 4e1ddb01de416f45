//! HTTP request handlers

use super::types::{ErrorResponse, HealthResponse, InboundMessage, SessionResponse};
use super::AppState;
use crate::runtime::{SessionStore, StoreError};
use crate::state_machine::{Session, SessionKey};
use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Platform webhook
        .route("/bot/receive", post(receive))
        // Session inspection
        .route("/api/sessions/:user_id/:line_id", get(get_session))
        .route("/health", get(health))
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Webhook
// ============================================================

/// Accept a platform message for asynchronous processing.
///
/// The response only says whether the payload was understood; what the bot
/// does with it is never reported back here.
async fn receive(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    // Parsed regardless of Content-Type; the platform does not always send one
    let message: InboundMessage = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejecting malformed message");
        AppError::BadRequest(format!("Invalid message: {e}"))
    })?;

    tracing::debug!(
        user_id = %message.user_id,
        line_id = %message.line_id,
        message_type = %message.message_type,
        "Received message"
    );

    state.runtime.dispatch(message.into_event()).await;
    Ok(StatusCode::OK)
}

// ============================================================
// Sessions
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    let Path((user_id, line_id)) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let key = SessionKey::new(user_id, line_id);

    let (session, stored, error) = match state.runtime.lifecycle().store().load(&key).await {
        Ok(Some(session)) => (session, true, None),
        Ok(None) => (Session::default(), false, None),
        Err(e @ StoreError::Decode(_)) => (Session::default(), false, Some(e.to_string())),
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    Ok(Json(SessionResponse {
        user_id,
        line_id,
        stored,
        previous_state: session.previous_state,
        current_state: session.current_state,
        error,
    }))
}

// ============================================================
// Operational
// ============================================================

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        active_workers: state.runtime.active_workers().await,
    })
}

async fn get_version() -> &'static str {
    concat!("connect-companion ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
