//! HTTP boundary
//!
//! Maps the two recording endpoints onto the coordinator. Holds no session
//! data of its own; every request is a stateless call into the slot.

use crate::publish::Artifact;
use crate::recorder::state::{RecordingConfig, Session, SessionState};
use crate::recorder::RecordingCoordinator;
use crate::utils::error::{ErrorResponse, RecorderError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RecordingCoordinator>,
    pub start_time: Instant,
}

/// Error as rendered to HTTP clients: a status and a `{code, message}` body.
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl From<RecorderError> for ApiError {
    fn from(error: RecorderError) -> Self {
        let status = match &error {
            RecorderError::InvalidConfig(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RecorderError::SessionAlreadyActive => StatusCode::CONFLICT,
            RecorderError::NoActiveSession => StatusCode::NOT_FOUND,
            RecorderError::Capture(_)
            | RecorderError::Publish(_)
            | RecorderError::Timeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            body: ErrorResponse::from(&error),
        }
    }
}

impl From<JsonRejection> for ApiError {
    // Malformed and out-of-enum request bodies share the INVALID_CONFIG code.
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: ErrorResponse {
                code: "INVALID_CONFIG".to_string(),
                message: rejection.body_text(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `POST /start-recording`
async fn start_recording(
    State(state): State<AppState>,
    payload: Result<Json<RecordingConfig>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(config) = payload?;
    state.coordinator.start(config).await?;
    Ok(Json(serde_json::json!({})))
}

#[derive(Debug, Serialize)]
struct StopResponse {
    share_url: String,
}

/// `POST /stop-recording`
async fn stop_recording(
    State(state): State<AppState>,
) -> Result<Json<StopResponse>, ApiError> {
    let session = state.coordinator.stop().await?;
    let share_url = session
        .artifact
        .as_ref()
        .map(|a: &Artifact| a.share_url.clone())
        .unwrap_or_default();
    Ok(Json(StopResponse { share_url }))
}

#[derive(Debug, Serialize)]
struct RecordingStateResponse {
    state: SessionState,
    session: Option<Session>,
}

/// `GET /recording-state`
async fn recording_state(State(state): State<AppState>) -> Json<RecordingStateResponse> {
    Json(RecordingStateResponse {
        state: state.coordinator.state(),
        session: state.coordinator.session(),
    })
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "version": env!("CARGO_PKG_VERSION"),
        "recording_state": state.coordinator.state(),
    }))
}

/// Build the service router.
///
/// Published artifacts are served from `artifact_root` under `/artifacts`,
/// which is what the default share URLs resolve to.
pub fn router(coordinator: Arc<RecordingCoordinator>, artifact_root: &Path) -> Router {
    let state = AppState {
        coordinator,
        start_time: Instant::now(),
    };

    Router::new()
        .route("/start-recording", post(start_recording))
        .route("/stop-recording", post(stop_recording))
        .route("/recording-state", get(recording_state))
        .route("/health", get(health))
        .nest_service("/artifacts", ServeDir::new(artifact_root))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
