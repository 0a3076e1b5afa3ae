//! Health check endpoint for service monitoring.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    error::AppError,
    state::{AppState, Storage},
};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service status
    pub status: String,

    /// Storage backend and its status
    pub storage: String,

    /// Number of live sessions
    pub sessions: usize,

    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "status": "healthy",
///   "storage": "sqlite: connected",
///   "sessions": 2,
///   "timestamp": "2025-12-21T19:00:00Z"
/// }
/// ```
///
/// # Response (500 Internal Server Error)
///
/// If the database is unreachable, returns the standard error response.
pub async fn health_check(State(app): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let storage = match &app.storage {
        Storage::Durable(store) => {
            store.ping().await?;
            "sqlite: connected"
        }
        Storage::Ephemeral => "memory",
    };

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        storage: storage.to_string(),
        sessions: app.sessions.len(),
        timestamp: Utc::now(),
    }))
}
