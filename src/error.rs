//! Error types and HTTP error response handling.
//!
//! This module defines the application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.
//!
//! Login failures and form validation problems are not errors at this level:
//! they are shown inline on the page that caused them.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Every variant is fatal for the request that raised it. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (create-table, insert or select).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be decoded back into a record.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Corrupt expense record: {0}")]
    CorruptRecord(String),

    /// The spreadsheet writer failed.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// The session is not logged in.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Authentication required")]
    Unauthenticated,
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Internal failures hide their details from the client; they are logged instead.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                self.to_string(),
            ),
            AppError::Database(_) | AppError::CorruptRecord(_) => {
                tracing::error!(error = %self, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Export(_) => {
                tracing::error!(error = %self, "export failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "export_failed",
                    "Could not generate the spreadsheet".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
