//! Spreadsheet download.

use axum::{
    Extension,
    http::header,
    response::IntoResponse,
};

use crate::{
    error::AppError,
    middleware::session::SessionContext,
    services::export_service::{self, EXPORT_FILENAME, EXPORT_MIME},
};

/// Download every record as `gastos_malharia.xlsx`.
///
/// # Endpoint
///
/// `GET /dashboard/export`
///
/// # Response
///
/// - **Success (200 OK)**: the workbook bytes as an attachment
/// - **Error (401)**: session is not logged in
/// - **Error (500)**: storage or spreadsheet failure
pub async fn export_xlsx(
    Extension(context): Extension<SessionContext>,
) -> Result<impl IntoResponse, AppError> {
    let session = context.handle.lock().await;
    let Some(username) = session.state.username() else {
        return Err(AppError::Unauthenticated);
    };

    let records = session.store.all().await?;
    let bytes = export_service::to_xlsx(&records)?;
    tracing::info!(user = username, rows = records.len(), "spreadsheet exported");

    Ok((
        [
            (header::CONTENT_TYPE, EXPORT_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        bytes,
    ))
}
