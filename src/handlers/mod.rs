//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives request data (form body, session context)
//! 2. Drives the session state machine or reads the record store
//! 3. Returns an HTML page, a download or a JSON status

/// Spreadsheet download
pub mod export;
/// Service health endpoint
pub mod health;
/// Login, entry form and dashboard pages
pub mod pages;
