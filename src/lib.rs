//! Expense tracking for a knitwear workshop.
//!
//! Users log in, record expenses through a form, and view a dashboard with
//! totals by category and by date plus a spreadsheet export.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum, server-side rendered HTML
//! - **Database**: SQLite with sqlx, or per-session memory
//! - **Authentication**: fixed credential list with SHA-256 password hashes
//! - **Export**: Office Open XML workbook via rust_xlsxwriter
//!
//! The session logic is a pure state machine (`services::session_service`);
//! handlers only feed it actions, run the requested effect and render.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod views;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the HTTP router.
pub fn app(state: AppState) -> Router {
    // Page routes share the session middleware
    let pages = Router::new()
        .route("/", get(handlers::pages::index))
        .route("/login", post(handlers::pages::login))
        .route("/logout", post(handlers::pages::logout))
        .route("/expenses/new", get(handlers::pages::new_expense))
        .route("/expenses", post(handlers::pages::submit_expense))
        .route("/dashboard", get(handlers::pages::dashboard))
        .route("/dashboard/export", get(handlers::export::export_xlsx))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::session::session_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
