//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.

/// Session cookie resolution
pub mod session;
