//! Business logic services.
//!
//! Services hold the core logic separated from HTTP handlers. Everything
//! here except `record_store` is free of I/O.

pub mod expense_form;
pub mod export_service;
pub mod record_store;
pub mod report_service;
pub mod session_service;
