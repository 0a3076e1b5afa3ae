//! Data models.

/// Username → password-hash lookup
pub mod credential;
/// Expense record and its fixed option lists
pub mod expense;
