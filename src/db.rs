//! SQLite connection pool and schema setup.
//!
//! This module provides utilities for:
//! - Opening the SQLite pool at startup (creating the file if missing)
//! - Creating the `gastos` table idempotently

use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;

/// Type alias for the SQLite connection pool.
pub type DbPool = Pool<Sqlite>;

/// Create a new SQLite connection pool.
///
/// # Arguments
///
/// * `database_url` - SQLite connection string, e.g. `sqlite://gastos.db` or `sqlite::memory:`
///
/// # Configuration
///
/// - Maximum connections: 5, or 1 for in-memory databases so every query
///   sees the same database
/// - The database file is created when it does not exist
///
/// # Errors
///
/// Returns an error if the URL is invalid or the file cannot be opened.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool_options = if database_url.contains(":memory:") {
        // An in-memory database lives and dies with its single connection
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    pool_options.connect_with(options).await
}

/// Create the `gastos` table if it does not exist yet.
///
/// Runs in its own transaction. There is no migration tracking: the table
/// shape is fixed.
///
/// # Errors
///
/// Returns any database error; startup treats it as fatal.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gastos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL,
            categoria TEXT NOT NULL,
            descricao TEXT NOT NULL,
            quantidade REAL NOT NULL,
            unidade TEXT NOT NULL,
            valor_unitario REAL NOT NULL,
            valor_total REAL NOT NULL,
            forma_pagamento TEXT NOT NULL,
            observacoes TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await
}
