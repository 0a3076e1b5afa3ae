//! Expense record store - append and full-scan retrieval.
//!
//! Two interchangeable backends sit behind `RecordStore`:
//! - `MemoryStore`: ordered in-memory sequence, owned by one session
//! - `SqliteStore`: the `gastos` table, shared by all sessions
//!
//! Only one backend is active per process (see `config::StorageMode`).
//! Neither supports update or delete; there is no dedup either.

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::expense::{ExpenseRecord, ExpenseRow},
};

/// Ephemeral store. Returns records in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<ExpenseRecord>,
}

impl MemoryStore {
    pub fn append(&mut self, record: ExpenseRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> Vec<ExpenseRecord> {
        self.records.clone()
    }
}

/// Durable store over a SQLite pool. Returns records in primary-key order.
///
/// Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Open the pool and create the table if needed.
    pub async fn open(database_url: &str) -> Result<Self, AppError> {
        let pool = db::create_pool(database_url).await?;
        db::ensure_schema(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert one record in its own transaction.
    pub async fn append(&self, record: &ExpenseRecord) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO gastos (
                data,
                categoria,
                descricao,
                quantidade,
                unidade,
                valor_unitario,
                valor_total,
                forma_pagamento,
                observacoes
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.formatted_date())
        .bind(record.category.label())
        .bind(&record.description)
        .bind(record.quantity)
        .bind(record.unit.label())
        .bind(record.unit_value)
        .bind(record.total_value)
        .bind(record.payment_method.label())
        .bind(&record.notes)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Select every row, oldest first.
    pub async fn all(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, data, categoria, descricao, quantidade, unidade,
                   valor_unitario, valor_total, forma_pagamento, observacoes
            FROM gastos
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        rows.into_iter().map(ExpenseRecord::try_from).collect()
    }

    /// Connectivity probe used by the health endpoint.
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// The record store a session reads from and appends to.
#[derive(Debug, Clone)]
pub enum RecordStore {
    Ephemeral(MemoryStore),
    Durable(SqliteStore),
}

impl RecordStore {
    pub async fn append(&mut self, record: ExpenseRecord) -> Result<(), AppError> {
        match self {
            RecordStore::Ephemeral(store) => {
                store.append(record);
                Ok(())
            }
            RecordStore::Durable(store) => store.append(&record).await,
        }
    }

    pub async fn all(&self) -> Result<Vec<ExpenseRecord>, AppError> {
        match self {
            RecordStore::Ephemeral(store) => Ok(store.all()),
            RecordStore::Durable(store) => store.all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::{Category, PaymentMethod, Unit};
    use chrono::NaiveDate;

    fn record(day: u32, quantity: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            Category::Packaging,
            format!("caixas {day}"),
            quantity,
            Unit::Count,
            2.5,
            PaymentMethod::Boleto,
            String::new(),
        )
    }

    #[tokio::test]
    async fn memory_store_keeps_insertion_order() {
        let mut store = RecordStore::Ephemeral(MemoryStore::default());
        for day in [3, 1, 2] {
            store.append(record(day, 1.0)).await.unwrap();
        }

        let all = store.all().await.unwrap();
        let days: Vec<_> = all.iter().map(|r| r.formatted_date()).collect();
        assert_eq!(days, ["03/06/2024", "01/06/2024", "02/06/2024"]);
    }

    #[test]
    fn memory_store_accepts_duplicates() {
        let mut store = MemoryStore::default();
        store.append(record(1, 1.0));
        store.append(record(1, 1.0));
        assert_eq!(store.all().len(), 2);
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_in_id_order() {
        let store = SqliteStore::open("sqlite::memory:").await.unwrap();
        let mut handle = RecordStore::Durable(store.clone());

        let written: Vec<_> = (1..=4).map(|day| record(day, day as f64)).collect();
        for r in &written {
            handle.append(r.clone()).await.unwrap();
        }

        let read = handle.all().await.unwrap();
        assert_eq!(read, written);
        store.close().await;
    }

    #[tokio::test]
    async fn schema_creation_is_idempotent() {
        let store = SqliteStore::open("sqlite::memory:").await.unwrap();
        db::ensure_schema(store.pool()).await.unwrap();
        db::ensure_schema(store.pool()).await.unwrap();
        assert!(store.all().await.unwrap().is_empty());
    }
}
