//! Storage collaborator: CRUD by id, field-level uniqueness and atomic id allocation.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::migration::ensure_tables;
use crate::model::{Fields, ModelDef};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

/// Every write runs atomically: the uniqueness check and the mutation commit together or not at all.
/// Ids are assigned by the store and never taken from `fields`.
#[async_trait]
pub trait Store: Send + Sync {
    /// All records of `model`, ordered by id.
    async fn list(&self, model: &ModelDef) -> Result<Vec<Fields>, StoreError>;

    async fn get(&self, model: &ModelDef, id: i64) -> Result<Option<Fields>, StoreError>;

    /// Insert a record and return it with its new id. Fails with `StoreError::Conflict`
    /// naming every unique field whose value is already taken.
    async fn insert(&self, model: &ModelDef, fields: &Fields) -> Result<Fields, StoreError>;

    /// Overwrite the given fields of record `id`. `Ok(None)` when the record does not exist.
    /// Uniqueness is checked against other records only.
    async fn update(&self, model: &ModelDef, id: i64, fields: &Fields) -> Result<Option<Fields>, StoreError>;

    /// `Ok(false)` when the record does not exist.
    async fn delete(&self, model: &ModelDef, id: i64) -> Result<bool, StoreError>;
}

/// Open the configured store: PostgreSQL with tables for `models` when a URL is set,
/// otherwise the in-process store.
pub async fn open(config: &DatabaseConfig, models: &[&ModelDef]) -> Result<Arc<dyn Store>, StoreError> {
    let Some(url) = config.url.as_deref() else {
        tracing::warn!("DATABASE_URL not set; records live in memory and vanish on exit");
        return Ok(Arc::new(MemoryStore::new()));
    };
    ensure_database_exists(url).await?;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;
    ensure_tables(&pool, &config.schema, models).await?;
    tracing::info!(schema = %config.schema, "using postgres store");
    Ok(Arc::new(PgStore::new(pool, config.schema.clone())))
}
