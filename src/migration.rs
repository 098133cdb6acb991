//! Schema bootstrap: CREATE SCHEMA and CREATE TABLE IF NOT EXISTS for every model.
//! Idempotent; existing tables are left untouched.

use crate::error::StoreError;
use crate::model::ModelDef;
use crate::sql;
use sqlx::PgPool;

pub async fn ensure_tables(pool: &PgPool, schema: &str, models: &[&ModelDef]) -> Result<(), StoreError> {
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", sql::quoted(schema)))
        .execute(pool)
        .await?;
    for model in models {
        let ddl = sql::create_table(model, schema);
        tracing::debug!(sql = %ddl, "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    tracing::info!(schema, tables = models.len(), "tables ready");
    Ok(())
}
