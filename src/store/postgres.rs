//! PostgreSQL store over sqlx. Writes run in one transaction with a uniqueness probe;
//! the UNIQUE constraints created by `ensure_tables` settle races between concurrent writers.

use crate::error::StoreError;
use crate::model::{FieldKind, Fields, ModelDef, ID_FIELD};
use crate::sql::{self, bind_value, QueryBuf};
use crate::store::Store;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnection, PgPool, PgRow, Postgres};
use sqlx::query::Query;
use sqlx::{ConnectOptions, Row};
use std::str::FromStr;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    schema: String,
}

impl PgStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgStore {
            pool,
            schema: schema.into(),
        }
    }

    /// Unique fields of `fields` whose value already belongs to a row other than `exclude_id`.
    async fn find_conflicts(
        &self,
        conn: &mut PgConnection,
        model: &ModelDef,
        fields: &Fields,
        exclude_id: Option<i64>,
    ) -> Result<Vec<String>, StoreError> {
        let mut taken = Vec::new();
        for f in model.unique_fields() {
            let Some(v) = fields.get(f.name).filter(|v| !v.is_null()) else {
                continue;
            };
            let q = sql::select_taken(model, &self.schema, f.name, v, exclude_id)?;
            if prepare(&q).fetch_optional(&mut *conn).await?.is_some() {
                taken.push(f.name.to_string());
            }
        }
        Ok(taken)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list(&self, model: &ModelDef) -> Result<Vec<Fields>, StoreError> {
        let q = sql::select_list(model, &self.schema);
        let rows = prepare(&q).fetch_all(&self.pool).await?;
        rows.iter().map(|r| row_to_fields(model, r)).collect()
    }

    async fn get(&self, model: &ModelDef, id: i64) -> Result<Option<Fields>, StoreError> {
        let q = sql::select_by_id(model, &self.schema, id);
        let row = prepare(&q).fetch_optional(&self.pool).await?;
        row.map(|r| row_to_fields(model, &r)).transpose()
    }

    async fn insert(&self, model: &ModelDef, fields: &Fields) -> Result<Fields, StoreError> {
        let mut tx = self.pool.begin().await?;
        let conflicts = self.find_conflicts(&mut *tx, model, fields, None).await?;
        if !conflicts.is_empty() {
            tx.rollback().await?;
            return Err(StoreError::Conflict(conflicts));
        }
        let q = sql::insert(model, &self.schema, fields)?;
        let row = prepare(&q)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| unique_violation(model, e))?;
        let record = row_to_fields(model, &row)?;
        tx.commit().await.map_err(|e| unique_violation(model, e))?;
        Ok(record)
    }

    async fn update(&self, model: &ModelDef, id: i64, fields: &Fields) -> Result<Option<Fields>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let conflicts = self.find_conflicts(&mut *tx, model, fields, Some(id)).await?;
        if !conflicts.is_empty() {
            tx.rollback().await?;
            return Err(StoreError::Conflict(conflicts));
        }
        let q = sql::update(model, &self.schema, id, fields)?;
        let row = prepare(&q)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| unique_violation(model, e))?;
        let record = row.map(|r| row_to_fields(model, &r)).transpose()?;
        tx.commit().await.map_err(|e| unique_violation(model, e))?;
        Ok(record)
    }

    async fn delete(&self, model: &ModelDef, id: i64) -> Result<bool, StoreError> {
        let q = sql::delete(model, &self.schema, id);
        let row = prepare(&q).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }
}

fn prepare(q: &QueryBuf) -> Query<'_, Postgres, PgArguments> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    q.params.iter().fold(sqlx::query(&q.sql), bind_value)
}

/// Map a UNIQUE constraint violation on one of the model's fields to a conflict.
fn unique_violation(model: &ModelDef, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let fields: Vec<String> = model
                .unique_fields()
                .filter(|f| db.constraint() == Some(model.unique_constraint(f.name).as_str()))
                .map(|f| f.name.to_string())
                .collect();
            if !fields.is_empty() {
                return StoreError::Conflict(fields);
            }
        }
    }
    StoreError::Db(err)
}

fn row_to_fields(model: &ModelDef, row: &PgRow) -> Result<Fields, StoreError> {
    let mut map = Fields::new();
    let id: i64 = row.try_get(ID_FIELD)?;
    map.insert(ID_FIELD.to_string(), Value::from(id));
    for f in model.fields {
        let v = match f.kind {
            FieldKind::Text => row.try_get::<Option<String>, _>(f.name)?.map(Value::String),
            FieldKind::Integer => row.try_get::<Option<i64>, _>(f.name)?.map(Value::from),
            FieldKind::Number => row.try_get::<Option<f64>, _>(f.name)?.and_then(number_value),
            FieldKind::Boolean => row.try_get::<Option<bool>, _>(f.name)?.map(Value::Bool),
        };
        map.insert(f.name.to_string(), v.unwrap_or(Value::Null));
    }
    Ok(map)
}

/// Whole doubles come back as JSON integers, so `120` reads back as `120`, not `120.0`.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        return Some(Value::from(n as i64));
    }
    serde_json::Number::from_f64(n).map(Value::Number)
}

/// Create the database named in `database_url` if it does not exist yet.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StoreError::Db(sqlx::Error::Configuration("DATABASE_URL: no path".into())))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}
