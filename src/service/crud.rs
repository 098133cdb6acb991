//! Generic CRUD over any model: contract in, store, contract out.

use crate::error::AppError;
use crate::service::Schema;
use crate::store::Store;
use serde_json::Value;

pub struct CrudService;

impl CrudService {
    /// Every record, dumped. An empty resource is `[]`.
    pub async fn list(store: &dyn Store, schema: Schema) -> Result<Value, AppError> {
        let rows = store.list(schema.model()).await?;
        Ok(schema.dump_many(&rows))
    }

    /// Validate and insert. Missing or malformed fields and uniqueness conflicts are all 422.
    pub async fn create(store: &dyn Store, schema: Schema, payload: &Value) -> Result<Value, AppError> {
        let fields = schema.load(payload).map_err(AppError::Validation)?;
        let row = store.insert(schema.model(), &fields).await?;
        tracing::debug!(model = schema.model().name, id = ?row.get("id"), "created");
        Ok(schema.dump(&row))
    }

    pub async fn retrieve(store: &dyn Store, schema: Schema, id: i64) -> Result<Value, AppError> {
        let row = store
            .get(schema.model(), id)
            .await?
            .ok_or_else(|| not_found(schema, id))?;
        Ok(schema.dump(&row))
    }

    /// Existence is checked before the body, so an unknown id is 404 whatever the payload.
    /// The record's own current values never count as conflicts.
    pub async fn update(store: &dyn Store, schema: Schema, id: i64, payload: &Value) -> Result<Value, AppError> {
        if store.get(schema.model(), id).await?.is_none() {
            return Err(not_found(schema, id));
        }
        let fields = schema.load(payload).map_err(AppError::Validation)?;
        let row = store
            .update(schema.model(), id, &fields)
            .await?
            .ok_or_else(|| not_found(schema, id))?;
        tracing::debug!(model = schema.model().name, id, "updated");
        Ok(schema.dump(&row))
    }

    pub async fn delete(store: &dyn Store, schema: Schema, id: i64) -> Result<(), AppError> {
        if !store.delete(schema.model(), id).await? {
            return Err(not_found(schema, id));
        }
        tracing::debug!(model = schema.model().name, id, "deleted");
        Ok(())
    }
}

fn not_found(schema: Schema, id: i64) -> AppError {
    AppError::NotFound(format!("{} {} not found", schema.model().name, id))
}
