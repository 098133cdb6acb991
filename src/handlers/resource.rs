//! Resource handlers: list, create, read, update, delete for any registered model.

use crate::error::AppError;
use crate::response::success;
use crate::service::{CrudService, Schema};
use crate::state::AppState;
use axum::{http::StatusCode, Json};
use serde_json::Value;

/// Ids are plain decimal integers; anything else (signs included) cannot name a record.
fn parse_id(schema: Schema, id_str: &str) -> Result<i64, AppError> {
    let canonical = !id_str.is_empty()
        && id_str.bytes().all(|b| b.is_ascii_digit())
        && (id_str == "0" || !id_str.starts_with('0'));
    canonical
        .then(|| id_str.parse().ok())
        .flatten()
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", schema.model().name, id_str)))
}

pub async fn list(state: AppState, schema: Schema) -> Result<(StatusCode, Json<Value>), AppError> {
    let rows = CrudService::list(state.store.as_ref(), schema).await?;
    Ok(success(rows))
}

pub async fn create(state: AppState, schema: Schema, body: Value) -> Result<(StatusCode, Json<Value>), AppError> {
    let row = CrudService::create(state.store.as_ref(), schema, &body).await?;
    Ok(success(row))
}

pub async fn read(state: AppState, schema: Schema, id_str: String) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = parse_id(schema, &id_str)?;
    let row = CrudService::retrieve(state.store.as_ref(), schema, id).await?;
    Ok(success(row))
}

pub async fn update(
    state: AppState,
    schema: Schema,
    id_str: String,
    body: Value,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = parse_id(schema, &id_str)?;
    let row = CrudService::update(state.store.as_ref(), schema, id, &body).await?;
    Ok(success(row))
}

/// Responds 200 with a `null` body.
pub async fn delete(state: AppState, schema: Schema, id_str: String) -> Result<(StatusCode, Json<Value>), AppError> {
    let id = parse_id(schema, &id_str)?;
    CrudService::delete(state.store.as_ref(), schema, id).await?;
    Ok(success(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::UNIT;

    #[test]
    fn only_canonical_decimal_ids_parse() {
        let schema = Schema::new(&UNIT);
        assert_eq!(parse_id(schema, "5").unwrap(), 5);
        assert_eq!(parse_id(schema, "0").unwrap(), 0);
        for bad in ["+5", "05", "-1", "", "abc", "99999999999999999999"] {
            assert!(matches!(parse_id(schema, bad), Err(AppError::NotFound(_))), "{bad}");
        }
    }
}
