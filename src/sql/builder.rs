//! Builds parameterized INSERT, SELECT, UPDATE, DELETE from a model definition.

use crate::error::StoreError;
use crate::model::{FieldKind, Fields, ModelDef, ID_FIELD};
use crate::sql::PgBindValue;
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from model definitions).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: PgBindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }

    /// Push the typed value of `field`. Fails on a value the column cannot hold.
    fn push_field(&mut self, field: &str, v: &Value, kind: FieldKind) -> Result<u32, StoreError> {
        let bound = PgBindValue::from_json(v, kind).ok_or_else(|| StoreError::Unbindable {
            field: field.to_string(),
            pg_type: kind.pg_type(),
            value: v.to_string(),
        })?;
        Ok(self.push_param(bound))
    }
}

/// Column list for SELECT and RETURNING: id first, then declared fields in order.
fn select_column_list(model: &ModelDef) -> String {
    std::iter::once(ID_FIELD)
        .chain(model.fields.iter().map(|f| f.name))
        .map(quoted)
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT every row ORDER BY id.
pub fn select_list(model: &ModelDef, schema: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(model),
        qualified_table(schema, model.table),
        quoted(ID_FIELD)
    );
    q
}

/// SELECT by id.
pub fn select_by_id(model: &ModelDef, schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::id(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(model),
        qualified_table(schema, model.table),
        quoted(ID_FIELD),
        n
    );
    q
}

/// Probe whether `field = value` is already taken by a row other than `exclude_id`.
pub fn select_taken(
    model: &ModelDef,
    schema: &str,
    field: &str,
    value: &Value,
    exclude_id: Option<i64>,
) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let kind = model.field(field).map(|f| f.kind).unwrap_or(FieldKind::Text);
    let n = q.push_field(field, value, kind)?;
    let mut sql = format!(
        "SELECT 1 FROM {} WHERE {} = ${}",
        qualified_table(schema, model.table),
        quoted(field),
        n
    );
    if let Some(id) = exclude_id {
        let m = q.push_param(PgBindValue::id(id));
        sql.push_str(&format!(" AND {} <> ${}", quoted(ID_FIELD), m));
    }
    sql.push_str(" LIMIT 1");
    q.sql = sql;
    Ok(q)
}

/// INSERT every declared field; id comes from the BIGSERIAL default.
pub fn insert(model: &ModelDef, schema: &str, body: &Fields) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in model.fields {
        let v = body.get(f.name).unwrap_or(&Value::Null);
        let n = q.push_field(f.name, v, f.kind)?;
        cols.push(quoted(f.name));
        placeholders.push(format!("${}", n));
    }
    let table = qualified_table(schema, model.table);
    q.sql = if cols.is_empty() {
        format!("INSERT INTO {} DEFAULT VALUES RETURNING {}", table, select_column_list(model))
    } else {
        format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            table,
            cols.join(", "),
            placeholders.join(", "),
            select_column_list(model)
        )
    };
    Ok(q)
}

/// UPDATE by id: SET only declared fields present in body. Never touches id.
pub fn update(model: &ModelDef, schema: &str, id: i64, body: &Fields) -> Result<QueryBuf, StoreError> {
    let mut q = QueryBuf::new();
    let table = qualified_table(schema, model.table);
    let mut sets = Vec::new();
    for f in model.fields {
        let Some(v) = body.get(f.name) else { continue };
        let n = q.push_field(f.name, v, f.kind)?;
        sets.push(format!("{} = ${}", quoted(f.name), n));
    }
    let id_param = q.push_param(PgBindValue::id(id));
    q.sql = if sets.is_empty() {
        format!(
            "SELECT {} FROM {} WHERE {} = ${}",
            select_column_list(model),
            table,
            quoted(ID_FIELD),
            id_param
        )
    } else {
        format!(
            "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
            table,
            sets.join(", "),
            quoted(ID_FIELD),
            id_param,
            select_column_list(model)
        )
    };
    Ok(q)
}

/// DELETE by id.
pub fn delete(model: &ModelDef, schema: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(PgBindValue::id(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        qualified_table(schema, model.table),
        quoted(ID_FIELD),
        n,
        quoted(ID_FIELD)
    );
    q
}

/// CREATE TABLE IF NOT EXISTS with a BIGSERIAL id and a UNIQUE constraint per unique field.
pub fn create_table(model: &ModelDef, schema: &str) -> String {
    let mut defs = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted(ID_FIELD))];
    for f in model.fields {
        let mut def = format!("{} {}", quoted(f.name), f.kind.pg_type());
        if f.required {
            def.push_str(" NOT NULL");
        }
        if f.unique {
            def.push_str(&format!(" CONSTRAINT {} UNIQUE", quoted(&model.unique_constraint(f.name))));
        }
        defs.push(def);
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        qualified_table(schema, model.table),
        defs.join(", ")
    )
}
