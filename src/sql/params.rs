//! Convert serde_json::Value to typed values that sqlx can bind.

use crate::model::FieldKind;
use serde_json::Value;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

/// A value that can be bound to a PostgreSQL query. NULLs keep their column type.
#[derive(Clone, Debug, PartialEq)]
pub enum PgBindValue {
    Bool(Option<bool>),
    I64(Option<i64>),
    F64(Option<f64>),
    Text(Option<String>),
}

impl PgBindValue {
    /// Typed value for a column of `kind`. JSON null binds a typed NULL; any other value
    /// that does not fit the column is `None`, never a NULL.
    pub fn from_json(v: &Value, kind: FieldKind) -> Option<Self> {
        if v.is_null() {
            return Some(match kind {
                FieldKind::Text => PgBindValue::Text(None),
                FieldKind::Integer => PgBindValue::I64(None),
                FieldKind::Number => PgBindValue::F64(None),
                FieldKind::Boolean => PgBindValue::Bool(None),
            });
        }
        Some(match kind {
            FieldKind::Text => PgBindValue::Text(Some(v.as_str()?.to_string())),
            FieldKind::Integer => PgBindValue::I64(Some(v.as_i64()?)),
            FieldKind::Number => PgBindValue::F64(Some(v.as_f64()?)),
            FieldKind::Boolean => PgBindValue::Bool(Some(v.as_bool()?)),
        })
    }

    pub fn id(id: i64) -> Self {
        PgBindValue::I64(Some(id))
    }
}

/// Bind one value onto a query.
pub fn bind_value<'q>(
    query: Query<'q, Postgres, PgArguments>,
    v: &PgBindValue,
) -> Query<'q, Postgres, PgArguments> {
    match v {
        PgBindValue::Bool(b) => query.bind(*b),
        PgBindValue::I64(n) => query.bind(*n),
        PgBindValue::F64(n) => query.bind(*n),
        PgBindValue::Text(s) => query.bind(s.clone()),
    }
}
