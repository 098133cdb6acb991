//! In-process store. One lock guards all tables, so check-then-write is atomic.

use crate::error::StoreError;
use crate::model::{Fields, ModelDef, ID_FIELD};
use crate::store::Store;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Fields>,
}

impl Table {
    fn conflicts(&self, model: &ModelDef, fields: &Fields, exclude_id: Option<i64>) -> Vec<String> {
        model
            .unique_fields()
            .filter(|f| {
                let Some(v) = fields.get(f.name).filter(|v| !v.is_null()) else {
                    return false;
                };
                self.rows
                    .iter()
                    .any(|(id, row)| Some(*id) != exclude_id && row.get(f.name) == Some(v))
            })
            .map(|f| f.name.to_string())
            .collect()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<&'static str, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<&'static str, Table>> {
        // Poisoning is not fatal here.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Copy only declared fields; ids never come from the caller.
fn declared(model: &ModelDef, fields: &Fields) -> Fields {
    model
        .fields
        .iter()
        .map(|f| (f.name.to_string(), fields.get(f.name).cloned().unwrap_or(Value::Null)))
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn list(&self, model: &ModelDef) -> Result<Vec<Fields>, StoreError> {
        let tables = self.lock();
        Ok(tables
            .get(model.table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, model: &ModelDef, id: i64) -> Result<Option<Fields>, StoreError> {
        let tables = self.lock();
        Ok(tables.get(model.table).and_then(|t| t.rows.get(&id).cloned()))
    }

    async fn insert(&self, model: &ModelDef, fields: &Fields) -> Result<Fields, StoreError> {
        let mut tables = self.lock();
        let table = tables.entry(model.table).or_default();
        let conflicts = table.conflicts(model, fields, None);
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict(conflicts));
        }
        table.last_id += 1;
        let id = table.last_id;
        let mut row = declared(model, fields);
        row.insert(ID_FIELD.to_string(), Value::from(id));
        table.rows.insert(id, row.clone());
        tracing::debug!(table = model.table, id, "inserted");
        Ok(row)
    }

    async fn update(&self, model: &ModelDef, id: i64, fields: &Fields) -> Result<Option<Fields>, StoreError> {
        let mut tables = self.lock();
        let Some(table) = tables.get_mut(model.table) else {
            return Ok(None);
        };
        if !table.rows.contains_key(&id) {
            return Ok(None);
        }
        let conflicts = table.conflicts(model, fields, Some(id));
        if !conflicts.is_empty() {
            return Err(StoreError::Conflict(conflicts));
        }
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        for f in model.fields {
            if let Some(v) = fields.get(f.name) {
                row.insert(f.name.to_string(), v.clone());
            }
        }
        tracing::debug!(table = model.table, id, "updated");
        Ok(Some(row.clone()))
    }

    async fn delete(&self, model: &ModelDef, id: i64) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let removed = tables
            .get_mut(model.table)
            .and_then(|t| t.rows.remove(&id))
            .is_some();
        tracing::debug!(table = model.table, id, removed, "deleted");
        Ok(removed)
    }
}
