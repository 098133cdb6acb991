//! Serialization contract: wire JSON <-> model fields, with presence and shape checks.

use crate::error::{FieldErrors, INVALID_INPUT, MISSING_FIELD};
use crate::model::{FieldDef, FieldKind, Fields, ModelDef, ID_FIELD};
use regex::Regex;
use serde_json::Value;

/// Contract for one model. Uniqueness is enforced by the store inside the write transaction.
#[derive(Clone, Copy, Debug)]
pub struct Schema {
    model: &'static ModelDef,
}

impl Schema {
    pub fn new(model: &'static ModelDef) -> Self {
        Schema { model }
    }

    pub fn model(&self) -> &'static ModelDef {
        self.model
    }

    /// Validate a request payload. Unknown keys (`id` included) are dropped; the result holds
    /// every declared field, with `null` for absent optional ones.
    pub fn load(&self, payload: &Value) -> Result<Fields, FieldErrors> {
        let Value::Object(body) = payload else {
            return Err(FieldErrors::single("_schema", INVALID_INPUT));
        };
        let mut errors = FieldErrors::new();
        let mut fields = Fields::new();
        for def in self.model.fields {
            let value = body.get(def.name).unwrap_or(&Value::Null);
            if is_missing(value) {
                if def.required {
                    errors.add(def.name, MISSING_FIELD);
                    continue;
                }
                fields.insert(def.name.to_string(), Value::Null);
                continue;
            }
            match check_field(def, value) {
                Ok(()) => {
                    fields.insert(def.name.to_string(), value.clone());
                }
                Err(message) => errors.add(def.name, message),
            }
        }
        errors.into_result().map(|()| fields)
    }

    /// Public representation of a stored record: `id` plus every declared field.
    pub fn dump(&self, record: &Fields) -> Value {
        let mut out = Fields::new();
        out.insert(
            ID_FIELD.to_string(),
            record.get(ID_FIELD).cloned().unwrap_or(Value::Null),
        );
        for def in self.model.fields {
            out.insert(
                def.name.to_string(),
                record.get(def.name).cloned().unwrap_or(Value::Null),
            );
        }
        Value::Object(out)
    }

    pub fn dump_many(&self, records: &[Fields]) -> Value {
        Value::Array(records.iter().map(|r| self.dump(r)).collect())
    }
}

fn is_missing(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn check_field(def: &FieldDef, v: &Value) -> Result<(), String> {
    match def.kind {
        FieldKind::Text => {
            let s = v.as_str().ok_or_else(|| "Not a valid string.".to_string())?;
            if let Some(max) = def.max_length {
                if s.chars().count() > max {
                    return Err(format!("Longer than maximum length {}.", max));
                }
            }
            if let Some(pattern) = def.pattern {
                let re = Regex::new(pattern).map_err(|_| format!("invalid pattern for {}", def.name))?;
                if !re.is_match(s) {
                    return Err("String does not match expected pattern.".into());
                }
            }
            Ok(())
        }
        FieldKind::Integer => {
            if v.is_i64() {
                Ok(())
            } else {
                Err("Not a valid integer.".into())
            }
        }
        FieldKind::Number => {
            if v.is_number() {
                Ok(())
            } else {
                Err("Not a valid number.".into())
            }
        }
        FieldKind::Boolean => {
            if v.is_boolean() {
                Ok(())
            } else {
                Err("Not a valid boolean.".into())
            }
        }
    }
}
