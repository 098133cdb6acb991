//! Model definitions: a storage entity with an integer id, named fields and per-field uniqueness.

use serde_json::{Map, Value};

/// Name of the storage-assigned primary key carried by every record.
pub const ID_FIELD: &str = "id";

/// A record or a set of field values, keyed by field name.
pub type Fields = Map<String, Value>;

/// Wire and column type of a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Number,
    Boolean,
}

impl FieldKind {
    /// PostgreSQL column type.
    pub fn pg_type(&self) -> &'static str {
        match self {
            FieldKind::Text => "TEXT",
            FieldKind::Integer => "BIGINT",
            FieldKind::Number => "DOUBLE PRECISION",
            FieldKind::Boolean => "BOOLEAN",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldDef {
            name,
            kind,
            required: false,
            unique: false,
            max_length: None,
            pattern: None,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        FieldDef::new(name, FieldKind::Text)
    }

    pub const fn integer(name: &'static str) -> Self {
        FieldDef::new(name, FieldKind::Integer)
    }

    pub const fn number(name: &'static str) -> Self {
        FieldDef::new(name, FieldKind::Number)
    }

    pub const fn boolean(name: &'static str) -> Self {
        FieldDef::new(name, FieldKind::Boolean)
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn pattern(mut self, re: &'static str) -> Self {
        self.pattern = Some(re);
        self
    }
}

#[derive(Debug)]
pub struct ModelDef {
    /// Singular name used in messages and docs, e.g. `unit`.
    pub name: &'static str,
    pub table: &'static str,
    /// URL segment below `/<app>/api`, e.g. `stocktaking-items`.
    pub path_segment: &'static str,
    pub fields: &'static [FieldDef],
}

impl ModelDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.unique)
    }

    /// Default PostgreSQL name of the single-column UNIQUE constraint on `field`.
    pub fn unique_constraint(&self, field: &str) -> String {
        format!("{}_{}_key", self.table, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FRUIT: ModelDef = ModelDef {
        name: "fruit",
        table: "fruits",
        path_segment: "fruits",
        fields: &[
            FieldDef::text("name").required().unique(),
            FieldDef::integer("weight"),
        ],
    };

    #[test]
    fn unique_fields_and_constraint_names() {
        let unique: Vec<_> = FRUIT.unique_fields().map(|f| f.name).collect();
        assert_eq!(unique, vec!["name"]);
        assert_eq!(FRUIT.unique_constraint("name"), "fruits_name_key");
        assert!(FRUIT.field("weight").is_some());
        assert!(FRUIT.field("id").is_none());
    }
}
