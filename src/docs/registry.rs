//! Registration table: (verb, path template) -> descriptor, filled once while routes are built.

use crate::docs::ResourceDoc;
use crate::error::DocError;
use axum::http::Method;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DocEntry {
    pub method: Method,
    /// Route template as registered, e.g. `/stocktake/api/units/:id`.
    pub path: String,
    pub doc: Arc<ResourceDoc>,
}

/// Descriptors in registration order with lookup by route.
#[derive(Clone, Debug, Default)]
pub struct DocTable {
    entries: Vec<DocEntry>,
    index: HashMap<(Method, String), usize>,
}

impl DocTable {
    pub fn new() -> Self {
        DocTable::default()
    }

    /// Record `doc` for `method path`. The same path may be registered under several verbs.
    pub fn insert(&mut self, method: Method, path: impl Into<String>, doc: ResourceDoc) -> Result<(), DocError> {
        let path = path.into();
        let key = (method.clone(), path.clone());
        if self.index.contains_key(&key) {
            return Err(DocError::DuplicateRoute {
                method: method.to_string(),
                path,
            });
        }
        self.index.insert(key, self.entries.len());
        self.entries.push(DocEntry {
            method,
            path,
            doc: Arc::new(doc),
        });
        Ok(())
    }

    pub fn get(&self, method: &Method, path: &str) -> Option<&ResourceDoc> {
        self.index
            .get(&(method.clone(), path.to_string()))
            .map(|&i| self.entries[i].doc.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, method: &str) -> ResourceDoc {
        ResourceDoc::builder(title, method, "/units").build().unwrap()
    }

    #[test]
    fn one_path_many_verbs() {
        let mut table = DocTable::new();
        table.insert(Method::GET, "/a/api/units", doc("List units", "GET")).unwrap();
        table.insert(Method::POST, "/a/api/units", doc("Create unit", "POST")).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Method::GET, "/a/api/units").unwrap().title(), "List units");
        assert_eq!(table.get(&Method::POST, "/a/api/units").unwrap().title(), "Create unit");
        assert!(table.get(&Method::DELETE, "/a/api/units").is_none());
    }

    #[test]
    fn same_verb_and_path_twice_is_rejected() {
        let mut table = DocTable::new();
        table.insert(Method::GET, "/a/api/units", doc("List units", "GET")).unwrap();
        let err = table.insert(Method::GET, "/a/api/units", doc("Again", "GET")).unwrap_err();
        assert!(matches!(err, DocError::DuplicateRoute { .. }));
        assert_eq!(table.len(), 1);
    }
}
