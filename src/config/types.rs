//! Typed application configuration and its override layers.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    /// When unset the service runs on the in-process store.
    pub url: Option<String>,
    pub schema: String,
    pub max_connections: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DocsConfig {
    /// Host shown in example requests.
    pub host: String,
    /// File the rendered API documentation is written to at startup.
    pub output: Option<PathBuf>,
}

/// Built once at startup and carried in `AppState`.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// First URL segment of every API route: `/<app_name>/api/...`.
    pub app_name: String,
    pub listen_addr: String,
    pub body_limit: usize,
    pub background_workers: usize,
    pub database: DatabaseConfig,
    pub docs: DocsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            app_name: "stocktake".into(),
            listen_addr: "0.0.0.0:8000".into(),
            body_limit: 1024 * 1024,
            background_workers: 2,
            database: DatabaseConfig {
                url: None,
                schema: "public".into(),
                max_connections: 5,
            },
            docs: DocsConfig {
                host: "localhost:8000".into(),
                output: None,
            },
        }
    }
}

impl AppConfig {
    /// Prefix of every API route, e.g. `/stocktake/api`.
    pub fn api_prefix(&self) -> String {
        format!("/{}/api", self.app_name)
    }

    /// Deep merge: every field set in `overrides` replaces ours, nested sections field by field.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        let ConfigOverrides {
            app_name,
            listen_addr,
            body_limit,
            background_workers,
            database,
            docs,
        } = overrides;
        replace(&mut self.app_name, app_name);
        replace(&mut self.listen_addr, listen_addr);
        replace(&mut self.body_limit, body_limit);
        replace(&mut self.background_workers, background_workers);
        if let Some(db) = database {
            if db.url.is_some() {
                self.database.url = db.url;
            }
            replace(&mut self.database.schema, db.schema);
            replace(&mut self.database.max_connections, db.max_connections);
        }
        if let Some(d) = docs {
            replace(&mut self.docs.host, d.host);
            if d.output.is_some() {
                self.docs.output = d.output;
            }
        }
    }
}

fn replace<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// One override layer (file or environment). Absent fields leave the lower layer alone.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub app_name: Option<String>,
    pub listen_addr: Option<String>,
    pub body_limit: Option<usize>,
    pub background_workers: Option<usize>,
    pub database: Option<DatabaseOverrides>,
    pub docs: Option<DocsOverrides>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseOverrides {
    pub url: Option<String>,
    pub schema: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DocsOverrides {
    pub host: Option<String>,
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_overrides_merge_field_by_field() {
        let mut config = AppConfig::default();
        let layer: ConfigOverrides = serde_json::from_str(
            r#"{"app_name": "shop", "database": {"url": "postgres://db/shop"}, "docs": {"output": "api.rst"}}"#,
        )
        .unwrap();
        config.apply(layer);
        assert_eq!(config.app_name, "shop");
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/shop"));
        assert_eq!(config.database.schema, "public");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.docs.host, "localhost:8000");
        assert_eq!(config.docs.output, Some(PathBuf::from("api.rst")));
        assert_eq!(config.api_prefix(), "/shop/api");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_str::<ConfigOverrides>(r#"{"database": {"host": "x"}}"#);
        assert!(err.is_err());
    }
}
