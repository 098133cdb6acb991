//! Load configuration: defaults, then an optional JSON override file, then the environment.

use crate::config::types::{AppConfig, ConfigOverrides, DatabaseOverrides, DocsOverrides};
use crate::config::validate;
use crate::error::ConfigError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the JSON override file.
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Read `.env` if present, then build the configuration from `CONFIG_PATH` and the process environment.
pub fn load() -> Result<AppConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let file = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
    load_with(file.as_deref(), std::env::vars())
}

/// Layer `file` (if any) and then `vars` over the defaults, and validate the result.
pub fn load_with<I>(file: Option<&Path>, vars: I) -> Result<AppConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut config = AppConfig::default();
    if let Some(path) = file {
        config.apply(overrides_from_file(path)?);
    }
    config.apply(overrides_from_env(vars)?);
    validate(&config)?;
    Ok(config)
}

pub fn overrides_from_file(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| ConfigError::Load(format!("{}: {}", path.display(), e)))
}

/// Recognized variables: APP_NAME, LISTEN_ADDR, BODY_LIMIT, BACKGROUND_WORKERS, DATABASE_URL,
/// DATABASE_SCHEMA, DATABASE_MAX_CONNECTIONS, DOCS_HOST, DOCS_OUTPUT. Others are ignored.
pub fn overrides_from_env<I>(vars: I) -> Result<ConfigOverrides, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut o = ConfigOverrides::default();
    let mut db = DatabaseOverrides::default();
    let mut docs = DocsOverrides::default();
    for (key, value) in vars {
        match key.as_str() {
            "APP_NAME" => o.app_name = Some(value),
            "LISTEN_ADDR" => o.listen_addr = Some(value),
            "BODY_LIMIT" => o.body_limit = Some(parse("BODY_LIMIT", &value)?),
            "BACKGROUND_WORKERS" => o.background_workers = Some(parse("BACKGROUND_WORKERS", &value)?),
            "DATABASE_URL" => db.url = Some(value).filter(|s| !s.is_empty()),
            "DATABASE_SCHEMA" => db.schema = Some(value),
            "DATABASE_MAX_CONNECTIONS" => {
                db.max_connections = Some(parse("DATABASE_MAX_CONNECTIONS", &value)?)
            }
            "DOCS_HOST" => docs.host = Some(value),
            "DOCS_OUTPUT" => docs.output = Some(PathBuf::from(value)).filter(|p| !p.as_os_str().is_empty()),
            _ => {}
        }
    }
    if db != DatabaseOverrides::default() {
        o.database = Some(db);
    }
    if docs != DocsOverrides::default() {
        o.docs = Some(docs);
    }
    Ok(o)
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
