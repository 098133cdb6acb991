//! Config validation: values the router and the pool cannot work with.

use crate::config::AppConfig;
use crate::error::ConfigError;

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.app_name.is_empty() {
        return Err(ConfigError::Validation("app_name must not be empty".into()));
    }
    if !config
        .app_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "app_name '{}' may only contain ASCII letters, digits, '-' and '_'",
            config.app_name
        )));
    }
    if config.database.schema.is_empty() {
        return Err(ConfigError::Validation("database.schema must not be empty".into()));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation("database.max_connections must be at least 1".into()));
    }
    if config.background_workers == 0 {
        return Err(ConfigError::Validation("background_workers must be at least 1".into()));
    }
    if config.body_limit == 0 {
        return Err(ConfigError::Validation("body_limit must be at least 1".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn app_name_must_be_url_safe() {
        let mut config = AppConfig::default();
        config.app_name = "my app".into();
        assert!(validate(&config).is_err());
        config.app_name = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let mut config = AppConfig::default();
        config.background_workers = 0;
        assert!(validate(&config).is_err());
    }
}
