//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

pub const MISSING_FIELD: &str = "Missing data for required field.";
pub const ALREADY_EXISTS: &str = "Already exists.";
pub const INVALID_INPUT: &str = "Invalid input type.";

/// Per-field validation messages, keyed by field name. Every entry holds at least one message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Descriptor construction and registration errors. Raised at startup, never per request.
#[derive(Error, Debug)]
pub enum DocError {
    #[error("example payload for '{title}' is not serializable: {source}")]
    Example {
        title: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),
    #[error("invalid status code {0}")]
    InvalidStatus(u16),
    #[error("'{title}' documents {method} but its handler answers {expected}")]
    MethodMismatch {
        title: String,
        method: String,
        expected: &'static str,
    },
    #[error("duplicate route: {method} {path}")]
    DuplicateRoute { method: String, path: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// Unique fields whose values already belong to another record.
    #[error("unique constraint violated on {0:?}")]
    Conflict(Vec<String>),
    #[error("value {value} of {field} does not fit a {pg_type} column")]
    Unbindable {
        field: String,
        pg_type: &'static str,
        value: String,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Docs(#[from] DocError),
    #[error("{0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Store(StoreError),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(fields) => {
                let mut errors = FieldErrors::new();
                for field in fields {
                    errors.add(field, ALREADY_EXISTS);
                }
                AppError::Validation(errors)
            }
            other => AppError::Store(other),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Store(StoreError::Db(e))
    }
}

#[derive(Serialize)]
pub struct ErrorBody<T: Serialize> {
    pub message: T,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorBody { message: errors })).into_response()
            }
            AppError::NotFound(what) => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { message: what })).into_response()
            }
            AppError::BadRequest(why) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { message: why })).into_response()
            }
            other => {
                tracing::error!(error = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        message: "internal server error",
                    }),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_becomes_already_exists_per_field() {
        let err = AppError::from(StoreError::Conflict(vec!["name".into(), "unit".into()]));
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.get("name"), Some(&[ALREADY_EXISTS.to_string()][..]));
        assert_eq!(errors.get("unit"), Some(&[ALREADY_EXISTS.to_string()][..]));
    }

    #[test]
    fn field_errors_serialize_as_plain_mapping() {
        let mut errors = FieldErrors::single("unit", MISSING_FIELD);
        errors.add("unit", "Longer than maximum length 20.");
        let body = serde_json::to_value(ErrorBody { message: errors }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": {"unit": [MISSING_FIELD, "Longer than maximum length 20."]}})
        );
    }
}
