//! Resource descriptor: the immutable record of one endpoint's shape, examples and status codes.
//!
//! A descriptor is attached to a handler at registration and read only by the renderer.
//! It never sees live request or response values.

use crate::docs::status::describe;
use crate::error::DocError;
use axum::http::Method;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDoc {
    title: String,
    method: String,
    url_tail: String,
    request_headers: BTreeMap<String, String>,
    response_headers: BTreeMap<String, String>,
    request_content_type: String,
    response_content_type: String,
    request: Option<Value>,
    response: Value,
    response_status: u16,
    params: Vec<(String, String)>,
    status_codes: BTreeMap<u16, String>,
}

impl ResourceDoc {
    /// Start a descriptor. `url_tail` is the example path below `/<app>/api`, e.g. `/units/1`.
    pub fn builder(
        title: impl Into<String>,
        method: impl Into<String>,
        url_tail: impl Into<String>,
    ) -> ResourceDocBuilder {
        ResourceDocBuilder {
            title: title.into(),
            method: method.into(),
            url_tail: url_tail.into(),
            request_headers: BTreeMap::new(),
            response_headers: BTreeMap::new(),
            request_content_type: DEFAULT_CONTENT_TYPE.into(),
            response_content_type: DEFAULT_CONTENT_TYPE.into(),
            request: None,
            response: Value::Null,
            response_status: 200,
            params: Vec::new(),
            status_codes: BTreeMap::new(),
            item: None,
            error: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Upper-cased verb.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url_tail(&self) -> &str {
        &self.url_tail
    }

    /// Sorted by header name.
    pub fn request_headers(&self) -> &BTreeMap<String, String> {
        &self.request_headers
    }

    /// Sorted by header name.
    pub fn response_headers(&self) -> &BTreeMap<String, String> {
        &self.response_headers
    }

    pub fn request_content_type(&self) -> &str {
        &self.request_content_type
    }

    pub fn response_content_type(&self) -> &str {
        &self.response_content_type
    }

    pub fn request(&self) -> Option<&Value> {
        self.request.as_ref()
    }

    pub fn response(&self) -> &Value {
        &self.response
    }

    pub fn response_status(&self) -> u16 {
        self.response_status
    }

    /// Path parameters in declaration order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Ascending by code, descriptions already filled.
    pub fn status_codes(&self) -> &BTreeMap<u16, String> {
        &self.status_codes
    }

    /// The verb as an HTTP method, for routing.
    pub fn http_method(&self) -> Result<Method, DocError> {
        Method::from_bytes(self.method.as_bytes()).map_err(|_| DocError::InvalidMethod(self.method.clone()))
    }
}

/// Anything that carries a descriptor.
pub trait Documented {
    fn resource_doc(&self) -> &ResourceDoc;
}

impl Documented for ResourceDoc {
    fn resource_doc(&self) -> &ResourceDoc {
        self
    }
}

#[derive(Debug)]
pub struct ResourceDocBuilder {
    title: String,
    method: String,
    url_tail: String,
    request_headers: BTreeMap<String, String>,
    response_headers: BTreeMap<String, String>,
    request_content_type: String,
    response_content_type: String,
    request: Option<Value>,
    response: Value,
    response_status: u16,
    params: Vec<(String, String)>,
    status_codes: BTreeMap<u16, String>,
    item: Option<String>,
    error: Option<serde_json::Error>,
}

impl ResourceDocBuilder {
    pub fn request_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request_headers.insert(name.into(), value.into());
        self
    }

    pub fn response_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.response_headers.insert(name.into(), value.into());
        self
    }

    pub fn request_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.request_content_type = content_type.into();
        self
    }

    pub fn response_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.response_content_type = content_type.into();
        self
    }

    /// Example request body.
    pub fn request(mut self, example: impl Serialize) -> Self {
        match serde_json::to_value(example) {
            Ok(v) => self.request = Some(v),
            Err(e) => self.error = self.error.or(Some(e)),
        }
        self
    }

    /// Example response body. Left unset it renders as `null`.
    pub fn response(mut self, example: impl Serialize) -> Self {
        match serde_json::to_value(example) {
            Ok(v) => self.response = v,
            Err(e) => self.error = self.error.or(Some(e)),
        }
        self
    }

    pub fn response_status(mut self, status: u16) -> Self {
        self.response_status = status;
        self
    }

    pub fn param(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let description = description.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = description,
            None => self.params.push((name, description)),
        }
        self
    }

    /// Document a status code. An empty description is filled for well-known codes.
    pub fn status_code(mut self, code: u16, description: impl Into<String>) -> Self {
        self.status_codes.insert(code, description.into());
        self
    }

    /// Mark this as an item endpoint for `name`: adds the `id` parameter and, unless
    /// described explicitly, `404: there is no <name>`.
    pub fn item(mut self, name: impl Into<String>) -> Self {
        self.item = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ResourceDoc, DocError> {
        if let Some(source) = self.error {
            return Err(DocError::Example {
                title: self.title,
                source,
            });
        }
        let method = self.method.to_uppercase();
        if Method::from_bytes(method.as_bytes()).is_err() {
            return Err(DocError::InvalidMethod(self.method));
        }
        let url_tail = if self.url_tail.starts_with('/') {
            self.url_tail
        } else {
            format!("/{}", self.url_tail)
        };

        let mut params = self.params;
        let mut status_codes = self.status_codes;
        if let Some(item) = &self.item {
            if !params.iter().any(|(n, _)| n == "id") {
                params.insert(0, ("id".to_string(), format!("ID of the selected {}", item)));
            }
            let not_found = status_codes.entry(404).or_default();
            if not_found.is_empty() {
                *not_found = format!("there is no {}", item);
            }
        }

        for code in status_codes.keys().copied().chain(std::iter::once(self.response_status)) {
            if !(100..=599).contains(&code) {
                return Err(DocError::InvalidStatus(code));
            }
        }
        let status_codes = status_codes
            .into_iter()
            .map(|(code, description)| (code, describe(code, &description)))
            .collect();

        Ok(ResourceDoc {
            title: self.title,
            method,
            url_tail,
            request_headers: self.request_headers,
            response_headers: self.response_headers,
            request_content_type: self.request_content_type,
            response_content_type: self.response_content_type,
            request: self.request,
            response: self.response,
            response_status: self.response_status,
            params,
            status_codes,
        })
    }
}
