//! Documentation renderer: descriptor -> fixed-grammar reStructuredText block.
//!
//! Output depends only on the descriptor and the render context. Header names and JSON
//! object keys are always emitted in ascending order, so two renders are byte-identical.

use crate::config::AppConfig;
use crate::docs::registry::DocTable;
use crate::docs::status::reason_phrase;
use crate::docs::ResourceDoc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const INDENT: &str = "    ";

/// Values the rendered examples take from the deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderContext {
    pub app_name: String,
    pub host: String,
}

impl RenderContext {
    pub fn new(app_name: impl Into<String>, host: impl Into<String>) -> Self {
        RenderContext {
            app_name: app_name.into(),
            host: host.into(),
        }
    }
}

impl From<&AppConfig> for RenderContext {
    fn from(config: &AppConfig) -> Self {
        RenderContext::new(config.app_name.clone(), config.docs.host.clone())
    }
}

/// Render one descriptor.
pub fn render(doc: &ResourceDoc, ctx: &RenderContext) -> String {
    let mut lines: Vec<String> = vec![doc.title().to_string(), String::new()];

    if !doc.params().is_empty() {
        for (name, description) in doc.params() {
            lines.push(format!(":param {}: {}", name, description));
        }
        lines.push(String::new());
    }

    if !doc.status_codes().is_empty() {
        for (code, description) in doc.status_codes() {
            lines.push(format!(":statuscode {}: {}", code, description));
        }
        lines.push(String::new());
    }

    section(&mut lines, "**Example request**:");
    lines.push(format!(
        "{}{} /{}/api{} HTTP/1.1",
        INDENT,
        doc.method(),
        ctx.app_name,
        doc.url_tail()
    ));
    lines.push(format!("{}Host: {}", INDENT, ctx.host));
    headers(&mut lines, doc.request_content_type(), doc.request_headers());
    if let Some(body) = doc.request() {
        lines.push(String::new());
        json_block(&mut lines, body);
    }
    lines.push(String::new());

    section(&mut lines, "**Example response**:");
    lines.push(format!(
        "{}HTTP/1.0 {} {}",
        INDENT,
        doc.response_status(),
        reason_phrase(doc.response_status())
    ));
    headers(&mut lines, doc.response_content_type(), doc.response_headers());
    lines.push(String::new());
    json_block(&mut lines, doc.response());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render every registered descriptor in registration order, blocks separated by a blank line.
pub fn render_all(table: &DocTable, ctx: &RenderContext) -> String {
    table
        .iter()
        .map(|entry| render(&entry.doc, ctx))
        .collect::<Vec<_>>()
        .join("\n")
}

fn section(lines: &mut Vec<String>, heading: &str) {
    lines.push(heading.to_string());
    lines.push(String::new());
    lines.push(".. sourcecode:: http".to_string());
    lines.push(String::new());
}

fn headers(lines: &mut Vec<String>, content_type: &str, custom: &BTreeMap<String, String>) {
    lines.push(format!("{}Content-Type: {}", INDENT, content_type));
    for (name, value) in custom {
        lines.push(format!("{}{}: {}", INDENT, name, value));
    }
}

fn json_block(lines: &mut Vec<String>, body: &Value) {
    let text = serde_json::to_string_pretty(&sorted(body)).unwrap_or_else(|_| "null".to_string());
    lines.extend(text.lines().map(|l| format!("{}{}", INDENT, l)));
}

/// Deep copy with every object's keys in ascending order, whatever map ordering serde_json uses.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut out = Map::new();
            for k in keys {
                out.insert(k.clone(), sorted(&map[k]));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
