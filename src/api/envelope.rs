//! Response unwrapping for the backend's inconsistent envelopes.
//!
//! The same list can arrive as `{users: [...]}`, `{data: {users: [...]}}`,
//! `{data: {data: {users: [...]}}}` or a bare array, with paging metadata at
//! any of those levels or under `pagination`/`meta`. Everything above this
//! module sees a [`RawPage`] or a single record value.

use serde_json::Value;

use crate::api::errors::{ApiError, ApiResult, GENERIC_SERVER_MESSAGE};

/// One page of raw records plus whatever paging metadata the backend sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawPage {
    pub records: Vec<Value>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
    pub per_page: Option<u64>,
}

/// Interprets a backend response.
///
/// Success bodies are parsed as JSON (an empty body is `null`). Error bodies
/// contribute their `error` or `message` field to the [`ApiError`].
pub fn read_response(status: u16, body: &[u8]) -> ApiResult<Value> {
    if (200..300).contains(&status) {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        return serde_json::from_slice(body).map_err(|err| ApiError::Decode(err.to_string()));
    }

    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| error_message(&value))
        .unwrap_or_else(|| GENERIC_SERVER_MESSAGE.to_string());
    Err(ApiError::from_status(status, message))
}

fn error_message(value: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| match value.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Object(inner)) => inner
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Candidate containers, outermost first.
fn containers(body: &Value) -> Vec<&Value> {
    let mut found = vec![body];
    if let Some(data) = body.get("data") {
        found.push(data);
        if let Some(inner) = data.get("data") {
            found.push(inner);
        }
    }
    found
}

fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn metadata(containers: &[&Value], keys: &[&str]) -> Option<u64> {
    containers.iter().find_map(|container| {
        let scopes = [
            Some(*container),
            container.get("pagination"),
            container.get("meta"),
        ];
        scopes
            .into_iter()
            .flatten()
            .find_map(|scope| keys.iter().find_map(|key| scope.get(key).and_then(as_count)))
    })
}

/// Extracts the record array stored under one of `list_keys`.
pub fn extract_page(body: &Value, list_keys: &[&str]) -> RawPage {
    let containers = containers(body);

    let records = containers
        .iter()
        .rev()
        .find_map(|container| {
            if let Some(items) = container.as_array() {
                return Some(items.clone());
            }
            list_keys
                .iter()
                .chain(["items"].iter())
                .find_map(|key| container.get(key).and_then(Value::as_array))
                .cloned()
        })
        .unwrap_or_default();

    RawPage {
        records,
        total: metadata(&containers, &["total", "total_count", "count"]),
        total_pages: metadata(&containers, &["total_pages", "totalPages", "last_page", "pages"]),
        per_page: metadata(&containers, &["per_page", "perPage", "limit"]),
    }
}

/// Extracts a single record, preferring one wrapped under `record_keys`.
pub fn extract_record(body: &Value, record_keys: &[&str]) -> Value {
    let containers = containers(body);
    containers
        .iter()
        .rev()
        .find_map(|container| {
            record_keys
                .iter()
                .find_map(|key| container.get(key).filter(|value| value.is_object()))
        })
        .or_else(|| containers.iter().rev().copied().find(|value| value.is_object()))
        .cloned()
        .unwrap_or(Value::Null)
}
