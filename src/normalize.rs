//! Defensive field access over raw backend JSON.
//!
//! Backend records name the same concept in several ways (`id`/`ID`,
//! `created_at`/`createdAt`, flat vs nested `user.first_name`). [`Raw`] tries
//! a list of aliases in order and applies the same truthiness rules the
//! dashboard relied on: empty strings, zero and `null` fall through to the
//! next alias.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Borrowed view over one raw backend record.
#[derive(Clone, Copy, Debug)]
pub struct Raw<'a>(&'a Value);

impl<'a> Raw<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Underlying JSON value.
    pub fn value(&self) -> &'a Value {
        self.0
    }

    /// Resolves a dotted path such as `user.first_name`.
    fn lookup(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.0;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// First alias whose value is truthy.
    fn first_truthy(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.lookup(key))
            .find(|value| is_truthy(value))
    }

    /// Nested object at `path`, if present.
    pub fn nested(&self, path: &str) -> Option<Raw<'a>> {
        self.lookup(path)
            .filter(|value| value.is_object())
            .map(Raw::new)
    }

    /// Elements of the first array found among `keys`.
    pub fn array(&self, keys: &[&str]) -> Vec<Raw<'a>> {
        keys.iter()
            .filter_map(|key| self.lookup(key))
            .find_map(Value::as_array)
            .map(|items| items.iter().map(Raw::new).collect())
            .unwrap_or_default()
    }

    /// First truthy alias rendered as text. Numbers are stringified.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        self.first_truthy(keys).and_then(|value| match value {
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn text_or(&self, keys: &[&str], default: &str) -> String {
        self.text(keys).unwrap_or_else(|| default.to_string())
    }

    /// First truthy alias parsed as a number. Numeric strings are accepted.
    pub fn number(&self, keys: &[&str]) -> Option<f64> {
        keys.iter()
            .filter_map(|key| self.lookup(key))
            .filter(|value| is_truthy(value))
            .find_map(|value| match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
    }

    pub fn number_or(&self, keys: &[&str], default: f64) -> f64 {
        self.number(keys).unwrap_or(default)
    }

    pub fn integer_or(&self, keys: &[&str], default: i64) -> i64 {
        self.number(keys).map(|n| n as i64).unwrap_or(default)
    }

    /// Boolean at the first alias that is present, regardless of its value.
    ///
    /// Flags differ from text: an explicit `false` must win over a later alias.
    pub fn flag(&self, keys: &[&str]) -> Option<bool> {
        keys.iter()
            .filter_map(|key| self.lookup(key))
            .find_map(|value| match value {
                Value::Bool(b) => Some(*b),
                Value::Number(n) => n.as_i64().map(|n| n != 0),
                Value::String(s) => match s.trim() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    _ => None,
                },
                _ => None,
            })
    }

    pub fn flag_or(&self, keys: &[&str], default: bool) -> bool {
        self.flag(keys).unwrap_or(default)
    }

    /// String list from a JSON array or a comma separated string.
    pub fn strings(&self, keys: &[&str]) -> Vec<String> {
        match self.first_truthy(keys) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Record identifier (`id`, `ID` or `_id`), empty when missing.
    pub fn id(&self) -> String {
        self.text(&["id", "ID", "_id"]).unwrap_or_default()
    }

    /// Timestamp reduced to `YYYY-MM-DD HH:MM`, or the raw text when it is
    /// not a recognized format. Missing timestamps become an empty string.
    pub fn timestamp(&self, keys: &[&str]) -> String {
        match self.text(keys) {
            Some(raw) => format_timestamp(&raw),
            None => String::new(),
        }
    }

    /// Optional variant of [`Raw::timestamp`].
    pub fn timestamp_opt(&self, keys: &[&str]) -> Option<String> {
        self.text(keys).map(|raw| format_timestamp(&raw))
    }

    /// `first_name last_name` of the object at `prefix`, if any part is set.
    pub fn full_name(&self, prefix: &str) -> Option<String> {
        let join = |key: &str| {
            if prefix.is_empty() {
                key.to_string()
            } else {
                format!("{prefix}.{key}")
            }
        };
        let (first_key, last_key) = (join("first_name"), join("last_name"));
        let first = self.text(&[first_key.as_str()]).unwrap_or_default();
        let last = self.text(&[last_key.as_str()]).unwrap_or_default();
        let full = format!("{first} {last}").trim().to_string();
        Some(full).filter(|s| !s.is_empty())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.naive_utc().format("%Y-%m-%d %H:%M").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, pattern) {
            return parsed.format("%Y-%m-%d %H:%M").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
