//! Key/value entries persisted by the panel itself.

use chrono::{Duration, NaiveDateTime};
use serde_json::Value;

/// Stored JSON document with an optional expiry.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreEntry {
    pub key: String,
    pub value: Value,
    pub updated_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

impl StoreEntry {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Entry about to be written. Existing entries with the same key are replaced.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStoreEntry {
    pub key: String,
    pub value: Value,
    pub updated_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

impl NewStoreEntry {
    /// Entry that never expires.
    #[must_use]
    pub fn new(key: impl Into<String>, value: Value, now: NaiveDateTime) -> Self {
        Self {
            key: key.into(),
            value,
            updated_at: now,
            expires_at: None,
        }
    }

    /// Sets the expiry relative to `updated_at`. A zero TTL keeps the entry forever.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = if ttl > Duration::zero() {
            Some(self.updated_at + ttl)
        } else {
            None
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn ttl_sets_expiry() {
        let entry = NewStoreEntry::new("asll-users", Value::Null, at(10)).with_ttl(Duration::hours(2));
        assert_eq!(entry.expires_at, Some(at(12)));
        let forever = NewStoreEntry::new("asll-theme", Value::Null, at(10)).with_ttl(Duration::zero());
        assert_eq!(forever.expires_at, None);
    }

    #[test]
    fn expiry_is_inclusive() {
        let entry = StoreEntry {
            key: "k".to_string(),
            value: Value::Null,
            updated_at: at(10),
            expires_at: Some(at(12)),
        };
        assert!(!entry.is_expired(at(11)));
        assert!(entry.is_expired(at(12)));
    }
}
