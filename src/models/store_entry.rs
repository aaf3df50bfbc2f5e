//! Diesel models for the key/value store.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::store::{NewStoreEntry as DomainNewStoreEntry, StoreEntry as DomainStoreEntry};
use crate::domain::types::TypeConstraintError;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::store_entries)]
#[diesel(primary_key(key))]
/// Diesel model for [`crate::domain::store::StoreEntry`].
pub struct StoreEntry {
    pub key: String,
    pub value: String,
    pub updated_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::store_entries)]
#[diesel(treat_none_as_null = true)]
/// Insertable and upsert form of [`StoreEntry`].
pub struct NewStoreEntry<'a> {
    pub key: &'a str,
    pub value: String,
    pub updated_at: NaiveDateTime,
    pub expires_at: Option<NaiveDateTime>,
}

impl<'a> From<&'a DomainNewStoreEntry> for NewStoreEntry<'a> {
    fn from(entry: &'a DomainNewStoreEntry) -> Self {
        Self {
            key: entry.key.as_str(),
            value: entry.value.to_string(),
            updated_at: entry.updated_at,
            expires_at: entry.expires_at,
        }
    }
}

impl TryFrom<StoreEntry> for DomainStoreEntry {
    type Error = TypeConstraintError;

    fn try_from(entry: StoreEntry) -> Result<Self, Self::Error> {
        let value = serde_json::from_str(&entry.value)
            .map_err(|err| TypeConstraintError::InvalidValue(format!("{}: {err}", entry.key)))?;
        Ok(Self {
            key: entry.key,
            value,
            updated_at: entry.updated_at,
            expires_at: entry.expires_at,
        })
    }
}
