//! Persistence traits and the Diesel-backed repository.

use crate::db::{DbConnection, DbPool};
use crate::domain::store::{NewStoreEntry, StoreEntry};
use crate::repository::errors::RepositoryResult;

pub mod errors;
#[cfg(feature = "test-mocks")]
pub mod mock;
pub mod store;

/// Read access to the key/value store. Expired entries are never returned.
pub trait StoreReader {
    fn get_entry(&self, key: &str) -> RepositoryResult<Option<StoreEntry>>;
    fn list_entries(&self, prefix: &str) -> RepositoryResult<Vec<StoreEntry>>;
}

pub trait StoreWriter {
    /// Inserts or replaces the entry with the same key.
    fn put_entry(&self, entry: &NewStoreEntry) -> RepositoryResult<StoreEntry>;
    /// Returns whether an entry was removed.
    fn remove_entry(&self, key: &str) -> RepositoryResult<bool>;
    /// Removes every entry whose key starts with `prefix`.
    fn invalidate_prefix(&self, prefix: &str) -> RepositoryResult<usize>;
    fn purge_expired(&self) -> RepositoryResult<usize>;
}

/// Repository over the SQLite connection pool.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}
