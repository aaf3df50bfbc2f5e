//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::store::{NewStoreEntry, StoreEntry};
use crate::repository::errors::RepositoryResult;
use crate::repository::{StoreReader, StoreWriter};

mock! {
    pub Repository {}

    impl StoreReader for Repository {
        fn get_entry(&self, key: &str) -> RepositoryResult<Option<StoreEntry>>;
        fn list_entries(&self, prefix: &str) -> RepositoryResult<Vec<StoreEntry>>;
    }

    impl StoreWriter for Repository {
        fn put_entry(&self, entry: &NewStoreEntry) -> RepositoryResult<StoreEntry>;
        fn remove_entry(&self, key: &str) -> RepositoryResult<bool>;
        fn invalidate_prefix(&self, prefix: &str) -> RepositoryResult<usize>;
        fn purge_expired(&self) -> RepositoryResult<usize>;
    }
}
