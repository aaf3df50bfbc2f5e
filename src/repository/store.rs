use chrono::Utc;
use diesel::prelude::*;

use crate::domain::store::{NewStoreEntry, StoreEntry};
use crate::models::store_entry::{
    NewStoreEntry as DbNewStoreEntry, StoreEntry as DbStoreEntry,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, StoreReader, StoreWriter};
use crate::schema::store_entries;

/// Escapes `LIKE` wildcards so a prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn into_domain(entry: DbStoreEntry) -> RepositoryResult<StoreEntry> {
    Ok(StoreEntry::try_from(entry)?)
}

impl StoreReader for DieselRepository {
    fn get_entry(&self, key: &str) -> RepositoryResult<Option<StoreEntry>> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let entry = store_entries::table
            .find(key)
            .filter(
                store_entries::expires_at
                    .is_null()
                    .or(store_entries::expires_at.gt(now)),
            )
            .select(DbStoreEntry::as_select())
            .first(&mut conn)
            .optional()?;

        entry.map(into_domain).transpose()
    }

    fn list_entries(&self, prefix: &str) -> RepositoryResult<Vec<StoreEntry>> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        store_entries::table
            .filter(store_entries::key.like(like_prefix(prefix)).escape('\\'))
            .filter(
                store_entries::expires_at
                    .is_null()
                    .or(store_entries::expires_at.gt(now)),
            )
            .order(store_entries::key.asc())
            .select(DbStoreEntry::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(into_domain)
            .collect()
    }
}

impl StoreWriter for DieselRepository {
    fn put_entry(&self, entry: &NewStoreEntry) -> RepositoryResult<StoreEntry> {
        let mut conn = self.conn()?;
        let row = DbNewStoreEntry::from(entry);

        let stored = diesel::insert_into(store_entries::table)
            .values(&row)
            .on_conflict(store_entries::key)
            .do_update()
            .set(&row)
            .returning(DbStoreEntry::as_returning())
            .get_result(&mut conn)?;

        into_domain(stored)
    }

    fn remove_entry(&self, key: &str) -> RepositoryResult<bool> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(store_entries::table.find(key)).execute(&mut conn)?;
        Ok(removed > 0)
    }

    fn invalidate_prefix(&self, prefix: &str) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let removed = diesel::delete(
            store_entries::table.filter(store_entries::key.like(like_prefix(prefix)).escape('\\')),
        )
        .execute(&mut conn)?;
        Ok(removed)
    }

    fn purge_expired(&self) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let removed = diesel::delete(
            store_entries::table.filter(store_entries::expires_at.le(now)),
        )
        .execute(&mut conn)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::like_prefix;

    #[test]
    fn like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("asll-settings-"), "asll-settings-%");
        assert_eq!(like_prefix("a_b%"), "a\\_b\\%%");
    }
}
