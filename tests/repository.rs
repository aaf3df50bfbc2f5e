use asll_admin::domain::store::NewStoreEntry;
use asll_admin::repository::{DieselRepository, StoreReader, StoreWriter};
use chrono::{Duration, Utc};
use serde_json::json;

mod common;

#[test]
fn test_store_put_get_and_replace() {
    let test_db = common::TestDb::new("test_store_put_get_and_replace.db");
    let repo = DieselRepository::new(test_db.pool());
    let now = Utc::now().naive_utc();

    let stored = repo
        .put_entry(&NewStoreEntry::new("asll-theme", json!("dark"), now))
        .unwrap();
    assert_eq!(stored.value, json!("dark"));
    assert_eq!(stored.expires_at, None);

    repo.put_entry(&NewStoreEntry::new("asll-theme", json!("light"), now))
        .unwrap();
    let entry = repo.get_entry("asll-theme").unwrap().unwrap();
    assert_eq!(entry.value, json!("light"));

    assert!(repo.get_entry("asll-missing").unwrap().is_none());
    assert!(repo.remove_entry("asll-theme").unwrap());
    assert!(!repo.remove_entry("asll-theme").unwrap());
    assert!(repo.get_entry("asll-theme").unwrap().is_none());
}

#[test]
fn test_store_hides_and_purges_expired_entries() {
    let test_db = common::TestDb::new("test_store_hides_and_purges_expired_entries.db");
    let repo = DieselRepository::new(test_db.pool());
    let now = Utc::now().naive_utc();

    let stale = NewStoreEntry::new("asll-users", json!({"items": []}), now - Duration::hours(2))
        .with_ttl(Duration::hours(1));
    let fresh = NewStoreEntry::new("asll-products", json!({"items": [1]}), now)
        .with_ttl(Duration::hours(1));
    repo.put_entry(&stale).unwrap();
    repo.put_entry(&fresh).unwrap();

    assert!(repo.get_entry("asll-users").unwrap().is_none());
    assert!(repo.get_entry("asll-products").unwrap().is_some());

    assert_eq!(repo.purge_expired().unwrap(), 1);
    assert_eq!(repo.purge_expired().unwrap(), 0);
    assert_eq!(repo.list_entries("asll-").unwrap().len(), 1);
}

#[test]
fn test_store_invalidates_by_literal_prefix() {
    let test_db = common::TestDb::new("test_store_invalidates_by_literal_prefix.db");
    let repo = DieselRepository::new(test_db.pool());
    let now = Utc::now().naive_utc();

    for key in [
        "asll-settings-general",
        "asll-settings-email",
        "asll-settingsXsms",
        "asll-theme",
    ] {
        repo.put_entry(&NewStoreEntry::new(key, json!({}), now))
            .unwrap();
    }

    // `_` is a LIKE wildcard and must not match any character.
    assert_eq!(repo.invalidate_prefix("asll_settings").unwrap(), 0);
    assert_eq!(repo.invalidate_prefix("asll-settings-").unwrap(), 2);

    let keys: Vec<String> = repo
        .list_entries("asll-")
        .unwrap()
        .into_iter()
        .map(|entry| entry.key)
        .collect();
    assert_eq!(keys, vec!["asll-settingsXsms", "asll-theme"]);
}
