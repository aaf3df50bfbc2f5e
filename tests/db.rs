use diesel::connection::SimpleConnection;

mod common;

#[test]
fn test_creates_and_migrates_db_file() {
    let test_db = common::TestDb::new("test_creates_and_migrates_db_file.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}

#[test]
fn test_migrations_create_store_table() {
    let test_db = common::TestDb::new("test_migrations_create_store_table.db");
    let mut conn = test_db.pool().get().unwrap();
    conn.batch_execute("SELECT key, value, updated_at, expires_at FROM store_entries")
        .unwrap();
}
