use asll_admin::db::{DbPool, establish_connection_pool, run_migrations};
use tempfile::TempDir;

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("should create a temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("temp path should be utf-8");
        let pool = establish_connection_pool(url).expect("should open the pool");
        run_migrations(&pool).expect("should apply migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}
