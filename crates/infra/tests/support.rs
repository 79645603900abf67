#![allow(dead_code)]

use std::sync::Arc;

use skytrack_infra::database::{DbManager, SqliteDocumentStore};
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new migrated database in a fresh temp dir.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let manager = DbManager::new(temp_dir.path().join("test.db"), 4)
            .expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Document store over this database.
    pub fn document_store(&self) -> Arc<SqliteDocumentStore> {
        Arc::new(SqliteDocumentStore::new(Arc::clone(&self.manager)))
    }

    /// Open a second manager on the same file, as a restarted process would.
    pub fn reopen(&self) -> Arc<SqliteDocumentStore> {
        let manager =
            DbManager::new(self.manager.path(), 2).expect("db manager should reopen");
        Arc::new(SqliteDocumentStore::new(Arc::new(manager)))
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}
