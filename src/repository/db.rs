//! Database Connection and Setup
//!
//! Opens the SQLite file, applies pragmas and brings the schema to the
//! current version.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};
use super::invalidation::InvalidationTracker;

/// Schema version written to `PRAGMA user_version`
pub const SCHEMA_VERSION: i32 = 1;

/// Path value that opens a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Open database: one connection plus the change tracker its writers bump.
///
/// Cloning shares both; the connection mutex serializes every statement.
#[derive(Clone)]
pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
    pub(crate) tracker: InvalidationTracker,
}

impl Database {
    /// Run a closure against the connection on the blocking pool.
    ///
    /// The connection lock is held for the duration of the closure, so
    /// calls never interleave.
    pub(crate) async fn call<F, T>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Connection) -> DomainResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.conn.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *guard)).await?
    }
}

/// Initialize database with path
pub async fn init_db(db_path: &Path) -> DomainResult<Database> {
    let path = db_path.to_path_buf();
    let conn = tokio::task::spawn_blocking(move || open_connection(&path)).await??;

    log::info!("Database ready at {}", db_path.display());

    Ok(Database {
        conn: Arc::new(Mutex::new(conn)),
        tracker: InvalidationTracker::new(),
    })
}

fn open_connection(path: &Path) -> DomainResult<Connection> {
    let in_memory = path.as_os_str() == IN_MEMORY;

    let conn = if in_memory {
        Connection::open_in_memory()?
    } else {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Connection::open(path)?
    };

    if !in_memory {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    }
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(Duration::from_millis(5000))?;

    run_migrations(&conn)?;
    Ok(conn)
}

fn schema_version(conn: &Connection) -> DomainResult<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    let version = schema_version(conn)?;

    if version > SCHEMA_VERSION {
        return Err(DomainError::Storage(format!(
            "Database schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    if version < 1 {
        log::info!("Migrating items schema {} -> 1", version);
        conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                quantity INTEGER NOT NULL
            );
            PRAGMA user_version = 1;
            COMMIT;",
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_in_memory_schema() {
        let db = init_db(&PathBuf::from(IN_MEMORY)).await.expect("init");
        let version = db.call(|conn| schema_version(conn)).await.unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_reopen_keeps_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("item_database");

        drop(init_db(&path).await.expect("first open"));
        let db = init_db(&path).await.expect("second open");

        let version = db.call(|conn| schema_version(conn)).await.unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn test_rejects_newer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("item_database");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", 2).unwrap();
        }

        let err = init_db(&path).await.err().expect("newer schema must fail");
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
