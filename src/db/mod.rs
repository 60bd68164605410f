use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{PlantgraphError, Result};

pub mod migrate;
pub mod snapshot;

pub use snapshot::{load_snapshot, read_snapshot, save_snapshot, stored_source_hash};

// WAL for concurrent readers during a save, NORMAL sync for speed,
// temp_store in memory for the bulk inserts of a snapshot.
const PRAGMAS: &str = "PRAGMA journal_mode = WAL; \
     PRAGMA synchronous = NORMAL; \
     PRAGMA foreign_keys = ON; \
     PRAGMA temp_store = MEMORY; \
     PRAGMA cache_size = -16384;";

/// Database connection wrapper
#[derive(Debug, Clone)]
pub struct Db {
    path: PathBuf,
}

impl Db {
    /// Create a new database connection manager
    pub fn new<P: AsRef<Path>>(db_path: P) -> Self {
        Self {
            path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a new database connection with the standard pragmas
    pub fn open_connection(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path).map_err(PlantgraphError::Database)?;
        conn.execute_batch(PRAGMAS)?;
        Ok(conn)
    }

    /// Execute a closure with a database connection in a blocking task
    pub async fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        task::spawn_blocking(move || {
            let mut conn = db.open_connection()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| PlantgraphError::Config(format!("database task failed: {}", e)))?
    }

    /// Apply pending migrations from `migrations_dir`; returns the names applied
    pub async fn migrate(&self, migrations_dir: &Path) -> Result<Vec<String>> {
        let dir = migrations_dir.to_path_buf();
        self.with_connection(move |conn| migrate::run_migrations(conn, &dir))
            .await
    }
}
