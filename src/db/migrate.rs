//! Numbered SQL migrations (`NNN_name.sql`) tracked in `schema_migrations`.

use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{PlantgraphError, Result};

const TRACKING_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

struct Migration {
    version: u32,
    name: String,
    sql: String,
}

impl Migration {
    /// `None` for files that are not `.sql`; an error for a `.sql` file
    /// without a numeric prefix.
    fn from_path(path: &Path) -> Result<Option<Self>> {
        if path.extension().and_then(|e| e.to_str()) != Some("sql") {
            return Ok(None);
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PlantgraphError::Config(format!("Invalid migration file: {}", path.display())))?
            .to_string();
        let version = name
            .split_once('_')
            .and_then(|(prefix, _)| prefix.parse::<u32>().ok())
            .ok_or_else(|| {
                PlantgraphError::Config(format!("Migration {} lacks a numeric NNN_ prefix", name))
            })?;
        let sql = fs::read_to_string(path)?;
        Ok(Some(Self { version, name, sql }))
    }
}

/// Names of applied migrations, oldest first.
pub fn get_applied_migrations(conn: &Connection) -> Result<Vec<String>> {
    conn.execute(TRACKING_TABLE, [])?;
    let mut stmt = conn.prepare("SELECT name FROM schema_migrations ORDER BY version")?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
    Ok(names)
}

fn applied_versions(conn: &Connection) -> Result<HashSet<u32>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get::<_, u32>(0))?
        .collect::<std::result::Result<HashSet<_>, rusqlite::Error>>()?;
    Ok(versions)
}

fn load_migrations(migrations_dir: &Path) -> Result<Vec<Migration>> {
    let mut migrations = Vec::new();
    for entry in fs::read_dir(migrations_dir)? {
        if let Some(migration) = Migration::from_path(&entry?.path())? {
            migrations.push(migration);
        }
    }
    migrations.sort_by_key(|m| m.version);
    Ok(migrations)
}

/// Apply every migration in `migrations_dir` not yet recorded, each in its
/// own transaction. Returns the names applied by this call.
pub fn run_migrations(conn: &mut Connection, migrations_dir: &Path) -> Result<Vec<String>> {
    conn.execute(TRACKING_TABLE, [])?;
    let done = applied_versions(conn)?;

    let mut applied = Vec::new();
    for migration in load_migrations(migrations_dir)? {
        if done.contains(&migration.version) {
            continue;
        }
        let tx = conn.transaction()?;
        tx.execute_batch(&migration.sql).map_err(|e| {
            PlantgraphError::Config(format!("Migration {} failed: {}", migration.name, e))
        })?;
        tx.execute(
            "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
            params![migration.version, migration.name],
        )?;
        tx.commit()?;
        log::info!("Applied migration {}", migration.name);
        applied.push(migration.name);
    }

    if applied.is_empty() {
        log::debug!("Schema up to date");
    }
    Ok(applied)
}
