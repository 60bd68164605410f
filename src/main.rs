use anyhow::Result;
use plantgraph::db::{load_snapshot, migrate, Db};
use plantgraph::error::PlantgraphError;
use plantgraph::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("verify");

    match command {
        "verify" => run_verification().await?,
        other => anyhow::bail!(
            "Unknown command '{}'. Use `plantgraph verify`, or the ingest/search/analyze/stats binaries.",
            other
        ),
    }

    Ok(())
}

/// Load config, bring the schema up to date and report the stored graph
async fn run_verification() -> Result<()> {
    let config = Config::load()?;
    config.init_logging();
    log::info!("Starting plantgraph v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Configuration loaded successfully");
    log::info!("Source table: {}", config.source_path().display());
    log::info!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    db.migrate(config.migrations_dir()).await?;
    verify_database_schema(&db).await?;

    let snapshot = load_snapshot(&db).await;
    let stats = snapshot.stats();
    log::info!(
        "Graph: {} nodes ({} districts, {} species), {} edges, {} records",
        stats.num_nodes,
        stats.num_districts,
        stats.num_species,
        stats.num_edges,
        stats.num_records
    );
    match &snapshot.meta.built_at {
        Some(built_at) => log::info!("Last build: {}", built_at),
        None => log::info!("No graph built yet. Run `ingest` to build one."),
    }

    Ok(())
}

async fn verify_database_schema(db: &Db) -> Result<()> {
    db.with_connection(|conn| {
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;
        let tables: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let expected_tables = [
            "graph_edges",
            "graph_nodes",
            "planting_records",
            "schema_migrations",
            "snapshot_meta",
        ];
        let missing: Vec<&str> = expected_tables
            .iter()
            .copied()
            .filter(|t| !tables.iter().any(|name| name == t))
            .collect();
        if !missing.is_empty() {
            for table in &missing {
                log::error!("Missing table: {}", table);
            }
            return Err(PlantgraphError::Config(format!(
                "Missing tables: {}",
                missing.join(", ")
            )));
        }

        let applied = migrate::get_applied_migrations(conn)?;
        log::debug!("{} migrations applied", applied.len());

        let integrity: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if integrity != "ok" {
            return Err(PlantgraphError::Config(format!(
                "Database integrity check failed: {}",
                integrity
            )));
        }

        Ok(())
    })
    .await?;

    log::info!("Database schema verification complete");
    Ok(())
}
