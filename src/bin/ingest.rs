use anyhow::Result;
use clap::Parser;
use plantgraph::db::{save_snapshot, stored_source_hash, Db};
use plantgraph::ingest::{compute_source_hash, read_table};
use plantgraph::{Config, GraphSnapshot};
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Build the district/species graph from the configured planting table")]
struct Args {
    /// Rebuild even when the source file is unchanged
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load()?;
    config.init_logging();
    config.validate_source()?;
    log::info!("Source table: {}", config.source_path().display());
    log::info!("Database path: {}", config.db_path().display());

    let db = Db::new(config.db_path());
    db.migrate(config.migrations_dir()).await?;

    let source_hash = compute_source_hash(config.source_path())?;
    if !args.force {
        if let Some(previous) = stored_source_hash(&db).await? {
            if previous == source_hash {
                log::info!("Source unchanged since last build, skipping (use --force to rebuild)");
                return Ok(());
            }
        }
    } else {
        log::info!("Mode: forced rebuild");
    }

    let start = Instant::now();
    let table = read_table(config.source_path(), config.delimiter_byte()?)?;
    let snapshot = GraphSnapshot::build(&table, Some(source_hash))?;
    save_snapshot(&db, &snapshot).await?;

    let stats = snapshot.stats();
    log::info!("=== Ingestion Complete ===");
    log::info!("Rows read: {}", table.len());
    log::info!("Records: {}", stats.num_records);
    log::info!("Districts: {}", stats.num_districts);
    log::info!("Species: {}", stats.num_species);
    log::info!("Edges: {}", stats.num_edges);
    log::info!("Time: {:?}", start.elapsed());

    Ok(())
}
