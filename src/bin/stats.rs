use plantgraph::db::{load_snapshot, Db};
use plantgraph::graph::summarize_components;
use plantgraph::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    config.init_logging();
    let db = Db::new(config.db_path());
    let snapshot = load_snapshot(&db).await;

    println!("\n=== Plantgraph Statistics ===\n");

    let stats = snapshot.stats();
    if stats.num_nodes == 0 {
        println!("No graph stored yet.");
        println!("\nRun `ingest` to build one from {}.", config.source_path().display());
        return Ok(());
    }

    println!("Nodes:     {}", stats.num_nodes);
    println!("  Districts: {}", stats.num_districts);
    println!("  Species:   {}", stats.num_species);
    println!("Edges:     {}", stats.num_edges);
    println!("Records:   {}", stats.num_records);

    let components = summarize_components(&snapshot.graph, config.analysis.sizes_sample);
    println!("\nConnected components: {}", components.count);
    println!("Largest component:    {}", components.largest_size);
    println!("Sizes sample:         {:?}", components.sizes_sample);

    if let Some(hash) = &snapshot.meta.source_hash {
        println!("\nSource hash: {}", hash);
    }
    if let Some(built_at) = &snapshot.meta.built_at {
        println!("Built at:    {}", built_at);
    }
    println!();

    Ok(())
}
