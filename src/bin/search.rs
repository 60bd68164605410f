use anyhow::Result;
use clap::Parser;
use plantgraph::db::{load_snapshot, Db};
use plantgraph::{Config, GraphHandle};

#[derive(Parser, Debug)]
#[command(name = "search")]
#[command(about = "Find the districts and records for a species")]
struct Args {
    /// Species label, matched after normalization
    species: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.species.trim().is_empty() {
        anyhow::bail!("Species cannot be empty");
    }

    let config = Config::load()?;
    config.init_logging();
    let db = Db::new(config.db_path());
    let handle = GraphHandle::new(load_snapshot(&db).await, config.analysis_defaults());

    let result = handle.species_search(&args.species);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.is_empty() {
        println!("\nNo records for species '{}'.", args.species);
        let suggestions = handle.species_suggestions(&args.species);
        if !suggestions.is_empty() {
            println!("Did you mean:");
            for s in suggestions {
                println!("  {}", s);
            }
        }
        return Ok(());
    }

    println!("\n=== Species: {} ===", result.species);
    println!("Highlighted nodes: {}", result.nodes_to_highlight.len());
    for node in &result.nodes_to_highlight {
        println!("  {}", node);
    }
    println!("Highlighted edges: {}", result.edges_to_highlight.len());
    for (species, district) in &result.edges_to_highlight {
        println!("  {} -- {}", species, district);
    }
    if !result.skipped_districts.is_empty() {
        println!("Districts missing from the graph: {:?}", result.skipped_districts);
    }

    println!("\nRecords ({}):", result.matched_records.len());
    for r in &result.matched_records {
        println!(
            "  #{:<6} {:<24} {:<32} {:>10.2}",
            r.id, r.district, r.titleholder, r.area
        );
    }

    Ok(())
}
