use anyhow::Result;
use clap::Parser;
use plantgraph::db::{load_snapshot, Db};
use plantgraph::{AnalysisKind, AnalysisRequest, Config, GraphHandle};

#[derive(Parser, Debug)]
#[command(name = "analyze")]
#[command(about = "Run a graph analysis: bfs, dfs, shortest_path or components")]
struct Args {
    /// Analysis kind (bfs, dfs, shortest_path/dijkstra, components/unionfind)
    kind: String,

    /// Start node identifier (bfs, dfs, shortest_path)
    #[arg(short, long)]
    start: Option<String>,

    /// Target node identifier (shortest_path)
    #[arg(short, long)]
    target: Option<String>,

    /// Maximum nodes to visit (bfs, dfs)
    #[arg(short, long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let kind: AnalysisKind = args.kind.parse()?;

    let mut request = AnalysisRequest::new(kind);
    if let Some(start) = args.start {
        request = request.start(start);
    }
    if let Some(target) = args.target {
        request = request.target(target);
    }
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }

    let config = Config::load()?;
    config.init_logging();
    let db = Db::new(config.db_path());
    let handle = GraphHandle::new(load_snapshot(&db).await, config.analysis_defaults());

    let report = handle.analysis(&request)?;
    for note in &report.notes {
        log::info!("{}", note);
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
