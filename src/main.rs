//! Experiment tools stdio server - main entry point.
//!
//! Loads experiments and precomputed exposure results from a JSON fixture and
//! serves toolkit requests as line-delimited JSON on stdin/stdout.

use clap::Parser;
use experiment_tools::experiment::Fixture;
use experiment_tools::ipc::LineServer;
use experiment_tools::tools::ExperimentToolkit;
use experiment_tools::types::TeamId;
use experiment_tools::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;

#[derive(Debug, Parser)]
#[command(name = "experiment-tools", version, about = "Serve experiment tools over stdio")]
struct Cli {
    /// JSON fixture with `experiments` and `results`.
    #[arg(long, env = "EXPERIMENT_TOOLS_FIXTURE")]
    fixture: PathBuf,

    /// Optional JSON config file.
    #[arg(long, env = "EXPERIMENT_TOOLS_CONFIG")]
    config: Option<PathBuf>,

    /// Team used for requests that do not name one.
    #[arg(long)]
    team_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(raw) = cli.team_id {
        config.tenant.default_team_id = Some(TeamId::from_raw(raw)?);
    }

    // Initialize observability
    experiment_tools::observability::init_tracing(&config.observability);

    let (store, runner) = Fixture::from_json_file(&cli.fixture)?.into_parts();
    tracing::info!(
        fixture = %cli.fixture.display(),
        experiments = store.len().await,
        "fixture loaded"
    );

    let toolkit = ExperimentToolkit::from_config(&config.tools, Arc::new(store), Arc::new(runner))?;
    let server = LineServer::new(&toolkit, config.tenant.default_team_id);

    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    Ok(())
}
