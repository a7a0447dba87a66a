use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pricescope_scraper::{aggregate, ChromeFetcher, ResourceBlockPolicy};

#[derive(Debug, Parser)]
#[command(name = "pricescope-cli")]
#[command(about = "Pricescope command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one aggregated price search and print the response as JSON.
    Search {
        /// Product name to search for across all configured sites.
        query: String,

        /// Override the site registry path from the environment config.
        #[arg(long)]
        sites: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search { query, sites } => run_search(&query, sites).await,
    }
}

async fn run_search(query: &str, sites_override: Option<PathBuf>) -> anyhow::Result<()> {
    if query.trim().is_empty() {
        anyhow::bail!("query must be non-empty");
    }

    let config = pricescope_core::load_app_config()?;
    let sites_path = sites_override.unwrap_or_else(|| config.sites_path.clone());
    let registry = pricescope_core::ProfileRegistry::load(&sites_path)?;
    tracing::info!(sites = registry.len(), path = %sites_path.display(), "loaded site registry");

    let fetcher = ChromeFetcher::new(config.fetch_timeout_secs, &config.user_agent);
    let policy = ResourceBlockPolicy::from_app_config(&config);

    let response = aggregate(
        &fetcher,
        &registry,
        &policy,
        config.max_concurrent_scrapes,
        query,
    )
    .await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
