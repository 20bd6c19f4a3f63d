use bizfind_core::{query::DEFAULT_RADIUS_METERS, AppConfig, SearchQuery};
use bizfind_places::PlacesClient;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bizfind-cli")]
#[command(about = "Find local businesses without a real website")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the filtered businesses as JSON
    Search {
        /// Business type or name, e.g. "bakery"
        #[arg(long)]
        query: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters (capped at 50000)
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS, allow_negative_numbers = true)]
        radius: i64,
        /// Minimum number of reviews a place needs
        #[arg(long, default_value_t = 0)]
        min_reviews: i64,
    },
    /// Print the effective configuration with credentials redacted
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = bizfind_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            query,
            lat,
            lng,
            radius,
            min_reviews,
        } => {
            let query = SearchQuery::new(&query, lat, lng, radius, min_reviews)?;
            run_search(&config, &query).await
        }
        Commands::Config => {
            print_config(&config);
            Ok(())
        }
    }
}

async fn run_search(config: &AppConfig, query: &SearchQuery) -> anyhow::Result<()> {
    for var in config.missing_credentials() {
        tracing::warn!(var, "environment variable not set");
    }

    let client = PlacesClient::from_config(config)?;
    let result = client.find_businesses(query).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn print_config(config: &AppConfig) {
    println!("{config:#?}");
    for var in config.missing_credentials() {
        println!("warning: {var} is not set");
    }
}
