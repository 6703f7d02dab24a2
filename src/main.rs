use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{error, info};

use street_finder::config::{ArtistBackend, Config};
use street_finder::logging;
use street_finder::server::{start_server, AppState};
use street_finder::Aggregator;

#[derive(Parser)]
#[command(name = "street_finder")]
#[command(about = "Coffee store and street artist aggregator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API consumed by the site
    Serve {
        /// Port to listen on (defaults to config / PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print coffee stores near a location
    Stores {
        /// "lat,long" pair
        #[arg(long)]
        lat_long: Option<String>,
        /// Maximum number of stores
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Print one page of street artists
    Artists {
        /// 1-based page number
        #[arg(long)]
        page: Option<u32>,
        /// Artist backend to use: rest or spreadsheet
        #[arg(long)]
        backend: Option<ArtistBackend>,
    },
    /// Print a single street artist
    Artist {
        #[arg(long)]
        id: String,
    },
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _guard = logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    if let Commands::Artists { backend: Some(backend), .. } = &cli.command {
        config.server.artist_backend = *backend;
    }
    let aggregator = Aggregator::from_config(&config)?;

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let state = AppState {
                aggregator: Arc::new(aggregator),
                has_location_keys: config.has_any_location_keys(),
            };
            info!(backend = ?config.server.artist_backend, "Starting server");
            start_server(state, port).await?;
        }
        Commands::Stores { lat_long, limit } => {
            match aggregator.aggregate(lat_long.as_deref(), limit).await {
                Ok(stores) => print_json(&stores)?,
                Err(e) => {
                    error!(kind = e.kind(), "Fetching coffee stores failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::Artists { page, .. } => {
            let artists = aggregator.aggregate_artists(page).await?;
            print_json(&artists)?;
        }
        Commands::Artist { id } => match aggregator.aggregate_artist(&id).await? {
            Some(artist) => print_json(&artist)?,
            None => println!("No artist with id {}", id),
        },
    }
    Ok(())
}
