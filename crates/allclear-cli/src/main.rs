mod search;
mod url;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use allclear_core::GeoPosition;

#[derive(Debug, Parser)]
#[command(name = "allclear-cli")]
#[command(about = "AllClear testing-site locator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for testing facilities around a position
    Search {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Filter as key=value (repeatable). `Any` leaves a filter unset.
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
        /// Ignore every filter
        #[arg(long)]
        unfiltered: bool,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search around an autocomplete selection given as JSON
    Locate {
        /// `{"description", "latitude", "longitude", "id"}`
        #[arg(long)]
        place: String,
        #[arg(long)]
        json: bool,
    },
    /// Simulate page mount with an optional device and profile location
    Mount {
        /// Device location as `lat,lng`; omit to simulate a declined prompt
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        device: Option<GeoPosition>,
        /// Profile location as `lat,lng`
        #[arg(long, value_parser = parse_position, allow_hyphen_values = true)]
        profile: Option<GeoPosition>,
        #[arg(long)]
        json: bool,
    },
    /// Decode a map page query string
    Url {
        query: String,
    },
}

fn parse_position(raw: &str) -> Result<GeoPosition, String> {
    GeoPosition::parse_pair(raw).ok_or_else(|| format!("expected `lat,lng`, got `{raw}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = allclear_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            lat,
            lng,
            filters,
            unfiltered,
            json,
        } => {
            search::run_search(
                &config,
                GeoPosition::new(lat, lng),
                &filters,
                unfiltered,
                json,
            )
            .await?;
        }
        Commands::Locate { place, json } => search::run_locate(&config, &place, json).await?,
        Commands::Mount {
            device,
            profile,
            json,
        } => search::run_mount(&config, device, profile, json).await?,
        Commands::Url { query } => url::run_url_decode(&query)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
