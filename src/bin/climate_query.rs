//! Run the service's queries directly against a database and print JSON
use clap::{Parser, Subcommand};
use serde::Serialize;

use climate_service::db::{self, MeasurementRepository, StationRepository};
use climate_service::services::ClimateService;

#[derive(Parser)]
#[command(name = "climate-query")]
#[command(about = "Query the climate observations database from the command line", long_about = None)]
struct Cli {
    /// Database connection string
    #[arg(long, env, default_value = "sqlite://hawaii.sqlite")]
    database_url: String,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Most recent measurement date
    LatestDate,
    /// Most recent raw measurement rows
    Recent {
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Last 12 months of precipitation keyed by date
    Precipitation,
    /// Station identifiers
    Stations {
        /// Include name, coordinates and elevation
        #[arg(long)]
        details: bool,
    },
    /// Last 12 months of temperature observations for the most active station
    Tobs,
    /// Min, avg and max temperature for a date range
    TempStats {
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let pool = db::connect_with(&cli.database_url, 1, false).await?;

    let measurement_repo = MeasurementRepository::new(pool.clone());
    let station_repo = StationRepository::new(pool.clone());
    let service = ClimateService::new(measurement_repo.clone(), station_repo.clone());

    let output = match cli.command {
        Command::LatestDate => render(&service.latest_date().await?, cli.pretty)?,
        Command::Recent { limit } => render(&measurement_repo.find_recent(limit).await?, cli.pretty)?,
        Command::Precipitation => render(&service.precipitation_last_year().await?, cli.pretty)?,
        Command::Stations { details: false } => render(&service.list_stations().await?, cli.pretty)?,
        Command::Stations { details: true } => render(&station_repo.find_all().await?, cli.pretty)?,
        Command::Tobs => render(&service.most_active_tobs_last_year().await?, cli.pretty)?,
        Command::TempStats { start, end } => render(
            &service.temp_stats(&start, end.as_deref()).await?,
            cli.pretty,
        )?,
    };

    println!("{output}");
    pool.close().await;
    Ok(())
}

fn render<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
