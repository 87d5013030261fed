use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use carbon_trip::{
    api::GeoClient,
    config::{constant::REFERENCE_MODE, GeoConfig},
    distance::DistanceResolver,
    domain::CarbonCreditPolicy,
    emission::{EmissionCalculator, EmissionTable},
    logging::init_tracing_and_env,
    report::{render_text, write_comparison_csv},
    trip::{TripPlanner, TripRequest},
};

/// Estimate the CO2 emitted by a trip between two cities
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Origin city (e.g., "São Paulo")
    #[arg(short, long, required_unless_present = "search")]
    origin: Option<String>,

    /// Destination city (e.g., "Campinas")
    #[arg(short, long, required_unless_present = "search")]
    destination: Option<String>,

    /// Transport mode id from the emission table
    #[arg(short, long, default_value = REFERENCE_MODE)]
    mode: String,

    /// Trip distance in km; skips the road distance lookup
    #[arg(long)]
    distance: Option<f64>,

    /// CSV emission table (id,factor,label,icon,color)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Write the mode comparison to this CSV file
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// List place candidates for a query and exit
    #[arg(long, conflicts_with_all = ["origin", "destination"])]
    search: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing_and_env();
    let cli = Cli::parse();

    let table = match &cli.table {
        Some(path) => EmissionTable::from_csv_path(path, REFERENCE_MODE)?,
        None => EmissionTable::default(),
    };
    let calculator = EmissionCalculator::new(table, CarbonCreditPolicy::default());
    let resolver = DistanceResolver::new(GeoClient::new(GeoConfig::from_env())?);

    if let Some(query) = &cli.search {
        let places = resolver.search_places(query).await;
        if places.is_empty() {
            println!("No places found for '{}'", query);
        }
        for place in places {
            println!(
                "{} ({:.5}, {:.5})",
                place.display_name, place.latitude, place.longitude
            );
        }
        return Ok(());
    }

    let planner = TripPlanner::new(calculator, resolver);
    let request = TripRequest {
        origin: cli.origin.unwrap_or_default(),
        destination: cli.destination.unwrap_or_default(),
        mode: cli.mode,
        distance_km: cli.distance,
    };

    let report = planner.plan(&request).await?;
    let mut text = String::new();
    render_text(&report, planner.calculator().table(), &mut text)?;
    print!("{}", text);

    if let Some(path) = cli.csv_out {
        write_comparison_csv(&report, planner.calculator().table(), &path)?;
        info!("Comparison written to {}", path.display());
    }

    Ok(())
}
