use std::path::PathBuf;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use osmprj::app::{App, PrepareOptions};
use osmprj::charts;
use osmprj::config::{ExtractConfig, ReportConfig};
use osmprj::db::Database;
use osmprj::domain::RegionDesc;
use osmprj::error::OsmprjError;
use osmprj::http::GeofabrikClient;
use osmprj::reports::{self, AMENITY_FIELDS, PARKING_FIELDS};
use osmprj::runner::SystemRunner;
use osmprj::store::CacheStore;

#[derive(Parser)]
#[command(name = "osmprj")]
#[command(about = "Fetch GeoFabrik OSM extracts, carve bounding-box sub-regions and report on the imported data")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Retrieve an OSM data file and run the optional extract-and-merge step")]
    Prepare(PrepareArgs),
    #[command(about = "Generate reports from the imported OSM database")]
    Report(ReportArgs),
}

#[derive(Args)]
struct PrepareArgs {
    region: String,

    output: Utf8PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    dry_run: bool,

    #[arg(short, long)]
    silent: bool,
}

#[derive(Args)]
struct ReportArgs {
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: ReportCommand,
}

#[derive(Subcommand)]
enum ReportCommand {
    #[command(about = "Amenity count per city, normalized per sq. km")]
    AmenityCity(AmenityArgs),
    #[command(about = "Share of city area covered by parking space")]
    ParkingSpace(ParkingArgs),
}

#[derive(Args)]
struct AmenityArgs {
    cities: String,
    amenity: String,

    #[arg(short = 'o', long, value_enum, default_value = "terminal")]
    output_type: OutputType,

    #[arg(short = 'f', long, default_value = "chart.html")]
    output_file: Utf8PathBuf,
}

#[derive(Args)]
struct ParkingArgs {
    cities: String,

    #[arg(short = 'o', long, value_enum, default_value = "terminal")]
    output_type: OutputType,

    #[arg(short = 'f', long, default_value = "chart.html")]
    output_file: Utf8PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputType {
    Terminal,
    Chart,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<OsmprjError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &OsmprjError) -> u8 {
    match error {
        OsmprjError::InvalidRegion(_)
        | OsmprjError::ConfigRead(_)
        | OsmprjError::ConfigParse(_) => 2,
        OsmprjError::ResourceTimeout(_)
        | OsmprjError::ResourceInvalid(_)
        | OsmprjError::Http(_)
        | OsmprjError::HttpStatus { .. }
        | OsmprjError::MissingTool(_)
        | OsmprjError::ToolFailure { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Prepare(args) => run_prepare(args),
        Commands::Report(args) => run_report(args),
    }
}

fn run_prepare(args: PrepareArgs) -> miette::Result<()> {
    let region: RegionDesc = args.region.parse().into_diagnostic()?;
    let extracts = match &args.config {
        Some(path) => ExtractConfig::load(path).into_diagnostic()?.extracts,
        None => Vec::new(),
    };

    let store = CacheStore::new().into_diagnostic()?;
    let http = GeofabrikClient::new().into_diagnostic()?;
    let app = App::new(store, http, SystemRunner);
    app.prepare(
        &region,
        &args.output,
        &extracts,
        PrepareOptions {
            dry_run: args.dry_run,
            silent: args.silent,
        },
    )
    .into_diagnostic()?;
    Ok(())
}

fn run_report(args: ReportArgs) -> miette::Result<()> {
    let config = ReportConfig::load(&args.config).into_diagnostic()?;
    let db = Database::open(&config.database).into_diagnostic()?;

    match args.command {
        ReportCommand::AmenityCity(report) => {
            let cities = split_cities(&report.cities);
            let rows =
                reports::amenity_counts_by_city(&db, &cities, &report.amenity).into_diagnostic()?;
            let title = format!("Amenity count by city: {}", report.amenity);
            match report.output_type {
                OutputType::Terminal => {
                    let values: Vec<_> = rows.iter().map(|row| row.values()).collect();
                    charts::print_table(&title, AMENITY_FIELDS, &values);
                }
                OutputType::Chart => {
                    let data: Vec<_> = rows
                        .iter()
                        .map(|row| (row.city.clone(), row.amenity_per_sq_km))
                        .collect();
                    charts::write_bar_chart(
                        &report.output_file,
                        &title,
                        "Amenity per sq. km",
                        "City",
                        &data,
                    )
                    .into_diagnostic()?;
                }
            }
        }
        ReportCommand::ParkingSpace(report) => {
            let cities = split_cities(&report.cities);
            let rows = reports::parking_area_by_city(&db, &cities).into_diagnostic()?;
            match report.output_type {
                OutputType::Terminal => {
                    let values: Vec<_> = rows.iter().map(|row| row.values()).collect();
                    charts::print_table("Parking Area", PARKING_FIELDS, &values);
                }
                OutputType::Chart => {
                    let data: Vec<_> = rows
                        .iter()
                        .map(|row| (row.city.clone(), row.percentage_parking_area))
                        .collect();
                    charts::write_bar_chart(
                        &report.output_file,
                        "Percentage parking area by city",
                        "Percentage Parking area",
                        "City",
                        &data,
                    )
                    .into_diagnostic()?;
                }
            }
        }
    }
    Ok(())
}

fn split_cities(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|city| city.trim().to_string())
        .filter(|city| !city.is_empty())
        .collect()
}
