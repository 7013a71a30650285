use anyhow::{bail, Context, Result};
use aqmon_service::config::Config;
use aqmon_service::dev_mode::DevMode;
use aqmon_service::ingest::openaq;
use aqmon_service::locations::{self, Location, LOCATION_REGISTRY};
use aqmon_service::logging::{self, Component};
use aqmon_service::model::RawMeasurement;
use aqmon_service::pipeline::{AirQualityReport, Pipeline};
use aqmon_service::species;
use aqmon_service::verify;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "aqmon_service", version, about = "Air-quality level classification service")]
struct Cli {
    /// Config file (defaults to $AQMON_CONFIG, then ./aqmon.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a JSON array of raw measurements
    Classify {
        #[arg(long)]
        input: PathBuf,
        /// Label for the report
        #[arg(long)]
        location: Option<String>,
    },
    /// Fetch latest OpenAQ measurements around a city or point and classify them
    Fetch {
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        city: Option<String>,
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Classify a recorded OpenAQ payload instead of calling the API
    Replay {
        #[arg(long)]
        dir: PathBuf,
        #[arg(long)]
        city: String,
    },
    /// Check which registry cities return data from the live API
    Verify {
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        continent: Option<String>,
    },
    /// List known pollutant species with the breakpoints in effect
    Species,
    /// List registry cities
    Cities {
        #[arg(long)]
        continent: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from_env(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logger(
        config.logging.level,
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    let pipeline = Pipeline::from_config(&config)?;

    match cli.command {
        Command::Classify { input, location } => {
            let body = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let measurements: Vec<RawMeasurement> = serde_json::from_str(&body)
                .with_context(|| format!("Failed to parse measurements from {}", input.display()))?;
            let report = pipeline.run(&measurements);
            print_report(match location {
                Some(name) => report.for_location(&name),
                None => report,
            })?;
        }
        Command::Fetch { city, lat, lng } => {
            let (label, lat, lng) = match (city, lat, lng) {
                (Some(name), _, _) => {
                    let location = find_city(&name)?;
                    (location.name.to_string(), location.latitude, location.longitude)
                }
                (None, Some(lat), Some(lng)) => (format!("{},{}", lat, lng), lat, lng),
                _ => bail!("either --city or both --lat and --lng are required"),
            };

            let client = http_client(config.openaq.timeout_secs)?;
            let measurements = openaq::fetch_or_empty(&client, &config.openaq, &label, lat, lng);
            print_report(pipeline.run(&measurements).for_location(&label))?;
        }
        Command::Replay { dir, city } => {
            let dev = DevMode::new(&dir);
            let measurements = dev.fetch_snapshot_or_empty(&city);
            print_report(pipeline.run(&measurements).for_location(&city))?;
        }
        Command::Verify { city, continent } => {
            let targets: Vec<&Location> = match (city, continent) {
                (Some(name), _) => vec![find_city(&name)?],
                (None, Some(continent)) => locations::locations_in_continent(&continent),
                (None, None) => LOCATION_REGISTRY.iter().collect(),
            };
            if targets.is_empty() {
                bail!("no registry cities match the given filter");
            }

            let client = http_client(config.openaq.timeout_secs)?;
            let report = verify::verify_all(&client, &config.openaq, &targets);
            logging::info(
                Component::System,
                None,
                &format!(
                    "Verification complete: {}/{} working, {} partial, {} failed",
                    report.summary.working,
                    report.summary.total,
                    report.summary.partial,
                    report.summary.failed
                ),
            );
            print_json(&report)?;
        }
        Command::Species => {
            for key in species::all_species_keys() {
                let [good, moderate, unhealthy, hazardous] = pipeline.table().lookup(key).as_array();
                println!(
                    "{:<6} {:<6} {:>8} {:>8} {:>8} {:>8}",
                    key,
                    species::display_name(key),
                    good,
                    moderate,
                    unhealthy,
                    hazardous
                );
            }
        }
        Command::Cities { continent } => {
            let cities: Vec<&Location> = match continent {
                Some(c) => locations::locations_in_continent(&c),
                None => LOCATION_REGISTRY.iter().collect(),
            };
            for city in cities {
                println!(
                    "{:<16} {:<14} {:<14} {:>9.4} {:>10.4}",
                    city.name, city.country, city.continent, city.latitude, city.longitude
                );
            }
        }
    }

    Ok(())
}

fn find_city(name: &str) -> Result<&'static Location> {
    locations::find_location(name).with_context(|| {
        format!(
            "Unknown city '{}'. Known cities: {}",
            name,
            locations::all_location_names().join(", ")
        )
    })
}

fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to create HTTP client")
}

fn print_report(report: AirQualityReport) -> Result<()> {
    if report.used_fallback {
        logging::warn(
            Component::System,
            report.location.as_deref(),
            "No usable measurements; showing fallback readings",
        );
    }
    print_json(&report)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
