// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use study_map_core::config::AppConfig;
use study_map_core::diagnostics::run_diagnostics;
use study_map_core::geo::{distance_meters, format_distance, GeoCoordinate};
use study_map_core::presenter::{filtered_and_sorted, members_line, summary_line, SortMode};
use study_map_core::projection::MAX_LATITUDE;
use study_map_core::store::{JsonStore, LocationStore};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory with the local JSON data (overrides config.json)
    #[arg(short, long, env = "STUDY_MAP_DATA")]
    data_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List study groups, nearest first by default
    Locations {
        /// distance, name, members, 100m, 500m or 1km
        #[arg(short, long, default_value = "distance")]
        sort: SortMode,
    },
    /// Show the current student profile
    Student,
    /// Print the saved user location
    Where,
    /// Save a new user location
    SetLocation {
        #[arg(allow_negative_numbers = true)]
        latitude: f64,
        #[arg(allow_negative_numbers = true)]
        longitude: f64,
    },
    /// Great-circle distance between two points
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },
    /// Check that the tile server and data source are reachable
    Diagnose,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("study_map")
        .build();
    // Only fails if a logger is already installed.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn open_store(cli: &Cli, config: &AppConfig) -> Result<Box<dyn LocationStore>> {
    match &cli.data_dir {
        Some(dir) => Ok(Box::new(JsonStore::new(dir))),
        None => config.open_store().context("Failed to open data source"),
    }
}

fn validate(latitude: f64, longitude: f64) -> Result<GeoCoordinate> {
    if !latitude.is_finite() || latitude.abs() > MAX_LATITUDE {
        bail!("Latitude must be within ±{:.4}", MAX_LATITUDE);
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        bail!("Longitude must be within ±180");
    }
    Ok(GeoCoordinate::new(latitude, longitude))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = AppConfig::load();

    match &cli.command {
        Commands::Locations { sort } => {
            let store = open_store(&cli, &config)?;
            let user = store
                .load_user_coordinate()?
                .unwrap_or(config.default_user_location);
            let locations = filtered_and_sorted(&store.load_locations(user)?, *sort);

            println!("{} from {}", sort, user);
            if locations.is_empty() {
                println!("No study groups match.");
            }
            for location in &locations {
                println!(
                    "{:>4}  {:<24} {:<28} {}",
                    location.id,
                    location.group_name,
                    summary_line(location),
                    members_line(location)
                );
            }
        }
        Commands::Student => {
            let store = open_store(&cli, &config)?;
            let student = store.load_current_student()?.unwrap_or_default();
            println!("Name:           {}", student.full_name());
            println!("Student number: {}", student.student_number);
            println!("Email:          {}", student.email);
            println!("Course:         {}", student.course);
        }
        Commands::Where => {
            let store = open_store(&cli, &config)?;
            match store.load_user_coordinate()? {
                Some(coord) => println!("{}", coord),
                None => println!("{} (default, nothing saved yet)", config.default_user_location),
            }
        }
        Commands::SetLocation {
            latitude,
            longitude,
        } => {
            let coord = validate(*latitude, *longitude)?;
            let store = open_store(&cli, &config)?;
            store
                .save_user_coordinate(coord)
                .context("Failed to save location")?;
            println!("Location saved: {}", coord);
        }
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            let a = GeoCoordinate::new(*lat1, *lon1);
            let b = GeoCoordinate::new(*lat2, *lon2);
            let meters = distance_meters(a, b);
            println!("{} ({:.1} m)", format_distance(meters), meters);
        }
        Commands::Diagnose => {
            let results = run_diagnostics(&config);
            let mut failed = 0;
            for result in &results {
                let mark = if result.is_ok() { "[ok]" } else { "[!!]" };
                if !result.is_ok() {
                    failed += 1;
                }
                println!(
                    "{} {} {:?} ({} ms)",
                    mark,
                    result.url,
                    result.status,
                    result.elapsed.as_millis()
                );
            }
            if failed > 0 {
                bail!("{} of {} checks failed", failed, results.len());
            }
        }
    }

    Ok(())
}
