use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::Pipeline;
use crate::readers::ConcurrentReader;
use crate::settings::Settings;
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;
use chrono::Utc;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build {
            raw_dir,
            output_dirs,
            max_age_hours,
            max_workers,
            mmap,
            pretty,
            dry_run,
        } => {
            apply_raw_dir(&mut settings, raw_dir);
            if !output_dirs.is_empty() {
                settings.output_dirs = output_dirs;
            }
            if max_age_hours.is_some() {
                settings.max_age_hours = max_age_hours;
            }
            if let Some(workers) = max_workers {
                settings.max_workers = workers;
            }
            settings.pretty |= pretty;
            settings.validate()?;

            println!("Building temperature datasets...");
            println!("Raw directory: {}", settings.raw_dir.display());
            println!("Workers: {}", settings.max_workers);

            let readings = ConcurrentReader::new(settings.max_workers)
                .with_mmap(mmap)
                .with_progress(true)
                .read_all(&settings.raw_dir)
                .await?;

            if readings.is_empty() {
                error!("No stations loaded; aborting");
                return Err(ProcessingError::NoValidStations);
            }

            let progress = ProgressReporter::new_spinner("Resolving grid and cities...", false);
            let result = Pipeline::from_settings(&settings).run(readings, Utc::now());
            let (datasets, report) = match result {
                Ok(built) => built,
                Err(e) => {
                    progress.finish_with_message("Build failed");
                    error!("{}; aborting write", e);
                    return Err(e);
                }
            };
            progress.finish_with_message(&format!(
                "Resolved {} grid points and {} cities",
                datasets.grid.points.len(),
                datasets.cities.cities.len()
            ));

            println!("\n{}", report.summary());

            if dry_run {
                println!("Dry run - no output files written");
                return Ok(());
            }

            let written = JsonWriter::new()
                .with_pretty(settings.pretty)
                .write_datasets(&datasets, &settings.output_dirs)?;

            for path in &written {
                println!("Wrote {}", path.display());
            }
            println!("Build complete!");
        }

        Commands::Nearest { lat, lon, raw_dir } => {
            apply_raw_dir(&mut settings, raw_dir);

            let readings = ConcurrentReader::new(settings.max_workers)
                .read_all(&settings.raw_dir)
                .await?;
            let (index, counts) =
                Pipeline::from_settings(&settings).build_index(readings, Utc::now())?;

            println!(
                "Searching {} stations for the nearest to ({}, {})",
                counts.indexed, lat, lon
            );

            match index.nearest(lat, lon) {
                Some(neighbor) => {
                    let station = neighbor.station;
                    println!(
                        "{} ({}) at ({:.4}, {:.4}): {:.1}°C, {:.1} km away",
                        station.name,
                        station.id,
                        station.latitude,
                        station.longitude,
                        station.temperature,
                        neighbor.distance_km
                    );
                    if let Some(observed_at) = station.observed_at {
                        println!("Observed at {}", observed_at.to_rfc3339());
                    }
                }
                None => println!("No station found"),
            }
        }

        Commands::Stations { raw_dir, sample } => {
            apply_raw_dir(&mut settings, raw_dir);

            let readings = ConcurrentReader::new(settings.max_workers)
                .with_progress(true)
                .read_all(&settings.raw_dir)
                .await?;

            let with_temp = readings.iter().filter(|r| r.has_temperature()).count();
            let undated = readings
                .iter()
                .filter(|r| r.has_temperature() && r.observed_at.is_none())
                .count();
            let latest = readings.iter().filter_map(|r| r.observed_at).max();

            println!("Stations: {}", readings.len());
            println!("With temperature: {}", with_temp);
            println!("Without timestamp: {}", undated);
            if let Some(latest) = latest {
                println!("Latest observation: {}", latest.to_rfc3339());
            }

            if sample > 0 {
                println!("\nSample Stations (showing up to {}):", sample);
                for (i, reading) in readings.iter().take(sample).enumerate() {
                    let temp = reading
                        .temperature
                        .map_or_else(|| "n/a".to_string(), |t| format!("{:.1}°C", t));
                    println!(
                        "{}. {} ({}) at ({:.4}, {:.4}): {}",
                        i + 1,
                        reading.name,
                        reading.id,
                        reading.latitude,
                        reading.longitude,
                        temp
                    );
                }
            }
        }
    }

    Ok(())
}

fn apply_raw_dir(settings: &mut Settings, raw_dir: Option<PathBuf>) {
    if let Some(raw_dir) = raw_dir {
        settings.raw_dir = raw_dir;
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}
