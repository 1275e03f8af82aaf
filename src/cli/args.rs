use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dwd-temperature")]
#[command(about = "Nearest-station temperature grid and city datasets from DWD station data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, YAML, JSON, ...)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the grid and city datasets and write them to every output directory
    Build {
        #[arg(short, long, help = "Directory with stations.csv and temperatures/")]
        raw_dir: Option<PathBuf>,

        #[arg(
            short,
            long = "output-dir",
            help = "Output directory, repeatable [default: public/data and data]"
        )]
        output_dirs: Vec<PathBuf>,

        #[arg(long, help = "Ignore readings older than this many hours")]
        max_age_hours: Option<u32>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, help = "Memory-map station series files")]
        mmap: bool,

        #[arg(long, help = "Pretty-print the JSON output")]
        pretty: bool,

        #[arg(long, help = "Build and report without writing any files")]
        dry_run: bool,
    },

    /// Resolve a single coordinate to its nearest station
    Nearest {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(short, long)]
        raw_dir: Option<PathBuf>,
    },

    /// Summarise the station data found in the raw directory
    Stations {
        #[arg(short, long)]
        raw_dir: Option<PathBuf>,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
