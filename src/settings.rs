//! Run configuration.
//!
//! Values are layered: built-in defaults, then an optional settings file,
//! then `DWD_*` environment variables (`__` separates nested keys, e.g.
//! `DWD_GRID__STEP=0.5`). Command line flags are applied on top by the CLI.

use crate::error::{ProcessingError, Result};
use crate::models::{default_cities, City};
use crate::processors::{GridConfig, IndexConfig};
use crate::utils::constants::{DEFAULT_OUTPUT_DIRS, RAW_DIR};
use chrono::Duration;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

pub const ENV_PREFIX: &str = "DWD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub raw_dir: PathBuf,
    pub output_dirs: Vec<PathBuf>,
    pub grid: GridConfig,
    pub index: IndexConfig,
    pub cities: Vec<City>,
    /// Readings older than this are not published; unset disables the check
    pub max_age_hours: Option<u32>,
    pub max_workers: usize,
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from(RAW_DIR),
            output_dirs: DEFAULT_OUTPUT_DIRS.iter().map(PathBuf::from).collect(),
            grid: GridConfig::default(),
            index: IndexConfig::default(),
            cities: default_cities(),
            max_age_hours: None,
            max_workers: num_cpus::get(),
            pretty: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.index.validate()?;

        if self.output_dirs.is_empty() {
            return Err(ProcessingError::Config(
                "At least one output directory is required".to_string(),
            ));
        }

        if self.max_workers == 0 {
            return Err(ProcessingError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }

        for city in &self.cities {
            city.validate()?;
        }

        Ok(())
    }

    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_hours.map(|h| Duration::hours(i64::from(h)))
    }
}
