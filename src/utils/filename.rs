use crate::utils::constants::{CITIES_OUTPUT_FILE, GRID_OUTPUT_FILE, SERIES_EXTENSIONS};
use std::path::{Path, PathBuf};

/// Grid dataset path inside an output directory
pub fn grid_output_path(output_dir: &Path) -> PathBuf {
    output_dir.join(GRID_OUTPUT_FILE)
}

/// City dataset path inside an output directory
pub fn cities_output_path(output_dir: &Path) -> PathBuf {
    output_dir.join(CITIES_OUTPUT_FILE)
}

/// Candidate time series files for a station, e.g. `temperatures/00433.csv`
pub fn series_candidates(temperature_dir: &Path, station_id: &str) -> Vec<PathBuf> {
    SERIES_EXTENSIONS
        .iter()
        .map(|ext| temperature_dir.join(format!("{}.{}", station_id, ext)))
        .collect()
}
