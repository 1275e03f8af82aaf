use crate::error::{ProcessingError, Result};
use crate::models::GridPoint;
use crate::processors::SpatialIndex;
use crate::utils::constants::{
    COORDINATE_PRECISION, GRID_EPSILON, GRID_MAX_LAT, GRID_MAX_LON, GRID_MIN_LAT, GRID_MIN_LON,
    GRID_STEP, MAX_AXIS_POINTS,
};
use crate::utils::coordinates::round_to;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
    pub step: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lat_min: GRID_MIN_LAT,
            lat_max: GRID_MAX_LAT,
            lon_min: GRID_MIN_LON,
            lon_max: GRID_MAX_LON,
            step: GRID_STEP,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ProcessingError::Config(format!(
                "Grid step must be positive, got: {}",
                self.step
            )));
        }

        if !(-90.0..=90.0).contains(&self.lat_min)
            || !(-90.0..=90.0).contains(&self.lat_max)
            || self.lat_min > self.lat_max
        {
            return Err(ProcessingError::Config(format!(
                "Invalid latitude range [{}, {}]",
                self.lat_min, self.lat_max
            )));
        }

        if !(-180.0..=180.0).contains(&self.lon_min)
            || !(-180.0..=180.0).contains(&self.lon_max)
            || self.lon_min > self.lon_max
        {
            return Err(ProcessingError::Config(format!(
                "Invalid longitude range [{}, {}]",
                self.lon_min, self.lon_max
            )));
        }

        for (min, max) in [(self.lat_min, self.lat_max), (self.lon_min, self.lon_max)] {
            if min + self.step == min || axis_len(min, max, self.step) > MAX_AXIS_POINTS {
                return Err(ProcessingError::Config(format!(
                    "Grid step {} is too small for axis [{}, {}]",
                    self.step, min, max
                )));
            }
        }

        Ok(())
    }
}

// Expected number of axis values, ignoring rounding drift
fn axis_len(start: f64, stop: f64, step: f64) -> usize {
    ((stop - start) / step).floor() as usize + 1
}

/// Values from `start` to `stop` inclusive, built by repeated addition of
/// `step` and rounded to 6 decimal places.
pub fn axis_values(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let mut values = Vec::new();
    if !(step.is_finite() && step > 0.0) {
        return values;
    }

    let mut value = start;
    while value <= stop + GRID_EPSILON {
        values.push(round_to(value, COORDINATE_PRECISION));
        let next = value + step;
        if next == value {
            break;
        }
        value = next;
    }

    values
}

pub struct GridBuilder {
    config: GridConfig,
}

impl GridBuilder {
    pub fn new(config: GridConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Lattice nodes, latitude-major.
    pub fn lattice(&self) -> Vec<(f64, f64)> {
        let lats = axis_values(self.config.lat_min, self.config.lat_max, self.config.step);
        let lons = axis_values(self.config.lon_min, self.config.lon_max, self.config.step);

        lats.iter()
            .flat_map(|&lat| lons.iter().map(move |&lon| (lat, lon)))
            .collect()
    }

    /// Resolve every lattice node to its nearest station. Nodes without a
    /// station are skipped.
    pub fn build(&self, index: &SpatialIndex) -> Vec<GridPoint> {
        let points: Vec<GridPoint> = self
            .lattice()
            .into_iter()
            .filter_map(|(lat, lon)| {
                index
                    .nearest(lat, lon)
                    .map(|n| GridPoint::new(lat, lon, n.station, n.distance_km))
            })
            .collect();

        info!("Built grid with {} points", points.len());
        points
    }
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
