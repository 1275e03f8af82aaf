use crate::models::{CityEntry, CityPayload, Datasets, GridPayload, GridPoint};
use crate::utils::constants::{CITIES_SOURCE, GRID_SOURCE};
use chrono::{DateTime, SecondsFormat, Utc};

/// Wraps grid points and city entries into payload envelopes that share one
/// generation timestamp.
pub struct DatasetAssembler {
    generated: String,
}

impl DatasetAssembler {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn generated(&self) -> &str {
        &self.generated
    }

    pub fn grid(&self, points: Vec<GridPoint>) -> GridPayload {
        GridPayload {
            generated: self.generated.clone(),
            source: GRID_SOURCE.to_string(),
            points,
        }
    }

    pub fn cities(&self, cities: Vec<CityEntry>) -> CityPayload {
        CityPayload {
            generated: self.generated.clone(),
            source: CITIES_SOURCE.to_string(),
            cities,
        }
    }

    pub fn assemble(&self, points: Vec<GridPoint>, cities: Vec<CityEntry>) -> Datasets {
        Datasets {
            grid: self.grid(points),
            cities: self.cities(cities),
        }
    }
}
