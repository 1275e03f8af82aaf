use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CityEntry, IndexedStation};
use crate::utils::coordinates::round_to;

/// One lattice node with the temperature of its nearest station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub lat: f64,
    pub lon: f64,
    pub temp: f64,
    pub station_id: String,
    pub station_name: String,
    pub distance_km: f64,
    pub observed: Option<DateTime<Utc>>,
}

impl GridPoint {
    pub fn new(lat: f64, lon: f64, station: &IndexedStation, distance_km: f64) -> Self {
        Self {
            lat,
            lon,
            temp: station.temperature,
            station_id: station.id.clone(),
            station_name: station.name.clone(),
            distance_km: round_to(distance_km, 3),
            observed: station.observed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPayload {
    pub generated: String,
    pub source: String,
    pub points: Vec<GridPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPayload {
    pub generated: String,
    pub source: String,
    pub cities: Vec<CityEntry>,
}

/// The two payloads produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub grid: GridPayload,
    pub cities: CityPayload,
}
