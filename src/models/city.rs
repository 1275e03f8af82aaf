use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::IndexedStation;
use crate::utils::constants::GERMAN_CITIES;
use crate::utils::coordinates::round_to;

/// A named location to resolve against the station index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct City {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub lon: f64,
}

impl City {
    pub fn new(name: &str, lat: f64, lon: f64) -> Self {
        Self {
            name: name.to_string(),
            lat,
            lon,
        }
    }
}

pub fn default_cities() -> Vec<City> {
    GERMAN_CITIES
        .iter()
        .map(|&(name, lat, lon)| City::new(name, lat, lon))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub temp: f64,
    pub station_id: String,
    pub station_name: String,
    pub distance_km: f64,
    pub observed: Option<DateTime<Utc>>,
}

impl CityEntry {
    pub fn new(city: &City, station: &IndexedStation, distance_km: f64) -> Self {
        Self {
            name: city.name.clone(),
            lat: city.lat,
            lon: city.lon,
            temp: station.temperature,
            station_id: station.id.clone(),
            station_name: station.name.clone(),
            distance_km: round_to(distance_km, 3),
            observed: station.observed_at,
        }
    }
}
