use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Observation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StationMetadata {
    #[validate(length(min = 1))]
    pub id: String,

    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl StationMetadata {
    pub fn new(id: String, name: String, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            name,
            latitude,
            longitude,
        }
    }
}

/// A station together with its latest observation, if one was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReading {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl StationReading {
    pub fn new(metadata: StationMetadata, observation: Option<Observation>) -> Self {
        let (temperature, observed_at) = match observation {
            Some(obs) => (Some(obs.temperature), Some(obs.observed_at)),
            None => (None, None),
        };

        Self {
            id: metadata.id,
            name: metadata.name,
            latitude: metadata.latitude,
            longitude: metadata.longitude,
            temperature,
            observed_at,
        }
    }

    /// Only readings with a temperature can be indexed.
    pub fn has_temperature(&self) -> bool {
        self.temperature.is_some()
    }

    /// A reading without a timestamp is never considered stale.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Option<Duration>) -> bool {
        match (max_age, self.observed_at) {
            (Some(max_age), Some(observed_at)) => now - observed_at <= max_age,
            _ => true,
        }
    }

    pub fn into_indexed(self) -> Option<IndexedStation> {
        let temperature = self.temperature?;
        Some(IndexedStation {
            id: self.id,
            name: self.name,
            latitude: self.latitude,
            longitude: self.longitude,
            temperature,
            observed_at: self.observed_at,
        })
    }
}

/// A reading with a known temperature, the only kind the spatial index holds.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedStation {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub temperature: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl IndexedStation {
    pub fn new(id: &str, name: &str, latitude: f64, longitude: f64, temperature: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
            temperature,
            observed_at: None,
        }
    }

    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = Some(observed_at);
        self
    }
}
