use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::constants::MISSING_VALUE_SENTINEL;

/// One temperature measurement from a station's time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub temperature: f64,
    pub observed_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(temperature: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            temperature,
            observed_at,
        }
    }

    pub fn is_usable_temperature(value: f64) -> bool {
        value.is_finite() && value != MISSING_VALUE_SENTINEL
    }

    /// Keep whichever observation is more recent; ties keep `self`.
    pub fn latest(self, other: Observation) -> Observation {
        if other.observed_at > self.observed_at {
            other
        } else {
            self
        }
    }
}
