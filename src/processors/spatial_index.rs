use crate::error::{ProcessingError, Result};
use crate::models::IndexedStation;
use crate::utils::constants::{BUCKET_SIZE_DEG, MAX_BUCKET_RADIUS};
use crate::utils::coordinates::haversine_distance;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Bucket edge length in degrees
    pub bucket_size: f64,
    /// Largest ring of neighbouring buckets searched before brute force
    pub max_radius: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            bucket_size: BUCKET_SIZE_DEG,
            max_radius: MAX_BUCKET_RADIUS,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.bucket_size.is_finite() && self.bucket_size > 0.0) {
            return Err(ProcessingError::Config(format!(
                "Bucket size must be positive, got: {}",
                self.bucket_size
            )));
        }
        Ok(())
    }
}

/// Integer cell coordinates of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub lat: i64,
    pub lon: i64,
}

impl BucketKey {
    pub fn for_point(lat: f64, lon: f64, bucket_size: f64) -> Self {
        Self {
            lat: (lat / bucket_size).floor() as i64,
            lon: (lon / bucket_size).floor() as i64,
        }
    }

    fn offset(self, dlat: i64, dlon: i64) -> Self {
        Self {
            lat: self.lat + dlat,
            lon: self.lon + dlon,
        }
    }
}

/// Result of a nearest-station query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a> {
    pub station: &'a IndexedStation,
    pub distance_km: f64,
}

/// Bucketed station index. Immutable once built, so it can be queried from
/// several threads at once.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    config: IndexConfig,
    buckets: HashMap<BucketKey, Vec<usize>>,
    stations: Vec<IndexedStation>,
}

impl SpatialIndex {
    pub fn new<I>(stations: I, config: IndexConfig) -> Self
    where
        I: IntoIterator<Item = IndexedStation>,
    {
        let stations: Vec<IndexedStation> = stations.into_iter().collect();
        let mut buckets: HashMap<BucketKey, Vec<usize>> = HashMap::new();

        for (i, station) in stations.iter().enumerate() {
            let key = BucketKey::for_point(station.latitude, station.longitude, config.bucket_size);
            buckets.entry(key).or_default().push(i);
        }

        debug!(
            "Indexed {} stations into {} buckets ({}° buckets)",
            stations.len(),
            buckets.len(),
            config.bucket_size
        );

        Self {
            config,
            buckets,
            stations,
        }
    }

    pub fn with_defaults<I>(stations: I) -> Self
    where
        I: IntoIterator<Item = IndexedStation>,
    {
        Self::new(stations, IndexConfig::default())
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn stations(&self) -> &[IndexedStation] {
        &self.stations
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn bucket_key(&self, lat: f64, lon: f64) -> BucketKey {
        BucketKey::for_point(lat, lon, self.config.bucket_size)
    }

    /// Find the station closest to `(lat, lon)`.
    ///
    /// Rings of buckets around the query bucket are searched with a growing
    /// radius and the first ring that yields any candidate decides the
    /// result. This is not a strict nearest neighbour: a closer station in a
    /// bucket just outside that ring is not considered. When no ring up to
    /// `max_radius` holds a station every station is scanned.
    ///
    /// Returns `None` only when the index is empty.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<Neighbor<'_>> {
        if self.stations.is_empty() {
            return None;
        }

        let center = self.bucket_key(lat, lon);
        for radius in 0..=self.config.max_radius {
            let candidates = self.candidates(center, radius);
            if candidates.is_empty() {
                continue;
            }
            return Self::closest(lat, lon, candidates.into_iter());
        }

        Self::closest(lat, lon, self.stations.iter())
    }

    /// Stations in the (2r+1)×(2r+1) block of buckets centred on `center`.
    fn candidates(&self, center: BucketKey, radius: u32) -> Vec<&IndexedStation> {
        let r = radius as i64;
        let mut candidates = Vec::new();

        for dlat in -r..=r {
            for dlon in -r..=r {
                if let Some(indices) = self.buckets.get(&center.offset(dlat, dlon)) {
                    candidates.extend(indices.iter().map(|&i| &self.stations[i]));
                }
            }
        }

        candidates
    }

    fn closest<'a>(
        lat: f64,
        lon: f64,
        candidates: impl Iterator<Item = &'a IndexedStation>,
    ) -> Option<Neighbor<'a>> {
        let mut best: Option<Neighbor<'a>> = None;

        for station in candidates {
            let distance_km = haversine_distance(lat, lon, station.latitude, station.longitude);
            if best.map_or(true, |b| distance_km < b.distance_km) {
                best = Some(Neighbor {
                    station,
                    distance_km,
                });
            }
        }

        best
    }
}
