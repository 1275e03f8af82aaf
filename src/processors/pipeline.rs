use crate::error::{ProcessingError, Result};
use crate::models::{default_cities, City, Datasets, IndexedStation, StationReading};
use crate::processors::{
    CityResolver, CoverageReport, DatasetAssembler, GridBuilder, GridConfig, IndexConfig,
    SpatialIndex, StationCounts,
};
use crate::settings::Settings;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

/// One build: filter readings, index them, resolve grid and cities, assemble
/// the payloads.
pub struct Pipeline {
    grid: GridConfig,
    index: IndexConfig,
    cities: Vec<City>,
    max_age: Option<Duration>,
}

impl Pipeline {
    pub fn new(grid: GridConfig, index: IndexConfig, cities: Vec<City>) -> Self {
        Self {
            grid,
            index,
            cities,
            max_age: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.grid.clone(),
            settings.index.clone(),
            settings.cities.clone(),
        )
        .with_max_age(settings.max_age())
    }

    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    /// Keep readings that have a temperature and are recent enough.
    pub fn select_stations(
        &self,
        readings: Vec<StationReading>,
        now: DateTime<Utc>,
    ) -> (Vec<IndexedStation>, StationCounts) {
        let mut counts = StationCounts {
            read: readings.len(),
            ..StationCounts::default()
        };
        let mut selected = Vec::with_capacity(readings.len());

        for reading in readings {
            if !reading.has_temperature() {
                counts.without_temperature += 1;
                continue;
            }
            if !reading.is_fresh(now, self.max_age) {
                debug!(
                    "Skipping stale reading for station {} observed at {:?}",
                    reading.id, reading.observed_at
                );
                counts.stale += 1;
                continue;
            }
            if let Some(station) = reading.into_indexed() {
                selected.push(station);
            }
        }

        counts.indexed = selected.len();
        if counts.stale > 0 {
            warn!("Dropped {} stale readings", counts.stale);
        }

        (selected, counts)
    }

    /// Build the spatial index, failing when no station qualifies.
    pub fn build_index(
        &self,
        readings: Vec<StationReading>,
        now: DateTime<Utc>,
    ) -> Result<(SpatialIndex, StationCounts)> {
        let (stations, counts) = self.select_stations(readings, now);

        if stations.is_empty() {
            return Err(ProcessingError::NoValidStations);
        }

        Ok((SpatialIndex::new(stations, self.index.clone()), counts))
    }

    pub fn run(
        &self,
        readings: Vec<StationReading>,
        generated_at: DateTime<Utc>,
    ) -> Result<(Datasets, CoverageReport)> {
        let (index, counts) = self.build_index(readings, generated_at)?;
        info!(
            "Indexed {}/{} stations with valid temperature",
            counts.indexed, counts.read
        );

        let mut report = CoverageReport {
            stations: counts,
            bucket_count: index.bucket_count(),
            ..CoverageReport::default()
        };

        let grid_builder = GridBuilder::new(self.grid.clone());
        let points = grid_builder.build(&index);
        report.record_grid(grid_builder.lattice().len(), &points);

        if points.is_empty() {
            return Err(ProcessingError::EmptyGrid);
        }

        let resolver = CityResolver::new(self.cities.clone());
        let resolution = resolver.resolve(&index);
        report.record_cities(
            resolver.cities().len(),
            &resolution.entries,
            &resolution.unresolved,
        );

        let datasets = DatasetAssembler::new(generated_at).assemble(points, resolution.entries);

        Ok((datasets, report))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(
            GridConfig::default(),
            IndexConfig::default(),
            default_cities(),
        )
    }
}
