use crate::error::{ProcessingError, Result};
use crate::models::{Observation, StationMetadata, StationReading};
use crate::readers::{StationReader, TemperatureReader};
use crate::utils::constants::{STATIONS_FILE, TEMPERATURE_DIR};
use crate::utils::filename::series_candidates;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Reads the station list and every station's series file, the latter in
/// parallel on a dedicated rayon pool.
#[derive(Debug, Clone)]
pub struct ConcurrentReader {
    max_workers: usize,
    use_mmap: bool,
    show_progress: bool,
}

impl ConcurrentReader {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            use_mmap: false,
            show_progress: false,
        }
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read all station readings below `raw_dir` without blocking the runtime.
    pub async fn read_all(&self, raw_dir: &Path) -> Result<Vec<StationReading>> {
        let reader = self.clone();
        let raw_dir = raw_dir.to_path_buf();

        tokio::task::spawn_blocking(move || reader.read_all_blocking(&raw_dir)).await?
    }

    pub fn read_all_blocking(&self, raw_dir: &Path) -> Result<Vec<StationReading>> {
        let stations = StationReader::new().read_stations(&raw_dir.join(STATIONS_FILE))?;
        if stations.is_empty() {
            return Ok(Vec::new());
        }

        self.attach_latest_temperatures(stations, &raw_dir.join(TEMPERATURE_DIR))
    }

    /// Pair each station with the latest observation from its series file.
    /// Stations without a readable series keep no temperature.
    pub fn attach_latest_temperatures(
        &self,
        stations: Vec<StationMetadata>,
        temperature_dir: &Path,
    ) -> Result<Vec<StationReading>> {
        if !temperature_dir.exists() {
            warn!(
                "Temperature directory not found: {}",
                temperature_dir.display()
            );
            return Ok(stations
                .into_iter()
                .map(|s| StationReading::new(s, None))
                .collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let total = stations.len();
        let progress = ProgressReporter::new(
            total as u64,
            "Reading station series...",
            !self.show_progress,
        );
        let reader = TemperatureReader::with_mmap(self.use_mmap);

        let readings: Vec<StationReading> = pool.install(|| {
            stations
                .into_par_iter()
                .map(|station| {
                    let observation = Self::latest_for_station(&reader, temperature_dir, &station.id);
                    progress.increment(1);
                    StationReading::new(station, observation)
                })
                .collect()
        });

        let valid = readings.iter().filter(|r| r.has_temperature()).count();
        progress.finish_with_message(&format!("Read {} station series", total));
        info!("Attached latest temperature to {}/{} stations", valid, total);

        Ok(readings)
    }

    fn latest_for_station(
        reader: &TemperatureReader,
        temperature_dir: &Path,
        station_id: &str,
    ) -> Option<Observation> {
        let Some(path) = series_candidates(temperature_dir, station_id)
            .into_iter()
            .find(|p| p.exists())
        else {
            debug!("No temperature file for station {}", station_id);
            return None;
        };

        match reader.read_latest(&path) {
            Ok(Some(observation)) => Some(observation),
            Ok(None) => {
                debug!("Could not parse temperature for station {}", station_id);
                None
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl Default for ConcurrentReader {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &Path) -> Result<()> {
        fs::write(
            dir.join(STATIONS_FILE),
            "id;name;lat;lon\n00433;Berlin-Tempelhof;52.4675;13.4021\n01975;Hamburg-Fuhlsbüttel;53.6332;9.9881\n03379;München-Stadt;48.1632;11.5429\n",
        )?;

        let series = dir.join(TEMPERATURE_DIR);
        fs::create_dir_all(&series)?;
        fs::write(
            series.join("00433.csv"),
            "timestamp;temp\n2024050111;17.1\n2024050112;18.4\n",
        )?;
        fs::write(series.join("01975.txt"), "2024-05-01 12:00,12.9\n")?;
        Ok(())
    }

    #[test]
    fn test_read_all_blocking() -> Result<()> {
        let dir = TempDir::new()?;
        write_fixture(dir.path())?;

        let readings = ConcurrentReader::new(2).read_all_blocking(dir.path())?;

        assert_eq!(readings.len(), 3);
        assert_eq!(readings[0].id, "00433");
        assert_eq!(readings[0].temperature, Some(18.4));
        assert_eq!(readings[1].temperature, Some(12.9));
        assert!(readings[1].observed_at.is_some());
        assert_eq!(readings[2].id, "03379");
        assert_eq!(readings[2].temperature, None);
        Ok(())
    }

    #[test]
    fn test_missing_temperature_dir() -> Result<()> {
        let dir = TempDir::new()?;
        write_fixture(dir.path())?;
        fs::remove_dir_all(dir.path().join(TEMPERATURE_DIR))?;

        let readings = ConcurrentReader::new(1).read_all_blocking(dir.path())?;

        assert_eq!(readings.len(), 3);
        assert!(readings.iter().all(|r| !r.has_temperature()));
        Ok(())
    }

    #[test]
    fn test_missing_station_file() -> Result<()> {
        let dir = TempDir::new()?;
        let readings = ConcurrentReader::new(1).read_all_blocking(dir.path())?;
        assert!(readings.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_all_async() -> Result<()> {
        let dir = TempDir::new()?;
        write_fixture(dir.path())?;

        let readings = ConcurrentReader::new(2)
            .with_mmap(true)
            .read_all(dir.path())
            .await?;

        assert_eq!(readings.iter().filter(|r| r.has_temperature()).count(), 2);
        Ok(())
    }
}
