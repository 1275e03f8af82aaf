use crate::error::{ProcessingError, Result};
use crate::models::Datasets;
use crate::utils::filename::{cities_output_path, grid_output_path};
use serde::Serialize;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub struct JsonWriter {
    pretty: bool,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Serialize `payload` next to `path` and rename it into place, so readers
    /// never observe a partially written file.
    pub fn write_atomic<T: Serialize>(&self, payload: &T, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file_mut());
            if self.pretty {
                serde_json::to_writer_pretty(&mut writer, payload)?;
            } else {
                serde_json::to_writer(&mut writer, payload)?;
            }
            writer.flush()?;
        }

        temp_file
            .persist(path)
            .map_err(|e| ProcessingError::Io(e.error))?;

        info!("Wrote {}", path.display());
        Ok(())
    }

    /// Write both datasets into every output directory.
    pub fn write_datasets(&self, datasets: &Datasets, output_dirs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(output_dirs.len() * 2);

        for dir in output_dirs {
            let grid_path = grid_output_path(dir);
            self.write_atomic(&datasets.grid, &grid_path)?;
            written.push(grid_path);

            let cities_path = cities_output_path(dir);
            self.write_atomic(&datasets.cities, &cities_path)?;
            written.push(cities_path);
        }

        Ok(written)
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, CityEntry, GridPayload, GridPoint, IndexedStation};
    use crate::processors::DatasetAssembler;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_datasets() -> Datasets {
        let station = IndexedStation::new("00433", "Berlin-Tempelhof", 52.4675, 13.4021, 18.2);
        DatasetAssembler::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()).assemble(
            vec![GridPoint::new(52.5, 13.5, &station, 7.0)],
            vec![CityEntry::new(&City::new("Berlin", 52.52, 13.405), &station, 6.0)],
        )
    }

    #[test]
    fn test_write_atomic_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("nested").join("grid.json");
        let datasets = sample_datasets();

        JsonWriter::new().write_atomic(&datasets.grid, &path)?;

        let parsed: GridPayload = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(parsed, datasets.grid);

        // only the final file remains, no temporary leftovers
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())?.collect();
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[test]
    fn test_overwrite_existing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("grid.json");
        std::fs::write(&path, "stale")?;

        JsonWriter::new().write_atomic(&sample_datasets().grid, &path)?;

        assert!(std::fs::read_to_string(&path)?.starts_with("{\"generated\""));
        Ok(())
    }

    #[test]
    fn test_pretty_output() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cities.json");

        JsonWriter::new()
            .with_pretty(true)
            .write_atomic(&sample_datasets().cities, &path)?;

        assert!(std::fs::read_to_string(&path)?.contains("\n  \"source\""));
        Ok(())
    }

    #[test]
    fn test_write_datasets_fans_out() -> Result<()> {
        let dir = TempDir::new()?;
        let output_dirs = vec![dir.path().join("public/data"), dir.path().join("data")];

        let written = JsonWriter::new().write_datasets(&sample_datasets(), &output_dirs)?;

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.exists());
        }
        assert!(output_dirs[0]
            .join("temperature-germany-cities.json")
            .exists());
        Ok(())
    }
}
