use crate::error::{ProcessingError, Result};
use crate::models::StationMetadata;
use crate::readers::text::{csv_reader, decode_text, find_column};
use crate::utils::coordinates::parse_coordinate;
use csv::StringRecord;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};
use validator::Validate;

const ID_COLUMNS: [&str; 3] = ["id", "station_id", "stations_id"];
const NAME_COLUMNS: [&str; 4] = ["name", "ort", "station", "stationsname"];
const LAT_COLUMNS: [&str; 4] = ["lat", "latitude", "geobreite", "gkz_lat"];
const LON_COLUMNS: [&str; 4] = ["lon", "longitude", "geolaenge", "gkz_lon"];

struct StationColumns {
    id: usize,
    name: Option<usize>,
    latitude: usize,
    longitude: usize,
}

impl StationColumns {
    fn locate(headers: &StringRecord) -> Result<Self> {
        let required = |aliases: &[&str], what: &str| {
            find_column(headers, aliases).ok_or_else(|| {
                ProcessingError::InvalidFormat(format!(
                    "Station file has no {} column (headers: {:?})",
                    what, headers
                ))
            })
        };

        Ok(Self {
            id: required(&ID_COLUMNS, "id")?,
            name: find_column(headers, &NAME_COLUMNS),
            latitude: required(&LAT_COLUMNS, "latitude")?,
            longitude: required(&LON_COLUMNS, "longitude")?,
        })
    }
}

pub struct StationReader;

impl StationReader {
    pub fn new() -> Self {
        Self
    }

    /// Read station metadata. A missing file yields no stations.
    pub fn read_stations(&self, path: &Path) -> Result<Vec<StationMetadata>> {
        if !path.exists() {
            warn!("Station file not found: {}", path.display());
            return Ok(Vec::new());
        }

        let bytes = std::fs::read(path)?;
        self.parse_stations(&decode_text(&bytes))
    }

    pub fn parse_stations(&self, text: &str) -> Result<Vec<StationMetadata>> {
        let mut reader = csv_reader(text, true);
        let columns = StationColumns::locate(reader.headers()?)?;

        let mut seen = HashSet::new();
        let mut stations = Vec::new();

        for record in reader.records() {
            let record = record?;

            let Some(station) = self.parse_station_record(&record, &columns) else {
                debug!("Skipping incomplete station row: {:?}", record);
                continue;
            };

            if !seen.insert(station.id.clone()) {
                warn!("Duplicate station id {}, keeping first entry", station.id);
                continue;
            }

            stations.push(station);
        }

        info!("Loaded {} stations", stations.len());
        Ok(stations)
    }

    fn parse_station_record(
        &self,
        record: &StringRecord,
        columns: &StationColumns,
    ) -> Option<StationMetadata> {
        let id = record.get(columns.id).filter(|v| !v.is_empty())?;
        let latitude = parse_coordinate(record.get(columns.latitude)?).ok()?;
        let longitude = parse_coordinate(record.get(columns.longitude)?).ok()?;
        let name = columns
            .name
            .and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .unwrap_or(id);

        let station = StationMetadata::new(id.to_string(), name.to_string(), latitude, longitude);
        station.validate().ok()?;
        Some(station)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_plain_csv() -> Result<()> {
        let text = "id,name,lat,lon\n00433,Berlin-Tempelhof,52.4675,13.4021\n01975,Hamburg-Fuhlsbüttel,53.6332,9.9881\n";
        let stations = StationReader::new().parse_stations(text)?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "00433");
        assert_eq!(stations[0].name, "Berlin-Tempelhof");
        assert!((stations[0].latitude - 52.4675).abs() < 1e-9);
        assert_eq!(stations[1].name, "Hamburg-Fuhlsbüttel");
        Ok(())
    }

    #[test]
    fn test_parse_dwd_column_names() -> Result<()> {
        let text = "Stations_id;Stationsname;geoBreite;geoLaenge\n  3379 ; München-Stadt ; 48,1632 ; 11,5429\n";
        let stations = StationReader::new().parse_stations(text)?;

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "3379");
        assert_eq!(stations[0].name, "München-Stadt");
        assert!((stations[0].latitude - 48.1632).abs() < 1e-9);
        assert!((stations[0].longitude - 11.5429).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_incomplete_rows_skipped() -> Result<()> {
        let text = "id;name;lat;lon\n;NoId;50.0;10.0\n2;NoLat;;10.0\n3;;51.0;11.0\n4;Bad;95.0;10.0\n5;Short\n";
        let stations = StationReader::new().parse_stations(text)?;

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "3");
        // name falls back to the id
        assert_eq!(stations[0].name, "3");
        Ok(())
    }

    #[test]
    fn test_duplicate_ids_keep_first() -> Result<()> {
        let text = "id;name;lat;lon\n1;First;50.0;10.0\n1;Second;51.0;11.0\n";
        let stations = StationReader::new().parse_stations(text)?;

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "First");
        Ok(())
    }

    #[test]
    fn test_missing_required_column() {
        let text = "id;name;lat\n1;A;50.0\n";
        assert!(matches!(
            StationReader::new().parse_stations(text),
            Err(ProcessingError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_missing_file_yields_no_stations() -> Result<()> {
        let stations = StationReader::new().read_stations(Path::new("/nonexistent/stations.csv"))?;
        assert!(stations.is_empty());
        Ok(())
    }

    #[test]
    fn test_read_latin1_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"id;name;lat;lon\n3379;M\xFCnchen-Stadt;48.1632;11.5429\n")?;

        let stations = StationReader::new().read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "München-Stadt");
        Ok(())
    }
}
