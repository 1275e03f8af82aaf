use crate::error::Result;
use crate::models::Observation;
use crate::readers::text::{csv_reader, decode_text, find_column};
use crate::utils::coordinates::parse_decimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use csv::StringRecord;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use tracing::debug;

const TIMESTAMP_COLUMNS: [&str; 4] = ["timestamp", "time", "datetime", "mess_datum"];
const TEMPERATURE_COLUMNS: [&str; 4] = ["temp", "temperature", "tt_tu", "air_temperature"];

const NAIVE_FORMATS: [&str; 7] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp in one of the formats found in station series. All
/// values without an explicit offset are taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // DWD style: YYYYMMDDHH or YYYYMMDDHHMM
    if value.bytes().all(|b| b.is_ascii_digit()) {
        let padded = match value.len() {
            10 => format!("{}00", value),
            12 => value.to_string(),
            _ => return None,
        };
        return NaiveDateTime::parse_from_str(&padded, "%Y%m%d%H%M")
            .ok()
            .map(|dt| dt.and_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub struct TemperatureReader {
    use_mmap: bool,
}

impl TemperatureReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Latest usable observation in a station's series file.
    pub fn read_latest(&self, path: &Path) -> Result<Option<Observation>> {
        let text = if self.use_mmap {
            self.read_text_mmap(path)?
        } else {
            decode_text(&std::fs::read(path)?)
        };

        self.parse_latest(&text)
    }

    fn read_text_mmap(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(String::new());
        }

        let mmap = unsafe { Mmap::map(&file)? };
        Ok(decode_text(&mmap))
    }

    pub fn parse_latest(&self, text: &str) -> Result<Option<Observation>> {
        let mut reader = csv_reader(text, false);
        let rows: Vec<StringRecord> = reader.records().collect::<std::result::Result<_, _>>()?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let has_header = first.iter().any(|f| f.chars().any(char::is_alphabetic));
        let (ts_col, temp_col, data) = if has_header {
            match (
                find_column(first, &TIMESTAMP_COLUMNS),
                find_column(first, &TEMPERATURE_COLUMNS),
            ) {
                (Some(ts), Some(temp)) => (ts, temp, &rows[1..]),
                _ => {
                    debug!("No timestamp/temperature columns in header {:?}", first);
                    return Ok(None);
                }
            }
        } else {
            (0, 1, &rows[..])
        };

        let latest = data
            .iter()
            .filter_map(|row| Self::parse_row(row, ts_col, temp_col))
            .reduce(Observation::latest);

        Ok(latest)
    }

    fn parse_row(row: &StringRecord, ts_col: usize, temp_col: usize) -> Option<Observation> {
        let observed_at = parse_timestamp(row.get(ts_col)?)?;
        let temperature = parse_decimal(row.get(temp_col)?)
            .filter(|&t| Observation::is_usable_temperature(t))?;
        Some(Observation::new(temperature, observed_at))
    }
}

impl Default for TemperatureReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024050113"), Some(utc(2024, 5, 1, 13, 0)));
        assert_eq!(parse_timestamp("202405011330"), Some(utc(2024, 5, 1, 13, 30)));
        assert_eq!(parse_timestamp("2024-05-01T13:30:00Z"), Some(utc(2024, 5, 1, 13, 30)));
        assert_eq!(parse_timestamp("2024-05-01 13:30"), Some(utc(2024, 5, 1, 13, 30)));
        assert_eq!(parse_timestamp("2024-05-01 13:30:00"), Some(utc(2024, 5, 1, 13, 30)));
        assert_eq!(parse_timestamp("2024-05-01T13:30:00"), Some(utc(2024, 5, 1, 13, 30)));
        assert_eq!(
            parse_timestamp("2024-05-01T15:30:00+02:00"),
            Some(utc(2024, 5, 1, 13, 30))
        );
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let expected = utc(2024, 5, 1, 13, 30) + chrono::Duration::milliseconds(500);
        assert_eq!(parse_timestamp("2024-05-01T13:30:00.500"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 13:30:00.500"), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("20240501"), None);
        assert_eq!(parse_timestamp("2024139999"), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_parse_dwd_series() -> Result<()> {
        let text = "STATIONS_ID;MESS_DATUM;QN_9;TT_TU;RF_TU;eor\n\
                    433;2024050111;    3;  14.2;  61.0;eor\n\
                    433;2024050113;    3;  16.8;  52.0;eor\n\
                    433;2024050112;    3;  15.9;  55.0;eor\n\
                    433;2024050114;    3;-999;-999;eor\n";
        let latest = TemperatureReader::new().parse_latest(text)?.unwrap();

        assert_eq!(latest.temperature, 16.8);
        assert_eq!(latest.observed_at, utc(2024, 5, 1, 13, 0));
        Ok(())
    }

    #[test]
    fn test_parse_headerless_series() -> Result<()> {
        let text = "2024-05-01 10:00,11.5\n2024-05-01 12:00,13.0\nbroken,row\n";
        let latest = TemperatureReader::new().parse_latest(text)?;

        // "broken,row" has letters but is not the first row, so it is just skipped
        assert_eq!(latest.unwrap().temperature, 13.0);
        Ok(())
    }

    #[test]
    fn test_no_usable_rows() -> Result<()> {
        let reader = TemperatureReader::new();
        assert!(reader.parse_latest("")?.is_none());
        assert!(reader.parse_latest("timestamp;temp\n2024050112;nan\n")?.is_none());
        assert!(reader.parse_latest("date;value\n2024050112;4.0\n")?.is_none());
        Ok(())
    }

    #[test]
    fn test_read_file_with_and_without_mmap() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "timestamp,temp")?;
        writeln!(temp_file, "2024-05-01T11:00:00Z,9.5")?;
        writeln!(temp_file, "2024-05-01T12:00:00Z,10.25")?;

        for use_mmap in [false, true] {
            let latest = TemperatureReader::with_mmap(use_mmap)
                .read_latest(temp_file.path())?
                .unwrap();
            assert_eq!(latest.temperature, 10.25);
            assert_eq!(latest.observed_at, utc(2024, 5, 1, 12, 0));
        }
        Ok(())
    }

    #[test]
    fn test_empty_file_with_mmap() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        assert!(TemperatureReader::with_mmap(true)
            .read_latest(temp_file.path())?
            .is_none());
        Ok(())
    }
}
