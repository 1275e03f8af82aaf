use chrono::{TimeZone, Utc};
use dwd_temperature::models::{CityPayload, GridPayload, IndexedStation};
use dwd_temperature::processors::{CityResolver, GridBuilder, Pipeline, SpatialIndex};
use dwd_temperature::readers::ConcurrentReader;
use dwd_temperature::utils::haversine_distance;
use dwd_temperature::writers::JsonWriter;
use dwd_temperature::ProcessingError;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_raw_dir(dir: &Path) {
    fs::write(
        dir.join("stations.csv"),
        "Stations_id;Stationsname;geoBreite;geoLaenge\n\
         433;Berlin-Tempelhof;52,4675;13,4021\n\
         1975;Hamburg-Fuhlsbüttel;53,6332;9,9881\n\
         3379;München-Stadt;48,1632;11,5429\n\
         2667;Köln/Bonn;50,8646;7,1575\n\
         9999;Ohne Messung;51,0;10,0\n",
    )
    .expect("Failed to write stations");

    let series = dir.join("temperatures");
    fs::create_dir_all(&series).expect("Failed to create series dir");
    for (id, rows) in [
        ("433", "2024050111;17.1\n2024050112;18.4\n"),
        ("1975", "2024050112;12.9\n"),
        ("3379", "2024050112;21.0\n2024050110;19.5\n"),
        ("2667", "2024050112;-999\n2024050111;16.2\n"),
    ] {
        fs::write(
            series.join(format!("{}.csv", id)),
            format!("STATIONS_ID;MESS_DATUM;TT_TU\n{}", prefix_rows(id, rows)),
        )
        .expect("Failed to write series");
    }
}

fn prefix_rows(id: &str, rows: &str) -> String {
    rows.lines().map(|l| format!("{};{}\n", id, l)).collect()
}

#[test]
fn test_end_to_end_build() {
    let raw = TempDir::new().expect("Failed to create temp directory");
    let out = TempDir::new().expect("Failed to create temp directory");
    write_raw_dir(raw.path());

    let readings = ConcurrentReader::new(2)
        .read_all_blocking(raw.path())
        .unwrap();
    assert_eq!(readings.len(), 5);

    let generated_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 5, 0).unwrap();
    let (datasets, report) = Pipeline::default().run(readings, generated_at).unwrap();

    assert_eq!(report.stations.indexed, 4);
    assert_eq!(report.stations.without_temperature, 1);
    assert_eq!(datasets.grid.points.len(), 1353);
    assert_eq!(datasets.cities.cities.len(), 18);

    let output_dirs = vec![out.path().join("public/data"), out.path().join("data")];
    JsonWriter::new()
        .write_datasets(&datasets, &output_dirs)
        .unwrap();

    for dir in &output_dirs {
        let grid: GridPayload = serde_json::from_str(
            &fs::read_to_string(dir.join("temperature-germany-grid.json")).unwrap(),
        )
        .unwrap();
        let cities: CityPayload = serde_json::from_str(
            &fs::read_to_string(dir.join("temperature-germany-cities.json")).unwrap(),
        )
        .unwrap();

        assert_eq!(grid, datasets.grid);
        assert_eq!(cities, datasets.cities);
        assert_eq!(grid.generated, "2024-05-01T12:05:00.000Z");
    }

    let berlin = datasets
        .cities
        .cities
        .iter()
        .find(|c| c.name == "Berlin")
        .unwrap();
    assert_eq!(berlin.station_id, "433");
    assert_eq!(berlin.temp, 18.4);

    let koeln = datasets
        .cities
        .cities
        .iter()
        .find(|c| c.name == "Köln")
        .unwrap();
    // the -999 row is a missing value, the earlier measurement is used
    assert_eq!(koeln.temp, 16.2);
}

#[test]
fn test_no_readings_aborts_without_output() {
    let raw = TempDir::new().expect("Failed to create temp directory");
    let readings = ConcurrentReader::new(1)
        .read_all_blocking(raw.path())
        .unwrap();

    let result = Pipeline::default().run(readings, Utc::now());
    assert!(matches!(result, Err(ProcessingError::NoValidStations)));
}

#[test]
fn test_nearest_scenario() {
    let readings = [("A", 52.0, 13.0, 10.0), ("B", 48.0, 9.0, 20.0)];
    let index = SpatialIndex::with_defaults(
        readings
            .iter()
            .map(|&(id, lat, lon, temp)| IndexedStation::new(id, id, lat, lon, temp)),
    );

    let to_a = haversine_distance(50.0, 11.0, 52.0, 13.0);
    let to_b = haversine_distance(50.0, 11.0, 48.0, 9.0);
    let expected = if to_a < to_b { "A" } else { "B" };

    let neighbor = index.nearest(50.0, 11.0).unwrap();
    assert_eq!(neighbor.station.id, expected);

    let grid = GridBuilder::default().build(&index);
    assert_eq!(grid.len(), 1353);

    let cities = CityResolver::default().resolve(&index);
    assert_eq!(cities.entries.len(), 18);
}
