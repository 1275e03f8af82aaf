/// File names
pub const STATIONS_FILE: &str = "stations.csv";
pub const GRID_OUTPUT_FILE: &str = "temperature-germany-grid.json";
pub const CITIES_OUTPUT_FILE: &str = "temperature-germany-cities.json";

/// Directory names
pub const RAW_DIR: &str = "dwd_raw";
pub const TEMPERATURE_DIR: &str = "temperatures";
pub const DEFAULT_OUTPUT_DIRS: [&str; 2] = ["public/data", "data"];

/// Extensions tried, in order, for a station's time series file
pub const SERIES_EXTENSIONS: [&str; 2] = ["csv", "txt"];

/// Grid defaults (Germany)
pub const GRID_MIN_LAT: f64 = 47.0;
pub const GRID_MAX_LAT: f64 = 55.0;
pub const GRID_MIN_LON: f64 = 5.5;
pub const GRID_MAX_LON: f64 = 15.5;
pub const GRID_STEP: f64 = 0.25;
pub const GRID_EPSILON: f64 = 1e-9;
/// Upper bound on the number of values along one grid axis
pub const MAX_AXIS_POINTS: usize = 100_000;
pub const COORDINATE_PRECISION: u32 = 6;

/// Spatial index defaults
pub const BUCKET_SIZE_DEG: f64 = 0.5;
pub const MAX_BUCKET_RADIUS: u32 = 4;

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// DWD marks missing measurements with this value
pub const MISSING_VALUE_SENTINEL: f64 = -999.0;

/// Bytes inspected when sniffing a file's delimiter
pub const SNIFF_SAMPLE_SIZE: usize = 2048;

/// Provenance strings
pub const GRID_SOURCE: &str =
    "DWD / German Weather Service (station data, interpolated via nearest neighbor)";
pub const CITIES_SOURCE: &str = "DWD / German Weather Service (nearest station)";

/// Default city list: (name, latitude, longitude)
pub const GERMAN_CITIES: [(&str, f64, f64); 18] = [
    ("Berlin", 52.5200, 13.4050),
    ("Hamburg", 53.5511, 9.9937),
    ("München", 48.1351, 11.5820),
    ("Köln", 50.9375, 6.9603),
    ("Frankfurt am Main", 50.1109, 8.6821),
    ("Stuttgart", 48.7758, 9.1829),
    ("Leipzig", 51.3397, 12.3731),
    ("Dresden", 51.0504, 13.7373),
    ("Hannover", 52.3759, 9.7320),
    ("Nürnberg", 49.4521, 11.0767),
    ("Bremen", 53.0793, 8.8017),
    ("Essen", 51.4556, 7.0116),
    ("Dortmund", 51.5136, 7.4653),
    ("Duisburg", 51.4344, 6.7623),
    ("Bochum", 51.4818, 7.2162),
    ("Wuppertal", 51.2562, 7.1508),
    ("Bonn", 50.7374, 7.0982),
    ("Karlsruhe", 49.0069, 8.4037),
];
