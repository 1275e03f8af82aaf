pub mod concurrent_reader;
pub mod station_reader;
pub mod temperature_reader;
pub mod text;

pub use concurrent_reader::ConcurrentReader;
pub use station_reader::StationReader;
pub use temperature_reader::{parse_timestamp, TemperatureReader};
