pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{dms_to_decimal, haversine_distance, parse_coordinate, round_to};
pub use filename::{cities_output_path, grid_output_path};
pub use progress::ProgressReporter;
