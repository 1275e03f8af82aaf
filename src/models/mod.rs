pub mod city;
pub mod dataset;
pub mod station;
pub mod temperature;

pub use city::{default_cities, City, CityEntry};
pub use dataset::{CityPayload, Datasets, GridPayload, GridPoint};
pub use station::{IndexedStation, StationMetadata, StationReading};
pub use temperature::Observation;
