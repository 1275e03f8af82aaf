use crate::models::{default_cities, City, CityEntry};
use crate::processors::SpatialIndex;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityResolution {
    pub entries: Vec<CityEntry>,
    pub unresolved: Vec<String>,
}

pub struct CityResolver {
    cities: Vec<City>,
}

impl CityResolver {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Resolve each city to its nearest station. A city without a station is
    /// noted and skipped.
    pub fn resolve(&self, index: &SpatialIndex) -> CityResolution {
        let mut resolution = CityResolution::default();

        for city in &self.cities {
            match index.nearest(city.lat, city.lon) {
                Some(neighbor) => resolution.entries.push(CityEntry::new(
                    city,
                    neighbor.station,
                    neighbor.distance_km,
                )),
                None => {
                    debug!("No station found near {}", city.name);
                    resolution.unresolved.push(city.name.clone());
                }
            }
        }

        info!("Prepared {} city entries", resolution.entries.len());
        resolution
    }
}

impl Default for CityResolver {
    fn default() -> Self {
        Self::new(default_cities())
    }
}
