use crate::models::{CityEntry, GridPoint};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationCounts {
    pub read: usize,
    pub without_temperature: usize,
    pub stale: usize,
    pub indexed: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    pub stations: StationCounts,
    pub bucket_count: usize,
    pub lattice_points: usize,
    pub grid_points: usize,
    pub cities_total: usize,
    pub cities_resolved: usize,
    pub unresolved_cities: Vec<String>,
    pub max_distance_km: Option<f64>,
    pub mean_distance_km: Option<f64>,
}

impl CoverageReport {
    pub fn record_grid(&mut self, lattice_points: usize, points: &[GridPoint]) {
        self.lattice_points = lattice_points;
        self.grid_points = points.len();

        if points.is_empty() {
            self.max_distance_km = None;
            self.mean_distance_km = None;
            return;
        }

        let total: f64 = points.iter().map(|p| p.distance_km).sum();
        self.max_distance_km = points.iter().map(|p| p.distance_km).reduce(f64::max);
        self.mean_distance_km = Some(total / points.len() as f64);
    }

    pub fn record_cities(&mut self, total: usize, entries: &[CityEntry], unresolved: &[String]) {
        self.cities_total = total;
        self.cities_resolved = entries.len();
        self.unresolved_cities = unresolved.to_vec();
    }

    /// Share of lattice nodes that received a station, in percent.
    pub fn grid_coverage(&self) -> f64 {
        if self.lattice_points == 0 {
            return 0.0;
        }
        100.0 * self.grid_points as f64 / self.lattice_points as f64
    }

    pub fn summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== Coverage Report ===\n");
        summary.push_str(&format!("Stations Read: {}\n", self.stations.read));
        summary.push_str(&format!(
            "Without Temperature: {}\n",
            self.stations.without_temperature
        ));
        summary.push_str(&format!("Stale Readings: {}\n", self.stations.stale));
        summary.push_str(&format!(
            "Indexed Stations: {} in {} buckets\n",
            self.stations.indexed, self.bucket_count
        ));
        summary.push_str(&format!(
            "\nGrid Points: {}/{} ({:.1}%)\n",
            self.grid_points,
            self.lattice_points,
            self.grid_coverage()
        ));

        if let (Some(max), Some(mean)) = (self.max_distance_km, self.mean_distance_km) {
            summary.push_str(&format!(
                "Station Distance: mean {:.1} km, max {:.1} km\n",
                mean, max
            ));
        }

        summary.push_str(&format!(
            "\nCities Resolved: {}/{}\n",
            self.cities_resolved, self.cities_total
        ));

        if !self.unresolved_cities.is_empty() {
            summary.push_str(&format!(
                "Unresolved: {}\n",
                self.unresolved_cities.join(", ")
            ));
        }

        summary
    }
}
