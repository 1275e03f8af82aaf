pub mod city_resolver;
pub mod coverage;
pub mod dataset_assembler;
pub mod grid_builder;
pub mod pipeline;
pub mod spatial_index;

pub use city_resolver::{CityResolution, CityResolver};
pub use coverage::{CoverageReport, StationCounts};
pub use dataset_assembler::DatasetAssembler;
pub use grid_builder::{axis_values, GridBuilder, GridConfig};
pub use pipeline::Pipeline;
pub use spatial_index::{BucketKey, IndexConfig, Neighbor, SpatialIndex};
