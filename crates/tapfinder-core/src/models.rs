pub mod dataset;
pub mod point;
pub mod ranking;

pub use dataset::{DatasetSpec, DatasetSummary};
pub use point::{Category, Coordinate, GeoPoint, ReferenceLocation, ReferenceSource};
pub use ranking::{DistanceUnit, RankOptions, RankedResult};
