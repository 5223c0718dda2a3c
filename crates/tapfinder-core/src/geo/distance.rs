use geo::{Distance, HaversineMeasure};
use std::f64::consts::PI;

use crate::models::{Coordinate, DistanceUnit};

/// Great-circle distance between two coordinates on a spherical earth.
///
/// Uses the Haversine formula with R = 3959 mi or 6371 km. Identical
/// coordinates yield exactly 0 and the result is symmetric in its arguments.
pub fn haversine_distance(a: Coordinate, b: Coordinate, unit: DistanceUnit) -> f64 {
    let radius = unit.earth_radius();
    let distance = HaversineMeasure::new(radius).distance(a.as_point(), b.as_point());

    // near-antipodal rounding can push the haversine term past 1, and asin gives NaN
    if distance.is_nan() {
        PI * radius
    } else {
        distance
    }
}
