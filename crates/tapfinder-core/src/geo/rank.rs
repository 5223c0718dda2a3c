use crate::geo::distance::haversine_distance;
use crate::models::{GeoPoint, RankOptions, RankedResult};

/// Rank points by distance from the reference location.
///
/// Without a reference and without a non-empty text query there is no
/// context to rank by, so the result is empty. The text filter runs before
/// distances are computed. Points lacking a valid coordinate are dropped.
/// With a reference the output is sorted ascending by distance (stable, so
/// ties keep input order); without one, input order is preserved and
/// `distance` is `None`. The output never exceeds `max_results`.
pub fn rank(points: &[GeoPoint], options: &RankOptions) -> Vec<RankedResult> {
    let reference = options.valid_reference();
    let query = options.normalized_query();

    if reference.is_none() && query.is_none() {
        return Vec::new();
    }
    if options.max_results == 0 || points.is_empty() {
        return Vec::new();
    }

    let candidates = points.iter().filter(|point| match &query {
        Some(needle) => point.matches_text(needle),
        None => true,
    });

    let mut results: Vec<RankedResult> = match reference {
        Some(reference) => {
            let origin = reference.coordinate();
            candidates
                .filter_map(|point| {
                    let coordinate = point.valid_coordinate()?;
                    Some(RankedResult {
                        point: point.clone(),
                        distance: Some(haversine_distance(origin, coordinate, options.unit)),
                    })
                })
                .collect()
        }
        None => candidates
            .filter(|point| point.valid_coordinate().is_some())
            .take(options.max_results)
            .map(|point| RankedResult { point: point.clone(), distance: None })
            .collect(),
    };

    if reference.is_some() {
        // sort_by is stable; distances are finite because coordinates were validated
        results.sort_by(|a, b| {
            a.distance.unwrap_or_default().total_cmp(&b.distance.unwrap_or_default())
        });
    }
    results.truncate(options.max_results);

    tracing::debug!(
        points = points.len(),
        returned = results.len(),
        has_reference = reference.is_some(),
        has_query = query.is_some(),
        "Ranked locations"
    );

    results
}

/// The first `count` results, but only when they were ranked by distance
pub fn nearby_preview(results: &[RankedResult], count: usize) -> Vec<RankedResult> {
    if results.first().map_or(true, |r| r.distance.is_none()) {
        return Vec::new();
    }
    results.iter().take(count).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Coordinate, DistanceUnit, ReferenceLocation, ReferenceSource};

    fn point(id: &str, name: &str, lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(
            id,
            name,
            format!("{} Main St", name),
            Category::Retail,
            Some(Coordinate::new(lon, lat)),
        )
    }

    fn alpha_beta() -> Vec<GeoPoint> {
        vec![point("a", "Alpha", 40.46, -79.96), point("b", "Beta", 40.79, -80.14)]
    }

    fn at(lat: f64, lon: f64) -> ReferenceLocation {
        ReferenceLocation::new(lat, lon, ReferenceSource::MapClick)
    }

    #[test]
    fn test_no_context_returns_empty() {
        let options = RankOptions::new(10, DistanceUnit::Miles);
        assert!(rank(&alpha_beta(), &options).is_empty());

        let blank = RankOptions::new(10, DistanceUnit::Miles).with_text_query("");
        assert!(rank(&alpha_beta(), &blank).is_empty());
    }

    #[test]
    fn test_ranks_by_distance() {
        let options = RankOptions::new(2, DistanceUnit::Miles).with_reference(at(40.46, -79.96));
        let results = rank(&alpha_beta(), &options);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].point.name, "Alpha");
        assert_eq!(results[0].distance, Some(0.0));
        assert_eq!(results[1].point.name, "Beta");
        assert!((results[1].distance.unwrap() - 24.679).abs() < 0.01);
    }

    #[test]
    fn test_reference_order_is_by_distance_not_input() {
        let options = RankOptions::new(2, DistanceUnit::Miles).with_reference(at(40.80, -80.15));
        let results = rank(&alpha_beta(), &options);
        assert_eq!(results[0].point.name, "Beta");
        assert_eq!(results[1].point.name, "Alpha");
    }

    #[test]
    fn test_text_only_keeps_input_order_without_distance() {
        let points = vec![
            point("1", "Zed's Alpine Market", 40.0, -80.0),
            point("2", "Beta", 40.1, -80.1),
            point("3", "ALPHA", 40.2, -80.2),
        ];
        let options = RankOptions::new(10, DistanceUnit::Miles).with_text_query("alp");
        let results = rank(&points, &options);

        let ids: Vec<&str> = results.iter().map(|r| r.point.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(results.iter().all(|r| r.distance.is_none()));
    }

    #[test]
    fn test_filter_applies_before_ranking() {
        let options = RankOptions::new(10, DistanceUnit::Miles)
            .with_reference(at(40.46, -79.96))
            .with_text_query("beta");
        let results = rank(&alpha_beta(), &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].point.name, "Beta");
    }

    #[test]
    fn test_ties_break_by_input_order() {
        let points = vec![point("first", "One", 40.0, -80.0), point("second", "Two", 40.0, -80.0)];
        let options = RankOptions::new(1, DistanceUnit::Miles).with_reference(at(41.0, -80.0));
        let results = rank(&points, &options);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].point.id, "first");
    }

    #[test]
    fn test_zero_max_results() {
        let options = RankOptions::new(0, DistanceUnit::Miles).with_reference(at(40.46, -79.96));
        assert!(rank(&alpha_beta(), &options).is_empty());
    }

    #[test]
    fn test_invalid_coordinates_are_excluded() {
        let mut points = alpha_beta();
        points.push(GeoPoint::new("x", "Broken", "", Category::Retail, None));
        points.push(GeoPoint::new(
            "y",
            "Also Broken",
            "",
            Category::Retail,
            Some(Coordinate::new(f64::NAN, 40.0)),
        ));

        let options = RankOptions::new(10, DistanceUnit::Miles).with_reference(at(40.46, -79.96));
        let results = rank(&points, &options);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.distance.unwrap().is_finite()));

        let text = RankOptions::new(10, DistanceUnit::Miles).with_text_query("broken");
        assert!(rank(&points, &text).is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let points = alpha_beta();
        let before = points.clone();
        let options = RankOptions::new(10, DistanceUnit::Miles).with_reference(at(40.80, -80.15));
        let _ = rank(&points, &options);
        assert_eq!(points, before);
    }

    #[test]
    fn test_nearby_preview() {
        let points = vec![
            point("1", "A", 40.0, -80.0),
            point("2", "B", 40.1, -80.0),
            point("3", "C", 40.2, -80.0),
            point("4", "D", 40.3, -80.0),
        ];
        let ranked =
            rank(&points, &RankOptions::new(10, DistanceUnit::Miles).with_reference(at(40.0, -80.0)));
        let preview = nearby_preview(&ranked, 3);
        assert_eq!(preview.len(), 3);
        assert_eq!(preview[0].point.id, "1");

        let unranked = rank(&points, &RankOptions::new(10, DistanceUnit::Miles).with_text_query("a"));
        assert!(nearby_preview(&unranked, 3).is_empty());
    }
}
