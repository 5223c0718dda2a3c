//! Turning a user's search box input into a ranked result list

use serde::Serialize;
use std::sync::Arc;

use crate::geo::{nearby_preview, rank};
use crate::geocoding::{looks_like_place, reference_label, select_candidate, Geocoder};
use crate::models::{
    DistanceUnit, GeoPoint, RankOptions, RankedResult, ReferenceLocation, ReferenceSource,
};

/// Result of one [`Locator::search`] call
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// The reference the results were ranked against, if any
    pub reference: Option<ReferenceLocation>,
    pub results: Vec<RankedResult>,

    /// The first few results, when they carry distances
    pub nearby: Vec<RankedResult>,
}

/// Ranks a fixed point collection for free-text searches
pub struct Locator<G: Geocoder> {
    points: Arc<Vec<GeoPoint>>,
    geocoder: G,
    region: String,
    max_results: usize,
    unit: DistanceUnit,
    nearby_count: usize,
}

impl<G: Geocoder> Locator<G> {
    pub fn new(points: Arc<Vec<GeoPoint>>, geocoder: G, region: impl Into<String>) -> Self {
        Self {
            points,
            geocoder,
            region: region.into(),
            max_results: 20,
            unit: DistanceUnit::Miles,
            nearby_count: 3,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_nearby_count(mut self, nearby_count: usize) -> Self {
        self.nearby_count = nearby_count;
        self
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Rank the collection for `term`.
    ///
    /// A term that looks like a place is geocoded first; a geocoded place
    /// replaces `reference` and no text filter is applied. Anything else,
    /// including a place the geocoder could not resolve, filters by text
    /// against `reference`.
    pub async fn search(&self, term: &str, reference: Option<ReferenceLocation>) -> SearchOutcome {
        let term = term.trim();

        if term.is_empty() {
            return self.ranked(reference, None);
        }

        if looks_like_place(term) {
            if let Some(place) = self.geocode(term).await {
                return self.ranked(Some(place), None);
            }
        }

        self.ranked(reference, Some(term))
    }

    async fn geocode(&self, term: &str) -> Option<ReferenceLocation> {
        match self.geocoder.geocode(term).await {
            Ok(candidates) => select_candidate(&candidates, &self.region).map(|candidate| {
                ReferenceLocation::new(candidate.latitude, candidate.longitude, ReferenceSource::Search)
                    .with_label(reference_label(term))
            }),
            Err(e) => {
                tracing::warn!(
                    provider = self.geocoder.name(),
                    error = %e,
                    "Geocoding failed, searching by text instead"
                );
                None
            }
        }
    }

    fn ranked(&self, reference: Option<ReferenceLocation>, query: Option<&str>) -> SearchOutcome {
        let mut options = RankOptions::new(self.max_results, self.unit);
        if let Some(reference) = reference.clone() {
            options = options.with_reference(reference);
        }
        if let Some(query) = query {
            options = options.with_text_query(query);
        }

        let results = rank(&self.points, &options);
        let nearby = nearby_preview(&results, self.nearby_count);

        SearchOutcome { reference: options.valid_reference().cloned(), results, nearby }
    }
}
