use async_trait::async_trait;

use super::{GeocodeCandidate, Geocoder};
use crate::error::{Result, TapfinderError};

/// Tries each provider in order and returns the first non-empty answer
pub struct FallbackGeocoder {
    providers: Vec<Box<dyn Geocoder>>,
}

impl FallbackGeocoder {
    pub fn new(providers: Vec<Box<dyn Geocoder>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl Geocoder for FallbackGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        let mut last_error: Option<TapfinderError> = None;
        let mut any_answered = false;

        for provider in &self.providers {
            match provider.geocode(query).await {
                Ok(candidates) if !candidates.is_empty() => return Ok(candidates),
                Ok(_) => any_answered = true,
                Err(e) => {
                    tracing::warn!(provider = provider.name(), error = %e, "Geocoder failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        // Only surface an error when no provider gave a definitive answer
        match last_error {
            Some(e) if !any_answered => Err(e),
            _ => Ok(Vec::new()),
        }
    }

    fn name(&self) -> &str {
        "fallback"
    }
}
