use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tapfinder_core::TapfinderError;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, message: message.into(), details: None }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_GATEWAY, message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<TapfinderError> for ApiError {
    fn from(err: TapfinderError) -> Self {
        match &err {
            TapfinderError::DatasetNotFound { .. } => {
                Self::not_found("Dataset not found").with_details(err.to_string())
            }
            TapfinderError::GeocoderUnavailable { .. } | TapfinderError::GeocoderResponse { .. } => {
                Self::bad_gateway("Geocoding failed").with_details(err.to_string())
            }
            TapfinderError::NoDatasets
            | TapfinderError::ConfigMissing { .. }
            | TapfinderError::ConfigInvalid { .. } => {
                Self::internal("Server misconfigured").with_details(err.to_string())
            }
            _ => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("Internal error").with_details(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_status_mapping() {
        let missing = ApiError::from(TapfinderError::DatasetNotFound { path: PathBuf::from("x.geojson") });
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let upstream = ApiError::from(TapfinderError::GeocoderUnavailable {
            provider: "nominatim".to_string(),
            reason: "timeout".to_string(),
        });
        assert_eq!(upstream.status, StatusCode::BAD_GATEWAY);

        let config = ApiError::from(TapfinderError::NoDatasets);
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
